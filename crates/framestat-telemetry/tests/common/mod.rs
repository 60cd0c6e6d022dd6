// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scripted devices, providers and backends shared by the integration tests.

#![allow(dead_code)]

use framestat_core::stats::{
    CommandBufferHandle, Counters, DeviceHandle, ProbeContext, ProviderBackend, SampleRequest,
    StatGraphData, StatIndex, StatsError, StatsProvider, StatsResult,
};
use std::any::Any;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub struct TestDevice;

impl DeviceHandle for TestDevice {
    fn device_name(&self) -> &str {
        "test-device"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A command buffer that records the markers providers insert into it.
#[derive(Debug, Default)]
pub struct TestCommandBuffer {
    pub markers: Vec<String>,
}

impl CommandBufferHandle for TestCommandBuffer {
    fn label(&self) -> Option<&str> {
        Some("test-cb")
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Replays a fixed list of readings for one statistic, then reports nothing.
#[derive(Debug)]
pub struct ScriptedProvider {
    pub name: &'static str,
    pub index: StatIndex,
    pub script: Mutex<VecDeque<f32>>,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, index: StatIndex, script: &[f32]) -> Self {
        Self {
            name,
            index,
            script: Mutex::new(script.iter().copied().collect()),
        }
    }
}

impl StatsProvider for ScriptedProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }

    fn is_available(&self, index: StatIndex) -> bool {
        index == self.index
    }

    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
        let value = self.script.lock().unwrap().pop_front().ok_or_else(|| StatsError::ProviderFailure {
            provider: self.name.to_owned(),
            reason: "script exhausted".to_owned(),
        })?;
        Ok(request.stats.iter().map(|&index| (index, value)).collect())
    }
}

/// Reports 1, 2, 3, ... for each supported statistic, one step per sample,
/// and records what every call asked for.
#[derive(Debug, Clone)]
pub struct CountingProvider {
    pub name: &'static str,
    pub supported: Vec<StatIndex>,
    pub samples: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<(Vec<StatIndex>, Option<u32>)>>>,
    /// Extra readings reported on every call, owned or not.
    pub extra: Counters,
}

impl CountingProvider {
    pub fn new(name: &'static str, supported: &[StatIndex]) -> Self {
        Self {
            name,
            supported: supported.to_vec(),
            samples: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            extra: Counters::new(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }

    /// Blocks until at least `count` samples were taken or `timeout` expires.
    pub fn wait_for_samples(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.sample_count() < count {
            if Instant::now() > deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        true
    }
}

impl StatsProvider for CountingProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }

    fn is_available(&self, index: StatIndex) -> bool {
        self.supported.contains(&index)
    }

    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
        self.requests
            .lock()
            .unwrap()
            .push((request.stats.to_vec(), request.active_frame_index));
        let step = self.samples.fetch_add(1, Ordering::SeqCst) + 1;

        let mut counters: Counters = request
            .stats
            .iter()
            .map(|&index| (index, step as f32))
            .collect();
        counters.extend(self.extra.iter().map(|(&index, &value)| (index, value)));
        Ok(counters)
    }
}

/// Records command-buffer events and stamps a marker into the buffer.
#[derive(Debug, Clone)]
pub struct HookRecorder {
    pub name: &'static str,
    pub wants_hooks: bool,
    pub events: Arc<Mutex<Vec<(&'static str, u32)>>>,
}

impl HookRecorder {
    pub fn new(name: &'static str, wants_hooks: bool) -> Self {
        Self {
            name,
            wants_hooks,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<(&'static str, u32)> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: &'static str, cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        self.events.lock().unwrap().push((event, frame_index));
        if let Some(cb) = cb.as_any_mut().downcast_mut::<TestCommandBuffer>() {
            cb.markers.push(format!("{}:{event}:{frame_index}", self.name));
        }
    }
}

impl StatsProvider for HookRecorder {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }

    fn is_available(&self, index: StatIndex) -> bool {
        index == StatIndex::GpuCycles
    }

    fn sample(&self, _request: &SampleRequest<'_>) -> StatsResult<Counters> {
        Ok(Counters::new())
    }

    fn wants_command_buffer_hooks(&self) -> bool {
        self.wants_hooks
    }

    fn command_buffer_begun(&self, cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        self.record("begun", cb, frame_index);
    }

    fn command_buffer_ending(&self, cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        self.record("ending", cb, frame_index);
    }
}

/// A provider that overrides how its statistic is displayed.
#[derive(Debug)]
pub struct LabelledProvider;

impl StatsProvider for LabelledProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("labelled")
    }

    fn is_available(&self, index: StatIndex) -> bool {
        index == StatIndex::GpuCycles
    }

    fn graph_data(&self, _index: StatIndex) -> StatGraphData {
        StatGraphData::new("Shader core cycles", "Mcycles/s", 1, 1e-6)
    }

    fn sample(&self, _request: &SampleRequest<'_>) -> StatsResult<Counters> {
        Ok(Counters::new())
    }
}

/// Panics inside `sample`, after raising `entered`.
#[derive(Debug)]
pub struct PanickingProvider {
    pub entered: Arc<AtomicBool>,
}

impl StatsProvider for PanickingProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("panicking")
    }

    fn is_available(&self, index: StatIndex) -> bool {
        index == StatIndex::GpuCycles
    }

    fn sample(&self, _request: &SampleRequest<'_>) -> StatsResult<Counters> {
        self.entered.store(true, Ordering::SeqCst);
        panic!("counter read failed");
    }
}

/// A hooked provider whose samples take `delay`, like a counter read
/// waiting on the GPU.
#[derive(Debug)]
pub struct SlowHookedProvider {
    pub delay: Duration,
    pub sampling: Arc<AtomicBool>,
    pub hooks: Arc<Mutex<Vec<u32>>>,
}

impl SlowHookedProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sampling: Arc::new(AtomicBool::new(false)),
            hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl StatsProvider for SlowHookedProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("slow")
    }

    fn is_available(&self, index: StatIndex) -> bool {
        index == StatIndex::GpuCycles
    }

    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
        self.sampling.store(true, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        Ok(request.stats.iter().map(|&index| (index, 1.0)).collect())
    }

    fn wants_command_buffer_hooks(&self) -> bool {
        true
    }

    fn command_buffer_begun(&self, _cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        self.hooks.lock().unwrap().push(frame_index);
    }
}

/// A backend whose probe always fails.
pub struct UnusableBackend;

impl ProviderBackend for UnusableBackend {
    fn name(&self) -> &str {
        "unusable"
    }

    fn probe(&self, _context: &ProbeContext<'_>) -> StatsResult<Box<dyn StatsProvider>> {
        Err(StatsError::BackendUnavailable {
            backend: self.name().to_owned(),
            reason: "no such driver".to_owned(),
        })
    }
}

/// A backend yielding a clone of the given provider, recording the probe context.
pub struct CountingBackend {
    pub provider: CountingProvider,
    pub probed_framebuffers: Arc<AtomicUsize>,
}

impl ProviderBackend for CountingBackend {
    fn name(&self) -> &str {
        "counting"
    }

    fn probe(&self, context: &ProbeContext<'_>) -> StatsResult<Box<dyn StatsProvider>> {
        self.probed_framebuffers
            .store(context.num_framebuffers, Ordering::SeqCst);
        Ok(Box::new(self.provider.clone()))
    }
}
