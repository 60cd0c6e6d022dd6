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

//! A fake GPU and the provider reading its counters.

use framestat_core::stats::{
    CommandBufferHandle, Counters, DeviceHandle, ProbeContext, ProviderBackend, SampleRequest,
    StatIndex, StatScaling, StatsError, StatsProvider, StatsResult,
};
use std::any::Any;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct SimulatedDevice {
    name: String,
}

impl SimulatedDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DeviceHandle for SimulatedDevice {
    fn device_name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stands in for a recorded command buffer; collects the markers written into it.
#[derive(Debug, Default)]
pub struct SimulatedCommandBuffer {
    pub markers: Vec<&'static str>,
}

impl CommandBufferHandle for SimulatedCommandBuffer {
    fn label(&self) -> Option<&str> {
        Some("main pass")
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

const SUPPORTED: [(StatIndex, StatScaling); 4] = [
    (StatIndex::GpuCycles, StatScaling::ByDeltaTime),
    (StatIndex::GpuFragmentCycles, StatScaling::ByDeltaTime),
    (StatIndex::GpuExtReadBytes, StatScaling::ByDeltaTime),
    (
        StatIndex::GpuExtReadStalls,
        StatScaling::ByCounter(StatIndex::GpuCycles),
    ),
];

/// Produces plausible GPU counters from a clock instead of hardware.
#[derive(Debug)]
pub struct SimulatedGpuProvider {
    epoch: Instant,
    frames_in_flight: usize,
    passes_recorded: AtomicU64,
}

impl SimulatedGpuProvider {
    fn raw_counter(&self, index: StatIndex, delta_time: f32) -> f64 {
        let t = self.epoch.elapsed().as_secs_f64();
        let load = 0.75 + 0.2 * (t * 1.3).sin();
        let cycles = 800.0e6 * load * f64::from(delta_time);
        match index {
            StatIndex::GpuCycles => cycles,
            StatIndex::GpuFragmentCycles => cycles * 0.6,
            StatIndex::GpuExtReadBytes => 4.0e9 * load * f64::from(delta_time),
            StatIndex::GpuExtReadStalls => cycles * 0.05 * (1.0 + (t * 0.4).cos()),
            _ => 0.0,
        }
    }
}

impl StatsProvider for SimulatedGpuProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("simulated_gpu")
    }

    fn is_available(&self, index: StatIndex) -> bool {
        SUPPORTED.iter().any(|(supported, _)| *supported == index)
    }

    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
        let mut counters = Counters::new();
        for &(index, scaling) in &SUPPORTED {
            if !request.stats.contains(&index) {
                continue;
            }
            let divisor = match scaling {
                StatScaling::ByCounter(other) => Some(self.raw_counter(other, request.delta_time)),
                _ => None,
            };
            let raw = self.raw_counter(index, request.delta_time);
            if let Some(value) = scaling.apply(raw, request.delta_time, divisor) {
                counters.insert(index, value as f32);
            }
        }
        Ok(counters)
    }

    fn wants_command_buffer_hooks(&self) -> bool {
        true
    }

    fn command_buffer_begun(&self, cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        if let Some(cb) = cb.as_any_mut().downcast_mut::<SimulatedCommandBuffer>() {
            cb.markers.push("timestamp:begin");
        }
        log::trace!(
            "Pass {} begun on frame buffer {frame_index}/{}",
            self.passes_recorded.load(Ordering::Relaxed),
            self.frames_in_flight
        );
    }

    fn command_buffer_ending(&self, cb: &mut dyn CommandBufferHandle, _frame_index: u32) {
        if let Some(cb) = cb.as_any_mut().downcast_mut::<SimulatedCommandBuffer>() {
            cb.markers.push("timestamp:end");
        }
        self.passes_recorded.fetch_add(1, Ordering::Relaxed);
    }
}

/// Accepts only [`SimulatedDevice`]s.
pub struct SimulatedGpuBackend;

impl ProviderBackend for SimulatedGpuBackend {
    fn name(&self) -> &str {
        "simulated_gpu"
    }

    fn probe(&self, context: &ProbeContext<'_>) -> StatsResult<Box<dyn StatsProvider>> {
        if context.device.as_any().downcast_ref::<SimulatedDevice>().is_none() {
            return Err(StatsError::BackendUnavailable {
                backend: self.name().to_owned(),
                reason: format!("'{}' is not a simulated device", context.device.device_name()),
            });
        }
        Ok(Box::new(SimulatedGpuProvider {
            epoch: Instant::now(),
            frames_in_flight: context.num_framebuffers,
            passes_recorded: AtomicU64::new(0),
        }))
    }
}
