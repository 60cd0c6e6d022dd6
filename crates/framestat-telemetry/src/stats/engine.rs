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

//! The statistics engine: per-frame sampling, smoothing and history.

use super::buffer::CircularBuffer;
use super::registry::{Candidate, ProviderRegistry};
use super::smoothing::SmoothingState;
use super::worker::{ContinuousSampler, WorkerState};
use crate::config::StatsConfig;
use crate::providers::FrameTimeProvider;
use framestat_core::stats::{
    default_graph_data, CommandBufferHandle, CounterSamplingConfig, Counters, DeviceHandle,
    ProbeContext, ProviderBackend, StatGraphData, StatIndex, StatsError, StatsProvider,
    StatsResult,
};
use std::collections::BTreeSet;

/// Horizontal pixels per graph sample when deriving capacity from a width.
pub const PIXELS_PER_SAMPLE: u32 = 16;

#[derive(Debug)]
struct StatSlot {
    buffer: CircularBuffer<f32>,
    graph: StatGraphData,
}

/// Collects, smooths and stores the requested statistics.
///
/// Build one with [`Stats::builder`], call [`update`](Self::update) once per
/// frame and read the histories with [`get_data`](Self::get_data). In
/// continuous mode a background thread samples the providers and `update`
/// only merges what it collected; the thread is stopped when the engine is
/// dropped or [`shut down`](Self::shutdown).
#[derive(Debug)]
pub struct Stats {
    requested: BTreeSet<StatIndex>,
    sampling: CounterSamplingConfig,
    registry: ProviderRegistry,
    slots: [Option<StatSlot>; StatIndex::COUNT],
    smoothing: SmoothingState,
    capacity: usize,
    sampler: Option<ContinuousSampler>,
}

impl Stats {
    /// Starts building an engine with the given configuration.
    pub fn builder(config: StatsConfig) -> StatsBuilder {
        StatsBuilder {
            config,
            candidates: Vec::new(),
            frame_time_provider: None,
        }
    }

    /// Samples (polling) or merges worker samples (continuous) for this frame.
    ///
    /// `delta_time` is the frame duration in seconds and `active_frame_index`
    /// the frame buffer currently being recorded. In continuous mode an update
    /// finding no worker samples leaves every buffer untouched; otherwise the
    /// frame time joins the newest worker sample.
    pub fn update(&mut self, delta_time: f32, active_frame_index: u32) {
        match self.sampler.as_ref().map(|sampler| sampler.pending().drain()) {
            Some(mut pending) => {
                let Some(newest) = pending.back_mut() else {
                    return;
                };
                newest.extend(
                    self.registry
                        .sample_frame_time(delta_time, active_frame_index),
                );
                for worker_sample in pending {
                    self.merge(worker_sample);
                }
            }
            None => {
                let mut sample = self
                    .registry
                    .sample_frame_time(delta_time, active_frame_index);
                sample.extend(
                    self.registry
                        .sample_providers(delta_time, active_frame_index),
                );
                self.merge(sample);
            }
        }
    }

    fn merge(&mut self, sample: Counters) {
        for (index, raw) in sample {
            if !raw.is_finite() {
                log::debug!("Discarding non-finite reading for '{index}': {raw}");
                continue;
            }
            let Some(slot) = self.slots[index.as_usize()].as_mut() else {
                continue;
            };
            let smoothed = self.smoothing.apply(index, raw);
            log::trace!("{index}: raw {raw}, smoothed {smoothed}");
            slot.buffer.push(smoothed);
        }
    }

    /// Forwards "command buffer begun" to every provider that instruments command buffers.
    pub fn command_buffer_begun(&self, cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        self.registry
            .for_each_hooked(|provider| provider.command_buffer_begun(&mut *cb, frame_index));
    }

    /// Forwards "command buffer ending" to every provider that instruments command buffers.
    pub fn command_buffer_ending(&self, cb: &mut dyn CommandBufferHandle, frame_index: u32) {
        self.registry
            .for_each_hooked(|provider| provider.command_buffer_ending(&mut *cb, frame_index));
    }

    /// Re-derives every buffer's capacity from the graph width in pixels.
    ///
    /// History and smoothing state are discarded.
    pub fn resize(&mut self, width: u32) {
        let capacity = ((width / PIXELS_PER_SAMPLE) as usize).max(1);
        log::debug!("Resizing stats buffers to {capacity} samples ({width} px).");

        self.capacity = capacity;
        for slot in self.slots.iter_mut().flatten() {
            slot.buffer = CircularBuffer::new(capacity);
        }
        self.smoothing.reset();
    }

    /// Returns `true` if some provider supplies `index`.
    pub fn is_available(&self, index: StatIndex) -> bool {
        self.registry.is_owned(index)
    }

    /// Returns the history of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not part of the requested set.
    pub fn get_data(&self, index: StatIndex) -> &CircularBuffer<f32> {
        match self.try_get_data(index) {
            Ok(buffer) => buffer,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the history of `index`, or [`StatsError::NotRequested`].
    pub fn try_get_data(&self, index: StatIndex) -> StatsResult<&CircularBuffer<f32>> {
        self.slot(index).map(|slot| &slot.buffer)
    }

    /// Returns how `index` should be displayed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not part of the requested set.
    pub fn get_graph_data(&self, index: StatIndex) -> &StatGraphData {
        match self.slot(index) {
            Ok(slot) => &slot.graph,
            Err(e) => panic!("{e}"),
        }
    }

    fn slot(&self, index: StatIndex) -> StatsResult<&StatSlot> {
        self.slots[index.as_usize()]
            .as_ref()
            .ok_or(StatsError::NotRequested(index))
    }

    /// Returns the statistics requested at construction.
    pub fn get_requested_stats(&self) -> &BTreeSet<StatIndex> {
        &self.requested
    }

    /// Returns the name of the provider supplying `index`, if any.
    pub fn provider_name(&self, index: StatIndex) -> Option<&str> {
        self.registry.owner_name(index)
    }

    /// Returns the sampling configuration.
    pub fn sampling_config(&self) -> CounterSamplingConfig {
        self.sampling
    }

    /// Returns the current capacity of every buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the smoothing factor.
    pub fn smoothing_alpha(&self) -> f32 {
        self.smoothing.alpha()
    }

    /// Returns the lifecycle state of the continuous-sampling worker.
    pub fn worker_state(&self) -> WorkerState {
        self.sampler
            .as_ref()
            .map_or(WorkerState::Stopped, ContinuousSampler::state)
    }

    /// Returns how many worker samples were dropped because the pending queue was full.
    pub fn dropped_samples(&self) -> u64 {
        self.sampler
            .as_ref()
            .map_or(0, |sampler| sampler.pending().dropped())
    }

    /// Stops the continuous-sampling worker, reporting a worker panic.
    ///
    /// Dropping the engine does the same but panics on a failed join.
    pub fn shutdown(mut self) -> StatsResult<()> {
        match self.sampler.as_mut() {
            Some(sampler) => sampler.stop(),
            None => Ok(()),
        }
    }
}

impl Drop for Stats {
    fn drop(&mut self) {
        let Some(sampler) = self.sampler.as_mut() else {
            return;
        };
        if let Err(e) = sampler.stop() {
            if !std::thread::panicking() {
                panic!("{e}");
            }
        }
    }
}

/// Assembles a [`Stats`] engine from a configuration and provider candidates.
///
/// Candidates are consulted in registration order: for each requested
/// statistic, the first provider supporting it owns it.
pub struct StatsBuilder {
    config: StatsConfig,
    candidates: Vec<Candidate>,
    frame_time_provider: Option<Box<dyn StatsProvider>>,
}

impl StatsBuilder {
    /// Adds a backend, probed when the engine is built.
    pub fn backend(mut self, backend: impl ProviderBackend + 'static) -> Self {
        self.candidates.push(Candidate::Backend(Box::new(backend)));
        self
    }

    /// Adds an already created provider.
    pub fn provider(mut self, provider: impl StatsProvider + 'static) -> Self {
        self.candidates.push(Candidate::Provider(Box::new(provider)));
        self
    }

    /// Replaces the built-in [`FrameTimeProvider`].
    pub fn frame_time_provider(mut self, provider: impl StatsProvider + 'static) -> Self {
        self.frame_time_provider = Some(Box::new(provider));
        self
    }

    /// Validates the configuration, resolves providers and, in continuous
    /// mode, starts the sampling worker.
    pub fn build(self, device: &dyn DeviceHandle, num_framebuffers: usize) -> StatsResult<Stats> {
        let Self {
            config,
            candidates,
            frame_time_provider,
        } = self;

        config.validate()?;
        let sampling = config.sampling_config()?;
        let requested = config.requested_stats.clone();

        let context = ProbeContext {
            device,
            num_framebuffers,
            requested: &requested,
            sampling,
        };
        let frame_time_provider =
            frame_time_provider.unwrap_or_else(|| Box::new(FrameTimeProvider::new()));
        let registry = ProviderRegistry::resolve(frame_time_provider, candidates, &context);

        let capacity = config.buffer_size;
        let slots = std::array::from_fn(|i| {
            let index = StatIndex::ALL[i];
            requested.contains(&index).then(|| StatSlot {
                buffer: CircularBuffer::new(capacity),
                graph: registry
                    .graph_data(index)
                    .unwrap_or_else(|| default_graph_data(index)),
            })
        });

        let sampler = if sampling.is_continuous() {
            Some(ContinuousSampler::start(
                registry.shared_slots(),
                sampling.interval,
                config.max_pending_samples,
            )?)
        } else {
            None
        };

        let available = requested.iter().filter(|&&i| registry.is_owned(i)).count();
        log::info!(
            "Stats engine ready on '{}': {available}/{} requested stat(s) available, {:?} sampling.",
            device.device_name(),
            requested.len(),
            sampling.mode
        );

        Ok(Stats {
            requested,
            sampling,
            registry,
            slots,
            smoothing: SmoothingState::new(config.smoothing_alpha),
            capacity,
            sampler,
        })
    }
}
