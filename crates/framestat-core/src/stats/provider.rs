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

//! The contract between the statistics engine and counter sources.

use super::error::StatsResult;
use super::graph::{default_graph_data, StatGraphData};
use super::handle::{CommandBufferHandle, DeviceHandle};
use super::index::StatIndex;
use super::sampling::CounterSamplingConfig;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

/// One raw sample: the readings produced by a single provider call.
///
/// A statistic the provider could not read this cycle is simply absent.
pub type Counters = HashMap<StatIndex, f32>;

/// Arguments of a single [`StatsProvider::sample`] call.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest<'a> {
    /// The statistics this provider owns; it should only report these.
    pub stats: &'a [StatIndex],
    /// Time since the previous sample of the calling thread, in seconds.
    pub delta_time: f32,
    /// The active frame-buffer index when sampling from the frame update,
    /// `None` when sampling from the continuous worker.
    pub active_frame_index: Option<u32>,
}

/// A source of counter readings.
///
/// A `StatsProvider` is a stateful object, typically living in `framestat-infra`
/// or in the host application, that knows how to read some statistics on the
/// current platform. The engine resolves which provider owns each statistic once,
/// at construction, and from then on only asks a provider for the statistics it owns.
///
/// In continuous mode `sample` runs on the engine's worker thread while the
/// command-buffer hooks run on the recording thread, possibly at the same time.
/// Every method therefore takes `&self`; a provider guards its own mutable
/// state, and must not make the hooks wait on a sample in progress.
pub trait StatsProvider: Send + Sync + Debug {
    /// Returns a unique, human-readable identifier for this provider.
    fn name(&self) -> Cow<'static, str>;

    /// Returns whether this provider can supply `index` on this platform.
    fn is_available(&self, index: StatIndex) -> bool;

    /// Returns the presentation metadata for `index`.
    fn graph_data(&self, index: StatIndex) -> StatGraphData {
        default_graph_data(index)
    }

    /// Reads the requested statistics now.
    ///
    /// Returning an error means "no sample this tick"; it never stops the engine.
    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters>;

    /// Whether this provider needs to inject commands into tracked command buffers.
    fn wants_command_buffer_hooks(&self) -> bool {
        false
    }

    /// A tracked command buffer has just begun recording.
    fn command_buffer_begun(&self, _cb: &mut dyn CommandBufferHandle, _frame_index: u32) {
        // Default: no-op
    }

    /// A tracked command buffer is about to end recording.
    fn command_buffer_ending(&self, _cb: &mut dyn CommandBufferHandle, _frame_index: u32) {
        // Default: no-op
    }
}

/// Everything a backend may inspect when deciding whether it can run.
#[derive(Clone, Copy)]
pub struct ProbeContext<'a> {
    /// The device statistics are collected on.
    pub device: &'a dyn DeviceHandle,
    /// Number of frames that can be in flight; providers keeping per-frame
    /// GPU state (e.g. query pools) size it from this.
    pub num_framebuffers: usize,
    /// The statistics the host asked for.
    pub requested: &'a BTreeSet<StatIndex>,
    /// The engine's sampling configuration.
    pub sampling: CounterSamplingConfig,
}

/// A factory that probes the platform and, if usable, creates a provider.
pub trait ProviderBackend {
    /// Name of the backend, used in logs.
    fn name(&self) -> &str;

    /// Attempts to create a provider.
    ///
    /// An error means the backend is unusable here; the engine logs it and
    /// moves on to the next candidate.
    fn probe(&self, context: &ProbeContext<'_>) -> StatsResult<Box<dyn StatsProvider>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ConstantProvider;

    impl StatsProvider for ConstantProvider {
        fn name(&self) -> Cow<'static, str> {
            Cow::Borrowed("constant")
        }

        fn is_available(&self, index: StatIndex) -> bool {
            index == StatIndex::GpuCycles
        }

        fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
            Ok(request.stats.iter().map(|&index| (index, 1.0)).collect())
        }
    }

    struct NullCommandBuffer;

    impl CommandBufferHandle for NullCommandBuffer {
        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    #[test]
    fn default_hooks_are_inert() {
        let provider = ConstantProvider;
        assert!(!provider.wants_command_buffer_hooks());
        let mut cb = NullCommandBuffer;
        provider.command_buffer_begun(&mut cb, 0);
        provider.command_buffer_ending(&mut cb, 0);
        assert!(cb.label().is_none());
    }

    #[test]
    fn default_graph_data_is_used() {
        let provider = ConstantProvider;
        assert_eq!(
            provider.graph_data(StatIndex::GpuCycles),
            default_graph_data(StatIndex::GpuCycles)
        );
    }

    #[test]
    fn sample_reports_requested_stats_only() {
        let provider = ConstantProvider;
        let stats = [StatIndex::GpuCycles];
        let counters = provider
            .sample(&SampleRequest {
                stats: &stats,
                delta_time: 0.016,
                active_frame_index: Some(0),
            })
            .unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[&StatIndex::GpuCycles], 1.0);
    }
}
