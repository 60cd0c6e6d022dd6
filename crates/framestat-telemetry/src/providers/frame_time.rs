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

//! The built-in frame-time source.

use framestat_core::stats::{Counters, SampleRequest, StatIndex, StatsProvider, StatsResult};
use framestat_core::Stopwatch;
use std::borrow::Cow;
use std::sync::Mutex;

/// Reports [`StatIndex::FrameTime`] in seconds.
///
/// The host-supplied delta time is used when it is finite and positive.
/// Otherwise the provider falls back to the time it measured itself since
/// its previous sample.
#[derive(Debug, Default)]
pub struct FrameTimeProvider {
    timer: Mutex<Stopwatch>,
}

impl FrameTimeProvider {
    /// Creates a provider whose fallback clock starts now.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsProvider for FrameTimeProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("frame_time")
    }

    fn is_available(&self, index: StatIndex) -> bool {
        index == StatIndex::FrameTime
    }

    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
        let measured = match self.timer.lock() {
            Ok(mut timer) => timer.lap(),
            Err(poisoned) => poisoned.into_inner().lap(),
        }
        .as_secs_f32();
        let frame_time = if request.delta_time.is_finite() && request.delta_time > 0.0 {
            request.delta_time
        } else {
            measured
        };

        let mut counters = Counters::new();
        if request.stats.contains(&StatIndex::FrameTime) {
            counters.insert(StatIndex::FrameTime, frame_time);
        }
        Ok(counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(delta_time: f32) -> SampleRequest<'static> {
        SampleRequest {
            stats: &[StatIndex::FrameTime],
            delta_time,
            active_frame_index: Some(0),
        }
    }

    #[test]
    fn reports_host_delta_time() {
        let provider = FrameTimeProvider::new();
        let counters = provider.sample(&request(0.016)).unwrap();
        assert_eq!(counters[&StatIndex::FrameTime], 0.016);
    }

    #[test]
    fn falls_back_to_measured_time() {
        let provider = FrameTimeProvider::new();
        std::thread::sleep(std::time::Duration::from_millis(2));

        for delta_time in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let counters = provider.sample(&request(delta_time)).unwrap();
            let value = counters[&StatIndex::FrameTime];
            assert!(value.is_finite() && value >= 0.0, "got {value}");
        }
    }

    #[test]
    fn only_owns_frame_time() {
        let provider = FrameTimeProvider::new();
        assert!(provider.is_available(StatIndex::FrameTime));
        assert!(!provider.is_available(StatIndex::CpuCycles));
        assert!(!provider.wants_command_buffer_hooks());
    }
}
