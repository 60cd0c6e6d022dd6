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

// Frame statistics sandbox
// Renders nothing: a fake frame loop feeds the engine and the series are logged.

mod simulated;

use anyhow::Result;
use framestat_core::stats::StatIndex;
use framestat_core::Stopwatch;
use framestat_infra::SysinfoBackend;
use framestat_telemetry::{Stats, StatsConfig};
use simulated::{SimulatedCommandBuffer, SimulatedDevice, SimulatedGpuBackend};
use std::time::Duration;

const FRAMES_IN_FLIGHT: usize = 3;
const FRAME_COUNT: u32 = 240;
const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_667);
const GRAPH_WIDTH: u32 = 1280;

fn load_config() -> Result<StatsConfig> {
    match std::env::args().nth(1) {
        Some(path) => StatsConfig::from_file(path),
        None => Ok(StatsConfig::new([
            StatIndex::FrameTime,
            StatIndex::CpuUtilization,
            StatIndex::MemoryUtilization,
            StatIndex::GpuCycles,
            StatIndex::GpuFragmentCycles,
            StatIndex::GpuExtReadBytes,
            StatIndex::GpuExtReadStalls,
            StatIndex::GpuTiles,
        ])
        .with_continuous_sampling(Duration::from_millis(5))),
    }
}

fn log_series(stats: &Stats) {
    for &index in stats.get_requested_stats() {
        let graph = stats.get_graph_data(index);
        let data = stats.get_data(index);
        match data.latest() {
            Some(latest) => log::info!(
                "{:<28} {:>14}  (avg {}, axis 0..{:.*}, {} samples)",
                graph.name,
                graph.format_value(latest),
                graph.format_value(data.average()),
                graph.precision,
                graph.axis_max(data.iter()),
                data.len()
            ),
            None if stats.is_available(index) => log::info!("{:<28} (no samples yet)", graph.name),
            None => log::info!("{:<28} unavailable", graph.name),
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let device = SimulatedDevice::new("Simulated GPU");
    let mut stats = Stats::builder(config)
        .backend(SimulatedGpuBackend)
        .backend(SysinfoBackend)
        .build(&device, FRAMES_IN_FLIGHT)?;
    stats.resize(GRAPH_WIDTH);

    let mut frame_timer = Stopwatch::new();
    for frame in 0..FRAME_COUNT {
        let frame_index = frame % FRAMES_IN_FLIGHT as u32;

        let mut cb = SimulatedCommandBuffer::default();
        stats.command_buffer_begun(&mut cb, frame_index);
        std::thread::sleep(TARGET_FRAME_TIME.saturating_sub(frame_timer.elapsed()));
        stats.command_buffer_ending(&mut cb, frame_index);
        log::trace!("Frame {frame} markers: {:?}", cb.markers);

        let delta_time = frame_timer.lap().as_secs_f32();
        stats.update(delta_time, frame_index);

        if frame % 60 == 59 {
            log::info!("--- frame {} ---", frame + 1);
            log_series(&stats);
        }
    }

    if stats.dropped_samples() > 0 {
        log::warn!("{} worker sample(s) were dropped.", stats.dropped_samples());
    }
    stats.shutdown()?;
    Ok(())
}
