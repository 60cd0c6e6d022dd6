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

mod common;

use common::*;
use framestat_core::stats::{StatIndex, StatsError};
use framestat_core::Stopwatch;
use framestat_telemetry::{Stats, StatsConfig, WorkerState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(10);

fn continuous(stats: &[StatIndex], interval: Duration) -> StatsConfig {
    StatsConfig::new(stats.iter().copied())
        .with_continuous_sampling(interval)
        .with_smoothing_alpha(1.0)
        .with_buffer_size(1024)
}

#[test]
fn test_no_worker_samples_leaves_buffers_unchanged() {
    let provider = CountingProvider::new("counting", &[StatIndex::GpuCycles]);
    let mut stats = Stats::builder(continuous(
        &[StatIndex::FrameTime, StatIndex::GpuCycles],
        Duration::from_secs(60),
    ))
    .provider(provider.clone())
    .build(&TestDevice, 3)
    .unwrap();
    assert_eq!(stats.worker_state(), WorkerState::Running);

    for _ in 0..5 {
        stats.update(0.016, 0);
    }

    // Frame time included: nothing is smoothed until the worker delivers.
    assert!(stats.get_data(StatIndex::FrameTime).is_empty());
    assert!(stats.get_data(StatIndex::GpuCycles).is_empty());
    assert_eq!(provider.sample_count(), 0);
}

#[test]
fn test_frame_time_joins_worker_samples() {
    let provider = CountingProvider::new("counting", &[StatIndex::GpuCycles]);
    let mut stats = Stats::builder(continuous(
        &[StatIndex::FrameTime, StatIndex::GpuCycles],
        Duration::from_millis(1),
    ))
    .provider(provider.clone())
    .build(&TestDevice, 3)
    .unwrap();

    assert!(provider.wait_for_samples(3, WAIT));
    stats.update(0.016, 0);

    // One frame-time reading per update, however many worker samples it drained.
    assert_eq!(stats.get_data(StatIndex::FrameTime).to_vec(), vec![0.016]);
    assert!(!stats.get_data(StatIndex::GpuCycles).is_empty());
}

#[test]
fn test_worker_samples_are_merged_in_production_order() {
    let provider = CountingProvider::new("counting", &[StatIndex::GpuCycles]);
    let mut stats = Stats::builder(continuous(&[StatIndex::GpuCycles], Duration::from_millis(1)))
        .provider(provider.clone())
        .build(&TestDevice, 3)
        .unwrap();

    assert!(provider.wait_for_samples(5, WAIT));
    stats.update(0.016, 0);
    assert!(provider.wait_for_samples(provider.sample_count() + 5, WAIT));
    stats.update(0.016, 0);

    let data = stats.get_data(StatIndex::GpuCycles).to_vec();
    assert!(data.len() >= 5, "only {} samples merged", data.len());
    assert_eq!(data[0], 1.0);
    for pair in data.windows(2) {
        assert_eq!(pair[1], pair[0] + 1.0, "out of order: {data:?}");
    }

    // The worker samples without a frame index.
    let requests = provider.requests.lock().unwrap();
    assert!(requests
        .iter()
        .all(|(owned, frame)| owned == &vec![StatIndex::GpuCycles] && frame.is_none()));
}

#[test]
fn test_full_queue_drops_oldest_samples() {
    let provider = CountingProvider::new("counting", &[StatIndex::GpuCycles]);
    let mut stats = Stats::builder(
        continuous(&[StatIndex::GpuCycles], Duration::from_millis(1)).with_max_pending_samples(2),
    )
    .provider(provider.clone())
    .build(&TestDevice, 3)
    .unwrap();

    assert!(provider.wait_for_samples(10, WAIT));
    assert!(stats.dropped_samples() >= 1);

    stats.update(0.016, 0);
    let data = stats.get_data(StatIndex::GpuCycles).to_vec();
    assert!(data.len() <= 2, "queue bound exceeded: {data:?}");
    assert!(data.iter().all(|&value| value > 1.0));
}

#[test]
fn test_drop_while_waiting_is_prompt() {
    let stats = Stats::builder(continuous(&[StatIndex::GpuCycles], Duration::from_secs(60)))
        .provider(CountingProvider::new("counting", &[StatIndex::GpuCycles]))
        .build(&TestDevice, 3)
        .unwrap();

    let timer = Stopwatch::new();
    drop(stats);
    assert!(timer.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_shutdown_joins_the_worker() {
    let stats = Stats::builder(continuous(&[StatIndex::GpuCycles], Duration::from_millis(1)))
        .provider(CountingProvider::new("counting", &[StatIndex::GpuCycles]))
        .build(&TestDevice, 3)
        .unwrap();

    assert_eq!(stats.worker_state(), WorkerState::Running);
    stats.shutdown().unwrap();
}

#[test]
fn test_worker_panic_is_reported_on_shutdown() {
    let entered = Arc::new(AtomicBool::new(false));
    let stats = Stats::builder(continuous(&[StatIndex::GpuCycles], Duration::from_millis(1)))
        .provider(PanickingProvider {
            entered: Arc::clone(&entered),
        })
        .build(&TestDevice, 3)
        .unwrap();

    let timer = Stopwatch::new();
    while !entered.load(Ordering::SeqCst) {
        assert!(timer.elapsed() < WAIT, "provider was never sampled");
        std::thread::sleep(Duration::from_millis(1));
    }

    // The dead worker is no longer reported as running.
    while stats.worker_state() == WorkerState::Running {
        assert!(timer.elapsed() < WAIT, "worker still reported as running");
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(stats.worker_state(), WorkerState::Stopped);

    assert_eq!(stats.shutdown(), Err(StatsError::WorkerJoinFailed));
}

#[test]
fn test_command_buffer_hooks_do_not_wait_for_sampling() {
    let provider = SlowHookedProvider::new(Duration::from_millis(300));
    let sampling = Arc::clone(&provider.sampling);
    let hooks = Arc::clone(&provider.hooks);
    let stats = Stats::builder(continuous(&[StatIndex::GpuCycles], Duration::from_millis(1)))
        .provider(provider)
        .build(&TestDevice, 3)
        .unwrap();

    let timer = Stopwatch::new();
    while !sampling.load(Ordering::SeqCst) {
        assert!(timer.elapsed() < WAIT, "provider was never sampled");
        std::thread::sleep(Duration::from_millis(1));
    }

    let mut cb = TestCommandBuffer::default();
    let hook_timer = Stopwatch::new();
    stats.command_buffer_begun(&mut cb, 1);
    assert!(
        hook_timer.elapsed() < Duration::from_millis(100),
        "hook blocked for {:?}",
        hook_timer.elapsed()
    );
    assert_eq!(*hooks.lock().unwrap(), vec![1]);
}

#[test]
fn test_zero_interval_is_rejected() {
    let result = Stats::builder(continuous(&[StatIndex::GpuCycles], Duration::ZERO))
        .build(&TestDevice, 3);
    assert!(matches!(result, Err(StatsError::InvalidConfig(_))));
}
