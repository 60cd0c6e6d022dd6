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

//! Background thread sampling providers at a fixed interval.

use super::registry::{sample_slots, ProviderSlot};
use crossbeam_channel::{RecvTimeoutError, Sender};
use framestat_core::stats::{Counters, StatsError, StatsResult};
use framestat_core::Stopwatch;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Lifecycle of the continuous-sampling worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// No worker is running: polling mode, or the worker exited on its own
    /// (a provider panicked) and has not been joined yet.
    Stopped,
    /// The worker is sampling.
    Running,
    /// The stop signal was sent and the engine is waiting for the join.
    StopRequested,
    /// The worker has been joined. A joined worker cannot be restarted.
    Joined,
}

/// Samples produced by the worker and not yet merged by the frame update.
#[derive(Debug)]
pub(crate) struct PendingSamples {
    queue: Mutex<PendingQueue>,
}

#[derive(Debug)]
struct PendingQueue {
    samples: VecDeque<Counters>,
    capacity: usize,
    dropped: u64,
}

impl PendingSamples {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Mutex::new(PendingQueue {
                samples: VecDeque::with_capacity(capacity.min(64)),
                capacity,
                dropped: 0,
            }),
        }
    }

    /// Appends a sample, evicting the oldest one if the queue is full.
    pub(crate) fn push(&self, sample: Counters) {
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        if queue.samples.len() >= queue.capacity {
            queue.samples.pop_front();
            queue.dropped += 1;
            if queue.dropped.is_power_of_two() {
                log::warn!(
                    "Pending stats queue is full ({} samples); {} sample(s) dropped so far.",
                    queue.capacity,
                    queue.dropped
                );
            }
        }
        queue.samples.push_back(sample);
    }

    /// Moves every pending sample out, oldest first.
    pub(crate) fn drain(&self) -> VecDeque<Counters> {
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut queue.samples)
    }

    /// Number of samples evicted because the queue was full.
    pub(crate) fn dropped(&self) -> u64 {
        match self.queue.lock() {
            Ok(queue) => queue.dropped,
            Err(poisoned) => poisoned.into_inner().dropped,
        }
    }
}

/// Owns the worker thread and the queue it fills.
#[derive(Debug)]
pub(crate) struct ContinuousSampler {
    pending: Arc<PendingSamples>,
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
    state: WorkerState,
}

impl ContinuousSampler {
    /// Spawns the worker. It samples `slots` every `interval` until stopped.
    pub(crate) fn start(
        slots: Arc<[ProviderSlot]>,
        interval: Duration,
        max_pending_samples: usize,
    ) -> StatsResult<Self> {
        let pending = Arc::new(PendingSamples::new(max_pending_samples));
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let queue = Arc::clone(&pending);

        let handle = thread::Builder::new()
            .name("framestat-sampler".to_owned())
            .spawn(move || {
                log::debug!("Stats sampling thread started ({interval:?} interval).");
                let mut timer = Stopwatch::new();

                loop {
                    match stop_rx.recv_timeout(interval.saturating_sub(timer.elapsed())) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let delta_time = timer.lap().as_secs_f32();
                    let sample = sample_slots(&slots, delta_time, None);
                    queue.push(sample);
                }

                log::debug!("Stats sampling thread stopped.");
            })
            .map_err(|e| StatsError::WorkerSpawnFailed(e.to_string()))?;

        Ok(Self {
            pending,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            state: WorkerState::Running,
        })
    }

    pub(crate) fn state(&self) -> WorkerState {
        match &self.handle {
            Some(handle) if self.state == WorkerState::Running && handle.is_finished() => {
                WorkerState::Stopped
            }
            _ => self.state,
        }
    }

    pub(crate) fn pending(&self) -> &PendingSamples {
        &self.pending
    }

    /// Signals the worker and blocks until it has exited.
    ///
    /// Calling it again after a successful join is a no-op.
    pub(crate) fn stop(&mut self) -> StatsResult<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            self.state = WorkerState::StopRequested;
            // A send error only means the worker already exited.
            let _ = stop_tx.send(());
        }

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let joined = handle.join();
        self.state = WorkerState::Joined;
        joined.map_err(|_| {
            log::error!("Stats sampling thread panicked.");
            StatsError::WorkerJoinFailed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f32) -> Counters {
        Counters::from([(framestat_core::stats::StatIndex::GpuCycles, value)])
    }

    #[test]
    fn drain_returns_samples_in_production_order() {
        let pending = PendingSamples::new(8);
        pending.push(sample(1.0));
        pending.push(sample(2.0));

        let drained: Vec<_> = pending.drain().into_iter().collect();
        assert_eq!(drained, vec![sample(1.0), sample(2.0)]);
        assert!(pending.drain().is_empty());
    }

    #[test]
    fn full_queue_drops_the_oldest_sample() {
        let pending = PendingSamples::new(2);
        pending.push(sample(1.0));
        pending.push(sample(2.0));
        pending.push(sample(3.0));

        assert_eq!(pending.dropped(), 1);
        let drained: Vec<_> = pending.drain().into_iter().collect();
        assert_eq!(drained, vec![sample(2.0), sample(3.0)]);
    }

    #[test]
    fn worker_with_no_providers_stops_promptly() {
        let slots: Arc<[ProviderSlot]> = Arc::from(Vec::new());
        let mut sampler =
            ContinuousSampler::start(slots, Duration::from_secs(60), 16).unwrap();
        assert_eq!(sampler.state(), WorkerState::Running);

        let timer = Stopwatch::new();
        sampler.stop().unwrap();
        assert!(timer.elapsed() < Duration::from_secs(5));
        assert_eq!(sampler.state(), WorkerState::Joined);

        // Stopping twice is harmless.
        sampler.stop().unwrap();
        assert_eq!(sampler.state(), WorkerState::Joined);
    }
}
