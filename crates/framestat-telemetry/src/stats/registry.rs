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

//! Priority-ordered provider list and the statistic ownership table.

use framestat_core::stats::{
    Counters, ProbeContext, ProviderBackend, SampleRequest, StatGraphData, StatIndex,
    StatsProvider,
};
use std::sync::Arc;

/// A provider candidate, in the order the host registered it.
pub(crate) enum Candidate {
    /// A backend that must be probed before it yields a provider.
    Backend(Box<dyn ProviderBackend>),
    /// A provider the host already created.
    Provider(Box<dyn StatsProvider>),
}

/// A resolved provider together with the statistics it owns.
///
/// Providers synchronize themselves, so a slot is shared between the worker
/// and the recording thread without a lock of its own.
#[derive(Debug)]
pub(crate) struct ProviderSlot {
    name: String,
    provider: Box<dyn StatsProvider>,
    owned: Vec<StatIndex>,
    hooked: bool,
}

impl ProviderSlot {
    fn new(provider: Box<dyn StatsProvider>) -> Self {
        Self {
            name: provider.name().into_owned(),
            hooked: provider.wants_command_buffer_hooks(),
            provider,
            owned: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Samples the statistics this provider owns and appends them to `out`.
    ///
    /// Readings for statistics the provider does not own are discarded, and a
    /// failed sample contributes nothing.
    pub(crate) fn sample_into(
        &self,
        delta_time: f32,
        active_frame_index: Option<u32>,
        out: &mut Counters,
    ) {
        if self.owned.is_empty() {
            return;
        }

        let request = SampleRequest {
            stats: &self.owned,
            delta_time,
            active_frame_index,
        };
        match self.provider.sample(&request) {
            Ok(counters) => {
                out.extend(
                    counters
                        .into_iter()
                        .filter(|(index, _)| self.owned.contains(index)),
                );
            }
            Err(e) => log::debug!("No sample from '{}' this tick: {e}", self.name),
        }
    }
}

/// Samples every slot in order and merges the readings into one raw sample.
pub(crate) fn sample_slots(
    slots: &[ProviderSlot],
    delta_time: f32,
    active_frame_index: Option<u32>,
) -> Counters {
    let mut sample = Counters::new();
    for slot in slots {
        slot.sample_into(delta_time, active_frame_index, &mut sample);
    }
    sample
}

/// All providers of an engine, resolved once at construction.
///
/// The frame-time provider is kept apart from the others: it is consulted
/// first for [`StatIndex::FrameTime`], owns nothing else, and is sampled from
/// the frame update in both sampling modes, while the other slots are shared
/// with the continuous-sampling worker.
#[derive(Debug)]
pub(crate) struct ProviderRegistry {
    frame_time: ProviderSlot,
    slots: Arc<[ProviderSlot]>,
    // Index into `slots` of each statistic's owner. `usize::MAX` marks the frame-time provider.
    owners: [Option<usize>; StatIndex::COUNT],
}

const FRAME_TIME_OWNER: usize = usize::MAX;

impl ProviderRegistry {
    /// Probes the candidates in priority order and assigns every requested
    /// statistic to the first provider supporting it.
    pub(crate) fn resolve(
        frame_time_provider: Box<dyn StatsProvider>,
        candidates: Vec<Candidate>,
        context: &ProbeContext<'_>,
    ) -> Self {
        let mut frame_time = ProviderSlot::new(frame_time_provider);
        let mut owners = [None; StatIndex::COUNT];

        if context.requested.contains(&StatIndex::FrameTime) {
            if frame_time.provider.is_available(StatIndex::FrameTime) {
                frame_time.owned.push(StatIndex::FrameTime);
                owners[StatIndex::FrameTime.as_usize()] = Some(FRAME_TIME_OWNER);
            } else {
                log::warn!(
                    "Frame-time provider '{}' cannot report frame time; asking the others.",
                    frame_time.name
                );
            }
        }

        let mut slots: Vec<ProviderSlot> = Vec::new();
        for candidate in candidates {
            let provider = match candidate {
                Candidate::Provider(provider) => provider,
                Candidate::Backend(backend) => match backend.probe(context) {
                    Ok(provider) => {
                        log::debug!("Stats backend '{}' is usable.", backend.name());
                        provider
                    }
                    Err(e) => {
                        log::info!("Skipping stats backend '{}': {e}", backend.name());
                        continue;
                    }
                },
            };
            slots.push(ProviderSlot::new(provider));
        }

        for &index in context.requested {
            if owners[index.as_usize()].is_some() {
                continue;
            }
            let owner = slots
                .iter()
                .position(|slot| slot.provider.is_available(index));
            match owner {
                Some(position) => {
                    slots[position].owned.push(index);
                    owners[index.as_usize()] = Some(position);
                }
                None => log::info!("Stat '{index}' is not available on this platform."),
            }
        }

        for slot in slots.iter().filter(|slot| !slot.owned.is_empty()) {
            log::info!(
                "Stats provider '{}' owns {} stat(s): {:?}",
                slot.name,
                slot.owned.len(),
                slot.owned
            );
        }

        Self {
            frame_time,
            slots: Arc::from(slots),
            owners,
        }
    }

    /// Returns `true` if some provider owns `index`.
    pub(crate) fn is_owned(&self, index: StatIndex) -> bool {
        self.owners[index.as_usize()].is_some()
    }

    /// Returns the provider owning `index`, if any.
    fn owner(&self, index: StatIndex) -> Option<&ProviderSlot> {
        match self.owners[index.as_usize()]? {
            FRAME_TIME_OWNER => Some(&self.frame_time),
            position => self.slots.get(position),
        }
    }

    /// Name of the provider owning `index`, if any.
    pub(crate) fn owner_name(&self, index: StatIndex) -> Option<&str> {
        self.owner(index).map(ProviderSlot::name)
    }

    /// Asks the owner of `index` for its graph presentation.
    pub(crate) fn graph_data(&self, index: StatIndex) -> Option<StatGraphData> {
        self.owner(index).map(|slot| slot.provider.graph_data(index))
    }

    /// A shared handle on the non-frame-time providers, for the worker thread.
    pub(crate) fn shared_slots(&self) -> Arc<[ProviderSlot]> {
        Arc::clone(&self.slots)
    }

    /// Samples the frame-time provider.
    pub(crate) fn sample_frame_time(&self, delta_time: f32, active_frame_index: u32) -> Counters {
        let mut sample = Counters::new();
        self.frame_time
            .sample_into(delta_time, Some(active_frame_index), &mut sample);
        sample
    }

    /// Samples every provider except the frame-time one.
    pub(crate) fn sample_providers(&self, delta_time: f32, active_frame_index: u32) -> Counters {
        sample_slots(&self.slots, delta_time, Some(active_frame_index))
    }

    /// Calls `hook` on every provider interested in command-buffer instrumentation.
    pub(crate) fn for_each_hooked(&self, mut hook: impl FnMut(&dyn StatsProvider)) {
        for slot in std::iter::once(&self.frame_time).chain(self.slots.iter()) {
            if slot.hooked {
                hook(slot.provider.as_ref());
            }
        }
    }
}
