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

//! sysinfo-based CPU and memory utilization provider.

use framestat_core::stats::{
    Counters, ProbeContext, ProviderBackend, SampleRequest, StatIndex, StatsError,
    StatsProvider, StatsResult,
};
use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard};
use sysinfo::System;

/// Reports host CPU and memory utilization as ratios in `[0, 1]`.
///
/// CPU usage is computed by sysinfo from the time elapsed between two
/// refreshes, so the first reading after creation may be zero.
#[derive(Debug)]
pub struct SysinfoStatsProvider {
    system: Mutex<System>,
}

impl SysinfoStatsProvider {
    /// Creates the provider and takes the initial CPU and memory snapshot.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
        }
    }

    fn system(&self) -> MutexGuard<'_, System> {
        match self.system.lock() {
            Ok(system) => system,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn cpu_utilization(system: &mut System) -> f32 {
        system.refresh_cpu_usage();
        (system.global_cpu_usage() / 100.0).clamp(0.0, 1.0)
    }

    fn memory_utilization(system: &mut System) -> Option<f32> {
        system.refresh_memory();
        let total = system.total_memory();
        if total == 0 {
            return None;
        }
        Some((system.used_memory() as f64 / total as f64) as f32)
    }
}

impl Default for SysinfoStatsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsProvider for SysinfoStatsProvider {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("sysinfo")
    }

    fn is_available(&self, index: StatIndex) -> bool {
        matches!(
            index,
            StatIndex::CpuUtilization | StatIndex::MemoryUtilization
        )
    }

    fn sample(&self, request: &SampleRequest<'_>) -> StatsResult<Counters> {
        let mut system = self.system();
        let mut counters = Counters::new();
        for &index in request.stats {
            match index {
                StatIndex::CpuUtilization => {
                    let value = Self::cpu_utilization(&mut system);
                    counters.insert(index, value);
                }
                StatIndex::MemoryUtilization => {
                    if let Some(value) = Self::memory_utilization(&mut system) {
                        counters.insert(index, value);
                    }
                }
                _ => {}
            }
        }
        Ok(counters)
    }
}

/// Creates a [`SysinfoStatsProvider`] on platforms sysinfo supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoBackend;

impl ProviderBackend for SysinfoBackend {
    fn name(&self) -> &str {
        "sysinfo"
    }

    fn probe(&self, context: &ProbeContext<'_>) -> StatsResult<Box<dyn StatsProvider>> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(StatsError::BackendUnavailable {
                backend: self.name().to_owned(),
                reason: "sysinfo does not support this operating system".to_owned(),
            });
        }

        let wanted = context
            .requested
            .iter()
            .any(|&index| matches!(index, StatIndex::CpuUtilization | StatIndex::MemoryUtilization));
        if !wanted {
            return Err(StatsError::BackendUnavailable {
                backend: self.name().to_owned(),
                reason: "none of its stats were requested".to_owned(),
            });
        }

        log::debug!(
            "Creating sysinfo stats provider for device '{}'.",
            context.device.device_name()
        );
        Ok(Box::new(SysinfoStatsProvider::new()))
    }
}
