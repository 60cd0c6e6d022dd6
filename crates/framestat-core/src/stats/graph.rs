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

//! Presentation metadata for plotting a statistic, and counter normalization.

use super::index::StatIndex;
use std::borrow::Cow;

/// Data needed to draw a statistic as a graph.
///
/// Values stored in the engine's buffers are in the provider's native unit;
/// a graph multiplies them by `scale_factor` before display.
#[derive(Debug, Clone, PartialEq)]
pub struct StatGraphData {
    /// Human-readable title of the graph.
    pub name: Cow<'static, str>,
    /// Unit label appended to formatted values (e.g. "ms", "M/s", "%").
    pub unit: Cow<'static, str>,
    /// Number of decimals shown when formatting a value.
    pub precision: usize,
    /// Multiplier applied to a stored value before display.
    pub scale_factor: f32,
    /// Upper bound of the graph's axis when the statistic is naturally bounded.
    pub fixed_max: Option<f32>,
}

impl StatGraphData {
    /// Creates graph data with a free-floating axis.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        unit: impl Into<Cow<'static, str>>,
        precision: usize,
        scale_factor: f32,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            precision,
            scale_factor,
            fixed_max: None,
        }
    }

    /// Pins the graph's axis to `[0, max]` (in display units).
    pub fn with_fixed_max(mut self, max: f32) -> Self {
        self.fixed_max = Some(max);
        self
    }

    /// Converts a stored value into display units.
    #[inline]
    pub fn scaled(&self, value: f32) -> f32 {
        value * self.scale_factor
    }

    /// Formats a stored value for an on-screen label (e.g. "16.7 ms").
    pub fn format_value(&self, value: f32) -> String {
        let scaled = self.scaled(value);
        if self.unit.starts_with('%') || self.unit.starts_with('/') {
            format!("{:.*}{}", self.precision, scaled, self.unit)
        } else {
            format!("{:.*} {}", self.precision, scaled, self.unit)
        }
    }

    /// Suggested maximum of the axis for a series, in display units.
    ///
    /// Bounded statistics use their fixed maximum; the others use the largest
    /// value in the series so the plot always fits.
    pub fn axis_max<'a>(&self, values: impl IntoIterator<Item = &'a f32>) -> f32 {
        if let Some(max) = self.fixed_max {
            return max;
        }
        values
            .into_iter()
            .map(|v| self.scaled(*v))
            .fold(0.0, f32::max)
    }
}

const MEGA: f32 = 1e-6;
const KILO: f32 = 1e-3;
const MEBIBYTE: f32 = 1.0 / (1024.0 * 1024.0);

/// Returns the engine's default presentation for a statistic.
///
/// Providers that know better (e.g. a backend reporting a different unit)
/// override [`StatsProvider::graph_data`](super::StatsProvider::graph_data).
pub fn default_graph_data(index: StatIndex) -> StatGraphData {
    match index {
        StatIndex::FrameTime => StatGraphData::new("Frame Times", "ms", 1, 1000.0),
        StatIndex::CpuCycles => StatGraphData::new("CPU Cycles", "M/s", 1, MEGA),
        StatIndex::CpuInstructions => StatGraphData::new("CPU Instructions", "M/s", 1, MEGA),
        StatIndex::CpuCacheMissRatio => {
            StatGraphData::new("Cache Miss Ratio", "%", 1, 100.0).with_fixed_max(100.0)
        }
        StatIndex::CpuBranchMissRatio => {
            StatGraphData::new("Branch Miss Ratio", "%", 1, 100.0).with_fixed_max(100.0)
        }
        StatIndex::CpuL1Accesses => StatGraphData::new("CPU L1 Accesses", "M/s", 1, MEGA),
        StatIndex::CpuInstrRetired => {
            StatGraphData::new("CPU Instructions Retired", "M/s", 1, MEGA)
        }
        StatIndex::CpuL2Accesses => StatGraphData::new("CPU L2 Accesses", "M/s", 1, MEGA),
        StatIndex::CpuL3Accesses => StatGraphData::new("CPU L3 Accesses", "M/s", 1, MEGA),
        StatIndex::CpuBusReads => StatGraphData::new("CPU Bus Read Beats", "M/s", 1, MEGA),
        StatIndex::CpuBusWrites => StatGraphData::new("CPU Bus Write Beats", "M/s", 1, MEGA),
        StatIndex::CpuMemReads => {
            StatGraphData::new("CPU Memory Read Instructions", "M/s", 1, MEGA)
        }
        StatIndex::CpuMemWrites => {
            StatGraphData::new("CPU Memory Write Instructions", "M/s", 1, MEGA)
        }
        StatIndex::CpuAseSpec => {
            StatGraphData::new("Speculatively Exec. SIMD Instructions", "M/s", 1, MEGA)
        }
        StatIndex::CpuVfpSpec => {
            StatGraphData::new("Speculatively Exec. FP Instructions", "M/s", 1, MEGA)
        }
        StatIndex::CpuCryptoSpec => {
            StatGraphData::new("Speculatively Exec. Crypto Instructions", "M/s", 1, MEGA)
        }
        StatIndex::CpuUtilization => {
            StatGraphData::new("CPU Utilization", "%", 1, 100.0).with_fixed_max(100.0)
        }
        StatIndex::MemoryUtilization => {
            StatGraphData::new("Memory Utilization", "%", 1, 100.0).with_fixed_max(100.0)
        }
        StatIndex::GpuCycles => StatGraphData::new("GPU Cycles", "M/s", 1, MEGA),
        StatIndex::GpuVertexComputeCycles => {
            StatGraphData::new("Vertex Compute Cycles", "M/s", 1, MEGA)
        }
        StatIndex::GpuLoadStoreCycles => StatGraphData::new("Load Store Cycles", "M/s", 1, MEGA),
        StatIndex::GpuTiles => StatGraphData::new("Tiles", "k/s", 1, KILO),
        StatIndex::GpuKilledTiles => {
            StatGraphData::new("Tiles killed by CRC match", "k/s", 1, KILO)
        }
        StatIndex::GpuFragmentJobs => StatGraphData::new("Fragment Jobs", "/s", 0, 1.0),
        StatIndex::GpuFragmentCycles => StatGraphData::new("Fragment Cycles", "M/s", 1, MEGA),
        StatIndex::GpuExtReads => StatGraphData::new("External Reads", "M/s", 1, MEGA),
        StatIndex::GpuExtWrites => StatGraphData::new("External Writes", "M/s", 1, MEGA),
        StatIndex::GpuExtReadStalls => {
            StatGraphData::new("External Read Stalls", "M/s", 1, MEGA)
        }
        StatIndex::GpuExtWriteStalls => {
            StatGraphData::new("External Write Stalls", "M/s", 1, MEGA)
        }
        StatIndex::GpuExtReadBytes => {
            StatGraphData::new("External Read Bytes", "MiB/s", 1, MEBIBYTE)
        }
        StatIndex::GpuExtWriteBytes => {
            StatGraphData::new("External Write Bytes", "MiB/s", 1, MEBIBYTE)
        }
        StatIndex::GpuTexCycles => StatGraphData::new("Shader Texture Cycles", "k/s", 0, KILO),
    }
}

/// How a provider turns a raw counter delta into the value it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatScaling {
    /// The raw value is reported as is.
    None,
    /// The raw value is divided by the sampling delta time, giving a rate per second.
    ByDeltaTime,
    /// The raw value is divided by another counter, giving a ratio.
    ByCounter(StatIndex),
}

impl StatScaling {
    /// Applies the scaling to a raw counter value.
    ///
    /// `divisor` is the raw value of the counter named by [`StatScaling::ByCounter`];
    /// it is ignored by the other variants.
    ///
    /// ## Returns
    /// `None` when the division is meaningless (zero delta time or zero divisor),
    /// in which case the provider should leave the statistic out of its sample.
    pub fn apply(self, raw: f64, delta_time: f32, divisor: Option<f64>) -> Option<f64> {
        match self {
            StatScaling::None => Some(raw),
            StatScaling::ByDeltaTime => {
                (delta_time > 0.0).then(|| raw / f64::from(delta_time))
            }
            StatScaling::ByCounter(_) => match divisor {
                Some(d) if d != 0.0 => Some(raw / d),
                _ => None,
            },
        }
    }
}
