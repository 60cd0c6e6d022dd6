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

//! The closed set of statistics the engine knows how to track.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Identifies a single statistic.
///
/// The set is closed so that per-statistic state can live in a fixed array
/// indexed by [`StatIndex::as_usize`] instead of a hash map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatIndex {
    /// Time spent on a whole frame, in seconds.
    FrameTime,

    /// CPU cycles.
    CpuCycles,
    /// CPU instructions executed.
    CpuInstructions,
    /// Ratio of cache misses to cache references.
    CpuCacheMissRatio,
    /// Ratio of mispredicted branches to branches.
    CpuBranchMissRatio,
    /// L1 data cache accesses.
    CpuL1Accesses,
    /// Instructions architecturally retired.
    CpuInstrRetired,
    /// L2 data cache accesses.
    CpuL2Accesses,
    /// L3 cache accesses.
    CpuL3Accesses,
    /// Bus read beats.
    CpuBusReads,
    /// Bus write beats.
    CpuBusWrites,
    /// Memory read instructions.
    CpuMemReads,
    /// Memory write instructions.
    CpuMemWrites,
    /// Speculatively executed SIMD instructions.
    CpuAseSpec,
    /// Speculatively executed floating-point instructions.
    CpuVfpSpec,
    /// Speculatively executed cryptographic instructions.
    CpuCryptoSpec,
    /// Host-wide CPU utilization, as a ratio in `[0, 1]`.
    CpuUtilization,
    /// Host-wide memory utilization, as a ratio in `[0, 1]`.
    MemoryUtilization,

    /// GPU active cycles.
    GpuCycles,
    /// Cycles spent on vertex and compute work.
    GpuVertexComputeCycles,
    /// Cycles spent in the load/store unit.
    GpuLoadStoreCycles,
    /// Tiles processed.
    GpuTiles,
    /// Tiles killed by transaction elimination.
    GpuKilledTiles,
    /// Fragment jobs.
    GpuFragmentJobs,
    /// Cycles spent on fragment work.
    GpuFragmentCycles,
    /// External memory read transactions.
    GpuExtReads,
    /// External memory write transactions.
    GpuExtWrites,
    /// Stalls on external memory reads.
    GpuExtReadStalls,
    /// Stalls on external memory writes.
    GpuExtWriteStalls,
    /// Bytes read from external memory.
    GpuExtReadBytes,
    /// Bytes written to external memory.
    GpuExtWriteBytes,
    /// Cycles spent in the texture unit.
    GpuTexCycles,
}

/// The broad family a statistic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    /// Frame pacing.
    Frame,
    /// CPU hardware counters.
    Cpu,
    /// Host operating-system level utilization.
    System,
    /// GPU hardware counters.
    Gpu,
}

impl StatIndex {
    /// Every variant, in declaration order.
    pub const ALL: [StatIndex; 32] = [
        StatIndex::FrameTime,
        StatIndex::CpuCycles,
        StatIndex::CpuInstructions,
        StatIndex::CpuCacheMissRatio,
        StatIndex::CpuBranchMissRatio,
        StatIndex::CpuL1Accesses,
        StatIndex::CpuInstrRetired,
        StatIndex::CpuL2Accesses,
        StatIndex::CpuL3Accesses,
        StatIndex::CpuBusReads,
        StatIndex::CpuBusWrites,
        StatIndex::CpuMemReads,
        StatIndex::CpuMemWrites,
        StatIndex::CpuAseSpec,
        StatIndex::CpuVfpSpec,
        StatIndex::CpuCryptoSpec,
        StatIndex::CpuUtilization,
        StatIndex::MemoryUtilization,
        StatIndex::GpuCycles,
        StatIndex::GpuVertexComputeCycles,
        StatIndex::GpuLoadStoreCycles,
        StatIndex::GpuTiles,
        StatIndex::GpuKilledTiles,
        StatIndex::GpuFragmentJobs,
        StatIndex::GpuFragmentCycles,
        StatIndex::GpuExtReads,
        StatIndex::GpuExtWrites,
        StatIndex::GpuExtReadStalls,
        StatIndex::GpuExtWriteStalls,
        StatIndex::GpuExtReadBytes,
        StatIndex::GpuExtWriteBytes,
        StatIndex::GpuTexCycles,
    ];

    /// Number of variants.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the dense array slot of this statistic.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// Returns the stable snake_case name used in configuration files and logs.
    pub const fn name(self) -> &'static str {
        match self {
            StatIndex::FrameTime => "frame_time",
            StatIndex::CpuCycles => "cpu_cycles",
            StatIndex::CpuInstructions => "cpu_instructions",
            StatIndex::CpuCacheMissRatio => "cpu_cache_miss_ratio",
            StatIndex::CpuBranchMissRatio => "cpu_branch_miss_ratio",
            StatIndex::CpuL1Accesses => "cpu_l1_accesses",
            StatIndex::CpuInstrRetired => "cpu_instr_retired",
            StatIndex::CpuL2Accesses => "cpu_l2_accesses",
            StatIndex::CpuL3Accesses => "cpu_l3_accesses",
            StatIndex::CpuBusReads => "cpu_bus_reads",
            StatIndex::CpuBusWrites => "cpu_bus_writes",
            StatIndex::CpuMemReads => "cpu_mem_reads",
            StatIndex::CpuMemWrites => "cpu_mem_writes",
            StatIndex::CpuAseSpec => "cpu_ase_spec",
            StatIndex::CpuVfpSpec => "cpu_vfp_spec",
            StatIndex::CpuCryptoSpec => "cpu_crypto_spec",
            StatIndex::CpuUtilization => "cpu_utilization",
            StatIndex::MemoryUtilization => "memory_utilization",
            StatIndex::GpuCycles => "gpu_cycles",
            StatIndex::GpuVertexComputeCycles => "gpu_vertex_compute_cycles",
            StatIndex::GpuLoadStoreCycles => "gpu_load_store_cycles",
            StatIndex::GpuTiles => "gpu_tiles",
            StatIndex::GpuKilledTiles => "gpu_killed_tiles",
            StatIndex::GpuFragmentJobs => "gpu_fragment_jobs",
            StatIndex::GpuFragmentCycles => "gpu_fragment_cycles",
            StatIndex::GpuExtReads => "gpu_ext_reads",
            StatIndex::GpuExtWrites => "gpu_ext_writes",
            StatIndex::GpuExtReadStalls => "gpu_ext_read_stalls",
            StatIndex::GpuExtWriteStalls => "gpu_ext_write_stalls",
            StatIndex::GpuExtReadBytes => "gpu_ext_read_bytes",
            StatIndex::GpuExtWriteBytes => "gpu_ext_write_bytes",
            StatIndex::GpuTexCycles => "gpu_tex_cycles",
        }
    }

    /// Returns the family this statistic belongs to.
    pub const fn category(self) -> StatCategory {
        match self {
            StatIndex::FrameTime => StatCategory::Frame,
            StatIndex::CpuUtilization | StatIndex::MemoryUtilization => StatCategory::System,
            StatIndex::CpuCycles
            | StatIndex::CpuInstructions
            | StatIndex::CpuCacheMissRatio
            | StatIndex::CpuBranchMissRatio
            | StatIndex::CpuL1Accesses
            | StatIndex::CpuInstrRetired
            | StatIndex::CpuL2Accesses
            | StatIndex::CpuL3Accesses
            | StatIndex::CpuBusReads
            | StatIndex::CpuBusWrites
            | StatIndex::CpuMemReads
            | StatIndex::CpuMemWrites
            | StatIndex::CpuAseSpec
            | StatIndex::CpuVfpSpec
            | StatIndex::CpuCryptoSpec => StatCategory::Cpu,
            _ => StatCategory::Gpu,
        }
    }
}

impl Display for StatIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
