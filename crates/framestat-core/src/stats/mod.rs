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

//! Provides the foundational traits and data structures for frame statistics.
//!
//! This module is the "common language" between the statistics engine and the
//! counter sources feeding it. It defines *what* a statistic is, how it is
//! presented, and the contract a provider must honor; `framestat-telemetry`
//! owns the engine that aggregates them and `framestat-infra` holds concrete
//! providers.

pub mod error;
pub mod graph;
pub mod handle;
pub mod index;
pub mod provider;
pub mod sampling;

pub use self::error::{StatsError, StatsResult};
pub use self::graph::{default_graph_data, StatGraphData, StatScaling};
pub use self::handle::{CommandBufferHandle, DeviceHandle};
pub use self::index::{StatCategory, StatIndex};
pub use self::provider::{Counters, ProbeContext, ProviderBackend, SampleRequest, StatsProvider};
pub use self::sampling::{CounterSamplingConfig, CounterSamplingMode};
