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

//! The frame statistics engine.
//!
//! [`Stats`] resolves which provider supplies each requested statistic,
//! samples them once per frame or from a background worker, smooths the raw
//! readings and keeps a bounded history per statistic for graphing.

#![warn(missing_docs)]

pub mod config;
pub mod providers;
pub mod stats;

pub use config::StatsConfig;
pub use providers::FrameTimeProvider;
pub use stats::{CircularBuffer, Stats, StatsBuilder, WorkerState};
