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

//! Aggregation of provider readings into smoothed, bounded histories.

pub mod buffer;
mod engine;
mod registry;
pub mod smoothing;
mod worker;

pub use self::buffer::CircularBuffer;
pub use self::engine::{Stats, StatsBuilder, PIXELS_PER_SAMPLE};
pub use self::smoothing::{SmoothingState, DEFAULT_SMOOTHING_ALPHA};
pub use self::worker::WorkerState;
