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

//! Counter sampling modes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Selects where provider sampling happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterSamplingMode {
    /// Providers are sampled inline, once per frame update.
    #[default]
    Polling,
    /// A background worker samples providers at a fixed interval and the
    /// frame update only drains what it collected.
    Continuous,
}

/// Sampling configuration, immutable once an engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSamplingConfig {
    /// The sampling mode.
    pub mode: CounterSamplingMode,
    /// Time between two worker samples. Only used in continuous mode.
    pub interval: Duration,
}

impl CounterSamplingConfig {
    /// Default worker interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1);

    /// Per-frame polling.
    pub fn polling() -> Self {
        Self {
            mode: CounterSamplingMode::Polling,
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Background sampling every `interval`.
    pub fn continuous(interval: Duration) -> Self {
        Self {
            mode: CounterSamplingMode::Continuous,
            interval,
        }
    }

    /// Returns `true` in continuous mode.
    #[inline]
    pub fn is_continuous(&self) -> bool {
        self.mode == CounterSamplingMode::Continuous
    }
}

impl Default for CounterSamplingConfig {
    fn default() -> Self {
        Self::polling()
    }
}
