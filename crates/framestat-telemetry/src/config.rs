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

//! Serializable engine configuration.

use crate::stats::DEFAULT_SMOOTHING_ALPHA;
use anyhow::Context;
use framestat_core::stats::{
    CounterSamplingConfig, CounterSamplingMode, StatIndex, StatsError, StatsResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Everything needed to build a [`Stats`](crate::Stats) engine, apart from
/// the providers and the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// The statistics to collect.
    pub requested_stats: BTreeSet<StatIndex>,
    /// Whether providers are polled per frame or sampled by a worker.
    pub sampling_mode: CounterSamplingMode,
    /// Worker interval in milliseconds. Ignored when polling.
    pub sampling_interval_ms: f64,
    /// Number of values kept per statistic until the first resize.
    pub buffer_size: usize,
    /// Exponential moving average factor, in `(0, 1]`.
    pub smoothing_alpha: f32,
    /// Maximum number of worker samples waiting for the next frame update.
    pub max_pending_samples: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            requested_stats: BTreeSet::from([StatIndex::FrameTime]),
            sampling_mode: CounterSamplingMode::Polling,
            sampling_interval_ms: CounterSamplingConfig::DEFAULT_INTERVAL.as_secs_f64() * 1000.0,
            buffer_size: 16,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            max_pending_samples: 1024,
        }
    }
}

impl StatsConfig {
    /// Creates a configuration requesting `stats`, with default settings otherwise.
    pub fn new(stats: impl IntoIterator<Item = StatIndex>) -> Self {
        Self {
            requested_stats: stats.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Switches to continuous sampling every `interval`.
    pub fn with_continuous_sampling(mut self, interval: Duration) -> Self {
        self.sampling_mode = CounterSamplingMode::Continuous;
        self.sampling_interval_ms = interval.as_secs_f64() * 1000.0;
        self
    }

    /// Sets the initial buffer capacity.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sets the smoothing factor.
    pub fn with_smoothing_alpha(mut self, alpha: f32) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    /// Sets the bound of the worker's pending queue.
    pub fn with_max_pending_samples(mut self, max_pending_samples: usize) -> Self {
        self.max_pending_samples = max_pending_samples;
        self
    }

    /// Converts the mode and interval into a [`CounterSamplingConfig`].
    pub fn sampling_config(&self) -> StatsResult<CounterSamplingConfig> {
        let interval = Duration::try_from_secs_f64(self.sampling_interval_ms / 1000.0)
            .map_err(|e| {
                StatsError::InvalidConfig(format!(
                    "sampling interval {} ms is not a valid duration: {e}",
                    self.sampling_interval_ms
                ))
            })?;
        if interval.is_zero() {
            return Err(StatsError::InvalidConfig(
                "sampling interval must be greater than zero".to_owned(),
            ));
        }

        Ok(match self.sampling_mode {
            CounterSamplingMode::Polling => CounterSamplingConfig {
                mode: CounterSamplingMode::Polling,
                interval,
            },
            CounterSamplingMode::Continuous => CounterSamplingConfig::continuous(interval),
        })
    }

    /// Checks every setting.
    pub fn validate(&self) -> StatsResult<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(StatsError::InvalidConfig(format!(
                "smoothing alpha must lie in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.buffer_size == 0 {
            return Err(StatsError::InvalidConfig(
                "buffer size must be greater than zero".to_owned(),
            ));
        }
        if self.max_pending_samples == 0 {
            return Err(StatsError::InvalidConfig(
                "the pending sample bound must be greater than zero".to_owned(),
            ));
        }
        self.sampling_config().map(|_| ())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("Malformed stats configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats configuration {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid stats configuration {}", path.display()))
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write stats configuration {}", path.display()))?;
        Ok(())
    }
}
