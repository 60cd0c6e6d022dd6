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

//! Error types of the statistics subsystem.

use super::index::StatIndex;
use std::fmt::{self, Display};

/// A specialized `Result` type for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// An error that can occur while building or running the statistics engine.
///
/// An unavailable statistic is deliberately *not* an error: it is reported by
/// `is_available` and its buffer simply stays empty.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// A provider could not produce a reading this cycle.
    ProviderFailure {
        /// Name of the provider.
        provider: String,
        /// What went wrong.
        reason: String,
    },
    /// A candidate backend could not be used on this platform or device.
    BackendUnavailable {
        /// Name of the backend.
        backend: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Data was requested for a statistic that was never part of the requested set.
    NotRequested(StatIndex),
    /// The engine configuration is invalid.
    InvalidConfig(String),
    /// The continuous-sampling worker thread could not be spawned.
    WorkerSpawnFailed(String),
    /// The continuous-sampling worker thread panicked and could not be joined cleanly.
    WorkerJoinFailed,
}

impl Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::ProviderFailure { provider, reason } => {
                write!(f, "Stats provider '{provider}' failed to sample: {reason}")
            }
            StatsError::BackendUnavailable { backend, reason } => {
                write!(f, "Stats backend '{backend}' is unavailable: {reason}")
            }
            StatsError::NotRequested(index) => {
                write!(f, "Stat '{index}' was not part of the requested set")
            }
            StatsError::InvalidConfig(msg) => write!(f, "Invalid stats configuration: {msg}"),
            StatsError::WorkerSpawnFailed(msg) => {
                write!(f, "Failed to spawn the continuous sampling worker: {msg}")
            }
            StatsError::WorkerJoinFailed => {
                write!(f, "The continuous sampling worker panicked before it could be joined")
            }
        }
    }
}

impl std::error::Error for StatsError {}
