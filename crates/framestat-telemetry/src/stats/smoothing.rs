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

//! Exponential moving average applied to raw readings before display.

use framestat_core::stats::StatIndex;

/// Default smoothing factor. Larger values weight new readings more.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.2;

/// Last emitted value of every statistic, combined with new raw readings as
/// `smoothed = previous * (1 - alpha) + raw * alpha`.
///
/// A statistic has no state until its first reading, which is emitted unchanged.
#[derive(Debug, Clone)]
pub struct SmoothingState {
    alpha: f32,
    last: [Option<f32>; StatIndex::COUNT],
}

impl SmoothingState {
    /// Creates an empty state. `alpha` must lie in `(0, 1]`; the engine
    /// validates it before getting here.
    pub fn new(alpha: f32) -> Self {
        debug_assert!(alpha > 0.0 && alpha <= 1.0, "alpha out of range: {alpha}");
        Self {
            alpha,
            last: [None; StatIndex::COUNT],
        }
    }

    /// Returns the smoothing factor.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Folds a raw reading into the state and returns the value to display.
    pub fn apply(&mut self, index: StatIndex, raw: f32) -> f32 {
        let slot = &mut self.last[index.as_usize()];
        let smoothed = match *slot {
            Some(previous) => previous * (1.0 - self.alpha) + raw * self.alpha,
            None => raw,
        };
        *slot = Some(smoothed);
        smoothed
    }

    /// Returns the last emitted value of `index`, if it has received a reading.
    pub fn last(&self, index: StatIndex) -> Option<f32> {
        self.last[index.as_usize()]
    }

    /// Forgets every statistic's history.
    pub fn reset(&mut self) {
        self.last = [None; StatIndex::COUNT];
    }
}
