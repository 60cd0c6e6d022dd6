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

//! Fixed-capacity history for graph series.

/// A circular buffer whose capacity is chosen at runtime.
///
/// Storage grows up to `capacity` and is then overwritten in place, oldest
/// first. Iteration is always chronological (oldest to newest).
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: Vec<T>,
    // Slot holding the oldest value once the buffer is full; 0 before that.
    head: usize,
    capacity: usize,
}

impl<T: Copy> CircularBuffer<T> {
    /// Creates an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Pushes a new value, overwriting the oldest one if the buffer is full.
    pub fn push(&mut self, value: T) {
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Returns the number of values currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been pushed since creation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the maximum number of values kept.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` once pushes start evicting old values.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Returns an iterator over the values in chronological order (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.data.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Returns the most recently pushed value.
    pub fn latest(&self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let newest = (self.head + self.data.len() - 1) % self.data.len();
        Some(self.data[newest])
    }

    /// Copies the contents into a `Vec`, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    /// Removes every value, keeping the capacity.
    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }
}

impl CircularBuffer<f32> {
    /// Calculates the arithmetic mean of the stored values, or 0.0 if empty.
    pub fn average(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }

    /// Returns the smallest stored value, if any.
    pub fn min(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }

    /// Returns the largest stored value, if any.
    pub fn max(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }
}
