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

//! Opaque handles to the host's rendering objects.
//!
//! The statistics engine never touches the device or command buffers itself;
//! it only hands them to providers, which downcast them to the concrete
//! backend types they understand.

use std::any::Any;

/// The rendering device (or context) statistics are collected on.
pub trait DeviceHandle: Send + Sync {
    /// Human-readable name of the device, used in logs.
    fn device_name(&self) -> &str;

    /// Returns a reference to the underlying `Any` trait object for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A command buffer that is being recorded and that providers may instrument.
pub trait CommandBufferHandle {
    /// A debug label for the command buffer, if any.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Returns a mutable reference to the underlying `Any` trait object for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
