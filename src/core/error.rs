// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Error types for the controller port emulation
//!
//! Protocol faults (an unknown command byte clocked into a pad) are not
//! errors: they are reported in-band through the `valid` flag returned by
//! [`crate::core::controller::Controller::poll`]. The types here cover the
//! fallible outer surface: port/button addressing, configuration files and
//! save states.

use thiserror::Error;

/// Errors produced by the controller port layer
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Port number outside the two physical controller ports
    #[error("Invalid controller port: {port} (expected 1 or 2)")]
    InvalidPort { port: usize },

    /// Button index outside 0..16
    #[error("Invalid button index: {index} (expected 0-15)")]
    InvalidButton { index: u32 },

    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// Save state could not be encoded or decoded
    #[error("Save state error: {0}")]
    SaveState(String),

    /// Underlying file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for controller port operations
pub type Result<T> = std::result::Result<T, ControllerError>;

impl From<toml::de::Error> for ControllerError {
    fn from(err: toml::de::Error) -> Self {
        ControllerError::Config(format!("Failed to parse config: {}", err))
    }
}

impl From<toml::ser::Error> for ControllerError {
    fn from(err: toml::ser::Error) -> Self {
        ControllerError::Config(format!("Failed to serialize config: {}", err))
    }
}

impl From<serde_json::Error> for ControllerError {
    fn from(err: serde_json::Error) -> Self {
        ControllerError::Config(format!("Invalid JSON config: {}", err))
    }
}
