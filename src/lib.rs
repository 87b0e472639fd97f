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

//! psrx-pad: PlayStation (PSX) controller port emulation
//!
//! This crate emulates the pads that plug into the two controller ports of
//! the console and answer its serial polling: the digital pad, the
//! DualShock style analog pad (including its configuration mode), the
//! mouse and the Namco Negcon.
//!
//! # Architecture
//!
//! - [`core::controller`]: One pad: input snapshot, reply encoding and the
//!   byte-by-byte command/response state machine
//! - [`core::system`]: The SIO0 register front-end owning both ports
//! - [`core::config`]: TOML/JSON configuration of both ports
//!
//! # Example
//!
//! ```
//! use psrx_pad::core::controller::{buttons, InputState};
//! use psrx_pad::core::system::{ControllerPorts, Port};
//!
//! let mut ports = ControllerPorts::new();
//! ports.set_input(
//!     Port::One,
//!     InputState {
//!         raw_buttons: buttons::START,
//!         ..Default::default()
//!     },
//! );
//!
//! ports.start_poll(Port::One);
//! let reply: Vec<u8> = [0x42, 0x00, 0x00, 0x00]
//!     .iter()
//!     .map(|&b| ports.poll(Port::One, b).0)
//!     .collect();
//! assert_eq!(reply, [0x41, 0x5A, 0xF7, 0xFF]);
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, ControllerError>`.

pub mod core;

// Re-export commonly used types
pub use core::error::{ControllerError, Result};
