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

//! Core pad emulation components
//!
//! - [`controller`]: Pad personalities and the serial protocol state machine
//! - [`system`]: Controller port registers and the two port sessions
//! - [`config`]: Persisted per-port configuration
//! - [`error`]: Error types

pub mod config;
pub mod controller;
pub mod error;
pub mod system;
