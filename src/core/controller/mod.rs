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

//! PlayStation Controller/Gamepad System
//!
//! This module implements the pads that plug into the controller ports:
//! digital pad, analog pad (DualShock), mouse and Negcon, all sharing one
//! serial command/response state machine.
//!
//! # Controller Communication Protocol
//!
//! The controller uses a synchronous serial protocol:
//! 1. Select controller (chip select), console sends 0x01
//! 2. Console sends a command byte, pad answers with its ID byte
//! 3. Further bytes are exchanged full-duplex until the reply is exhausted
//! 4. Deselect controller
//!
//! Digital pad response to the Read (0x42) command:
//! - Byte 0: 0xFF (answer to the 0x01 address byte)
//! - Byte 1: 0x41 (Controller ID - Digital Pad)
//! - Byte 2: 0x5A (Always 0x5A)
//! - Byte 3: Button state low byte
//! - Byte 4: Button state high byte
//!
//! Analog pads additionally understand a configuration mode, entered with
//! command 0x43, in which the commands 0x44-0x4D become available.
//!
//! # Button Encoding
//!
//! Buttons use active-low encoding (0 = pressed, 1 = released).
//! This matches the PlayStation hardware behavior.

mod input;
pub mod protocol;


pub use input::{
    axis_to_u8, encode_buttons, encode_mouse, fold_stick_to_dpad, AxisBytes, InputState,
    MouseState, PadData, AXIS_CENTER,
};

use serde::{Deserialize, Serialize};

use crate::core::error::{ControllerError, Result};
use protocol::{id, PadCommand, REPLY_BUFFER_LEN, REPLY_MARKER};

/// Button bit definitions for PlayStation controller
///
/// All buttons use active-low logic:
/// - 0 = button is pressed
/// - 1 = button is released
///
/// Bit numbers double as the button indices used by the override API.
pub mod buttons {
    /// SELECT button (bit 0)
    pub const SELECT: u16 = 1 << 0;
    /// L3 button (left stick press) (bit 1)
    pub const L3: u16 = 1 << 1;
    /// R3 button (right stick press) (bit 2)
    pub const R3: u16 = 1 << 2;
    /// START button (bit 3)
    pub const START: u16 = 1 << 3;
    /// D-Pad UP (bit 4)
    pub const UP: u16 = 1 << 4;
    /// D-Pad RIGHT (bit 5)
    pub const RIGHT: u16 = 1 << 5;
    /// D-Pad DOWN (bit 6)
    pub const DOWN: u16 = 1 << 6;
    /// D-Pad LEFT (bit 7)
    pub const LEFT: u16 = 1 << 7;
    /// L2 shoulder button (bit 8)
    pub const L2: u16 = 1 << 8;
    /// R2 shoulder button (bit 9)
    pub const R2: u16 = 1 << 9;
    /// L1 shoulder button (bit 10)
    pub const L1: u16 = 1 << 10;
    /// R1 shoulder button (bit 11)
    pub const R1: u16 = 1 << 11;
    /// Triangle button (bit 12)
    pub const TRIANGLE: u16 = 1 << 12;
    /// Circle button (bit 13)
    pub const CIRCLE: u16 = 1 << 13;
    /// Cross (X) button (bit 14)
    pub const CROSS: u16 = 1 << 14;
    /// Square button (bit 15)
    pub const SQUARE: u16 = 1 << 15;

    /// Button names, indexed by bit number
    pub const NAMES: [&str; 16] = [
        "SELECT", "L3", "R3", "START", "UP", "RIGHT", "DOWN", "LEFT", "L2", "R2", "L1", "R1",
        "TRIANGLE", "CIRCLE", "CROSS", "SQUARE",
    ];

    /// Look up a button bit by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<u16> {
        NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|bit| 1 << bit)
    }

    /// Get button name for display
    pub fn name(button: u16) -> &'static str {
        if button.count_ones() != 1 {
            return "UNKNOWN";
        }
        NAMES[button.trailing_zeros() as usize]
    }
}

/// Pad personality attached to a port
///
/// Decides the reply template, the reply length and whether the
/// configuration commands are understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControllerKind {
    /// SCPH-1080 style digital pad
    #[default]
    Digital,
    /// DualShock style analog pad (SCPH-1110/1150)
    Analog,
    /// PlayStation mouse
    Mouse,
    /// Namco Negcon
    Negcon,
}

/// Serial communication state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerialState {
    /// Transaction started, waiting for the command byte
    Idle,
    /// Command byte latched, ID byte sent
    CommandDispatched,
    /// Reply bytes being clocked out
    Streaming,
    /// Reply finished (or rejected), every further byte reads 0xFF
    Exhausted,
}

/// A pad on one controller port
///
/// Holds the per-port session: pad personality, latest host input, the
/// override mask, the DualShock mode flags and the reply being clocked out.
///
/// # Examples
///
/// ```
/// use psrx_pad::core::controller::{buttons, Controller, ControllerKind, InputState};
///
/// let mut controller = Controller::new(ControllerKind::Digital);
/// controller.set_input(InputState {
///     raw_buttons: buttons::CROSS,
///     ..Default::default()
/// });
///
/// assert_eq!(controller.start_poll(), 0xFF);
/// assert_eq!(controller.poll(0x42), (0x41, true));
/// assert_eq!(controller.poll(0x00), (0x5A, true));
/// assert_eq!(controller.poll(0x00), (0xFF, true));
/// assert_eq!(controller.poll(0x00), (0xBF, true)); // Cross pressed
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controller {
    /// Pad personality
    kind: ControllerKind,

    /// Whether a pad is plugged into the port
    connected: bool,

    /// Latest input from the host input layer
    #[serde(skip)]
    input: InputState,

    /// Mouse motion scale (x, y)
    mouse_sensitivity: (f32, f32),

    /// Override mask (0 = button forced released)
    overrides: u16,

    /// Snapshot taken at the start of the current transaction
    pad: PadData,

    /// DualShock configuration mode
    config_mode: bool,

    /// DualShock analog mode (the ANALOG button/LED)
    analog_mode: bool,

    /// Command byte of the current transaction
    command: u8,

    /// Serial communication state
    state: SerialState,

    /// Reply buffer (controller -> console)
    buffer: [u8; REPLY_BUFFER_LEN],

    /// Number of valid bytes in the reply buffer
    buffer_len: usize,

    /// Current byte index being transferred
    current_byte: usize,
}

impl Controller {
    /// Create a connected pad with all buttons released
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_pad::core::controller::{Controller, ControllerKind};
    ///
    /// let controller = Controller::new(ControllerKind::Analog);
    /// assert_eq!(controller.overrides(), 0xFFFF);
    /// assert!(!controller.analog_mode());
    /// ```
    pub fn new(kind: ControllerKind) -> Self {
        Self {
            kind,
            connected: true,
            input: InputState::default(),
            mouse_sensitivity: (0.5, 0.5),
            overrides: 0xFFFF,
            pad: PadData::RELEASED,
            config_mode: false,
            analog_mode: false,
            command: PadCommand::Idle.into(),
            state: SerialState::Idle,
            buffer: [0xFF; REPLY_BUFFER_LEN],
            buffer_len: 0,
            current_byte: 0,
        }
    }

    /// Reset the pad (console reset)
    ///
    /// Leaves configuration mode and drops the current transaction, button
    /// state and overrides. Analog mode models a physical switch and
    /// survives the reset.
    pub fn reset(&mut self) {
        self.config_mode = false;
        self.command = PadCommand::Idle.into();
        self.state = SerialState::Idle;
        self.buffer_len = 0;
        self.current_byte = 0;
        self.overrides = 0xFFFF;
        self.pad = PadData {
            overrides: self.overrides,
            ..PadData::RELEASED
        };

        log::trace!("Controller reset (analog mode {})", self.analog_mode);
    }

    #[inline]
    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    /// Change the pad personality
    ///
    /// Takes effect at the next transaction.
    pub fn set_kind(&mut self, kind: ControllerKind) {
        if self.kind != kind {
            log::debug!("Controller kind changed: {:?} -> {:?}", self.kind, kind);
        }
        self.kind = kind;
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Store the latest host input, sampled at the next [`Controller::start_poll`]
    #[inline]
    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Set the mouse motion scale factors
    pub fn set_mouse_sensitivity(&mut self, x: f32, y: f32) {
        self.mouse_sensitivity = (x, y);
    }

    /// Force a button to read as released
    ///
    /// # Arguments
    ///
    /// * `index` - Button bit number (0-15)
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::InvalidButton` for indices above 15.
    pub fn set_override(&mut self, index: u32) -> Result<()> {
        self.overrides &= !button_mask(index)?;
        Ok(())
    }

    /// Remove the override of a button
    pub fn clear_override(&mut self, index: u32) -> Result<()> {
        self.overrides |= button_mask(index)?;
        Ok(())
    }

    /// Current override mask (0 = forced released)
    #[inline]
    pub fn overrides(&self) -> u16 {
        self.overrides
    }

    /// Whether a button is pressed, overrides applied
    ///
    /// Reads the button state captured by the last [`Controller::start_poll`]
    /// combined with the current override mask.
    pub fn get_button(&self, index: u32) -> Result<bool> {
        let mask = button_mask(index)?;
        let snapshot = PadData {
            overrides: self.overrides,
            ..self.pad
        };
        Ok(snapshot.effective_buttons() & mask == 0)
    }

    #[inline]
    pub fn analog_mode(&self) -> bool {
        self.analog_mode
    }

    /// Flip the analog mode switch
    pub fn set_analog_mode(&mut self, enabled: bool) {
        if self.analog_mode != enabled {
            log::debug!("Analog mode {}", if enabled { "on" } else { "off" });
        }
        self.analog_mode = enabled;
    }

    #[inline]
    pub fn config_mode(&self) -> bool {
        self.config_mode
    }

    /// Pad data snapshot of the current transaction
    #[inline]
    pub fn pad_data(&self) -> &PadData {
        &self.pad
    }

    #[inline]
    pub fn state(&self) -> SerialState {
        self.state
    }

    /// Whether the pad still has reply bytes to send
    ///
    /// The pad pulls /ACK after every byte except the last one of its reply.
    #[inline]
    pub fn has_pending_reply(&self) -> bool {
        self.current_byte < self.buffer_len
    }

    /// Whether the transaction cursor fits the reply buffer
    ///
    /// Always holds for sessions driven through [`Controller::poll`]; a
    /// decoded save state may violate it.
    pub fn is_consistent(&self) -> bool {
        self.buffer_len <= REPLY_BUFFER_LEN && self.current_byte <= self.buffer_len.max(1)
    }

    /// Start a transaction (answer to the 0x01 address byte)
    ///
    /// Samples the host input and rewinds the reply cursor.
    ///
    /// # Returns
    ///
    /// Always 0xFF
    pub fn start_poll(&mut self) -> u8 {
        self.pad = PadData::snapshot(
            self.kind,
            self.connected,
            &self.input,
            self.overrides,
            self.mouse_sensitivity,
        );
        self.current_byte = 0;
        self.buffer_len = 0;
        self.state = SerialState::Idle;

        log::trace!(
            "Controller poll started ({:?}), buttons: 0x{:04X}",
            self.kind,
            self.pad.effective_buttons()
        );

        0xFF
    }

    /// Transfer a byte (simultaneous TX/RX)
    ///
    /// # Arguments
    ///
    /// * `value` - Byte transmitted from console to controller
    ///
    /// # Returns
    ///
    /// The byte transmitted from controller to console, and `false` if the
    /// command byte was rejected (the transaction is then dead until the
    /// next [`Controller::start_poll`])
    pub fn poll(&mut self, value: u8) -> (u8, bool) {
        let result = if self.current_byte == 0 {
            self.dispatch(value)
        } else if self.current_byte >= self.buffer_len {
            (0xFF, true)
        } else {
            if self.current_byte == protocol::PARAMETER_OFFSET
                && self.kind == ControllerKind::Analog
            {
                self.apply_parameter(value);
            }
            let byte = self.buffer[self.current_byte];
            self.current_byte += 1;
            (byte, true)
        };

        self.state = if self.current_byte >= self.buffer_len {
            SerialState::Exhausted
        } else if self.current_byte == 1 {
            SerialState::CommandDispatched
        } else {
            SerialState::Streaming
        };

        log::trace!(
            "Controller transfer: TX=0x{:02X} RX=0x{:02X} (index {})",
            value,
            result.0,
            self.current_byte
        );

        result
    }

    /// Latch the command byte and answer with the pad ID
    fn dispatch(&mut self, value: u8) -> (u8, bool) {
        self.command = value;
        self.current_byte = 1;

        if !self.connected {
            // Nobody on the line
            self.buffer_len = 0;
            return (0xFF, true);
        }

        if value == PadCommand::Read as u8 {
            (self.read(), true)
        } else if self.kind == ControllerKind::Analog {
            self.dualshock_command()
        } else {
            self.bad_command()
        }
    }

    /// Build the Read reply for the current personality and mode
    fn read(&mut self) -> u8 {
        let [lo, hi] = self.pad.effective_buttons().to_le_bytes();
        let [rx, ry, lx, ly] = self.pad.axes.to_bytes();

        match self.kind {
            ControllerKind::Mouse => {
                self.load_reply(&[
                    id::MOUSE,
                    REPLY_MARKER,
                    0xFF,
                    self.pad.mouse_buttons,
                    self.pad.mouse_dx as u8,
                    self.pad.mouse_dy as u8,
                ]);
                id::MOUSE
            }
            ControllerKind::Negcon => {
                self.load_reply(&[id::NEGCON, REPLY_MARKER, lo, hi, rx, ry, lx, ly]);
                id::NEGCON
            }
            ControllerKind::Analog if self.analog_mode || self.config_mode => {
                self.load_reply(&[id::ANALOG, REPLY_MARKER, lo, hi, rx, ry, lx, ly]);
                if self.config_mode {
                    id::CONFIG
                } else {
                    id::ANALOG
                }
            }
            ControllerKind::Analog | ControllerKind::Digital => {
                self.load_reply(&[id::DIGITAL, REPLY_MARKER, lo, hi]);
                id::DIGITAL
            }
        }
    }

    /// Handle a non-Read command on an analog pad
    fn dualshock_command(&mut self) -> (u8, bool) {
        let command = PadCommand::from_byte(self.command);

        // Outside config mode, 0x43 behaves like a Read; its parameter byte
        // is what switches config mode on.
        if command == Some(PadCommand::SetConfigMode) && !self.config_mode {
            return (self.read(), true);
        }

        if self.config_mode {
            if let Some(reply) =
                command.and_then(|cmd| protocol::config_reply(cmd, self.analog_mode))
            {
                self.load_reply(&reply);
                return (id::CONFIG, true);
            }
        }

        self.bad_command()
    }

    /// Consume the parameter byte of the latched command
    fn apply_parameter(&mut self, value: u8) {
        match PadCommand::from_byte(self.command) {
            Some(PadCommand::SetConfigMode) => {
                self.config_mode = value == 1;
                log::debug!(
                    "Config mode {}",
                    if self.config_mode { "entered" } else { "left" }
                );
            }
            Some(PadCommand::SetAnalogMode) => {
                self.set_analog_mode(value == 1);
            }
            Some(PadCommand::Unknown46) => {
                if let Some(tail) = protocol::UNKNOWN_46_TAIL.get(value as usize) {
                    self.buffer[4..8].copy_from_slice(tail);
                }
            }
            Some(PadCommand::Unknown47) => {
                if value != 0 {
                    self.buffer[4..8].fill(0);
                }
            }
            Some(PadCommand::Unknown4C) => {
                if let Some(&byte) = protocol::UNKNOWN_4C_BYTE5.get(value as usize) {
                    self.buffer[5] = byte;
                }
            }
            _ => {}
        }
    }

    /// Reject the command byte
    fn bad_command(&mut self) -> (u8, bool) {
        log::warn!(
            "Unknown command for pad ({:?}): 0x{:02X}",
            self.kind,
            self.command
        );
        self.command = PadCommand::Idle.into();
        self.buffer_len = 0;
        (0xFF, false)
    }

    fn load_reply(&mut self, reply: &[u8]) {
        self.buffer[..reply.len()].copy_from_slice(reply);
        self.buffer_len = reply.len();
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerKind::Digital)
    }
}

/// Bit mask of a button index
fn button_mask(index: u32) -> Result<u16> {
    if index < 16 {
        Ok(1 << index)
    } else {
        Err(ControllerError::InvalidButton { index })
    }
}
