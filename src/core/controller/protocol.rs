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

//! Pad command set and fixed reply tables
//!
//! Every reply buffer starts with the pad ID byte followed by the 0x5A
//! marker. The ID byte is sent in answer to the command byte; the remaining
//! bytes are clocked out one per byte received from the console.
//!
//! The DualShock configuration replies below are reproduced byte for byte.
//! Games probe them to detect pad capabilities, and several of them
//! (0x46, 0x47, 0x4C) have no documented meaning.

/// Address byte the console sends to select a pad (memory cards use 0x81)
pub const PAD_ADDRESS: u8 = 0x01;

/// Second byte of every reply
pub const REPLY_MARKER: u8 = 0x5A;

/// Capacity of a reply buffer
pub const REPLY_BUFFER_LEN: usize = 8;

/// Pad ID bytes (the leading byte of a reply)
pub mod id {
    /// Digital pad, or analog pad with analog mode off
    pub const DIGITAL: u8 = 0x41;
    /// Mouse
    pub const MOUSE: u8 = 0x12;
    /// Negcon
    pub const NEGCON: u8 = 0x23;
    /// Analog pad with analog mode on
    pub const ANALOG: u8 = 0x73;
    /// Analog pad in configuration mode
    pub const CONFIG: u8 = 0xF3;
}

/// Reply lengths, ID byte included
pub const DIGITAL_REPLY_LEN: usize = 4;
pub const MOUSE_REPLY_LEN: usize = 6;
pub const ANALOG_REPLY_LEN: usize = 8;

/// Command bytes understood by the pads
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadCommand {
    /// No command latched
    Idle = 0x00,
    /// Read buttons (and sticks)
    Read = 0x42,
    /// Enter/leave configuration mode
    SetConfigMode = 0x43,
    /// Switch analog mode on/off
    SetAnalogMode = 0x44,
    /// Query analog mode
    GetAnalogMode = 0x45,
    Unknown46 = 0x46,
    Unknown47 = 0x47,
    Unknown4C = 0x4C,
    /// Map rumble motors
    UnlockRumble = 0x4D,
}

impl PadCommand {
    /// Decode a command byte
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Idle),
            0x42 => Some(Self::Read),
            0x43 => Some(Self::SetConfigMode),
            0x44 => Some(Self::SetAnalogMode),
            0x45 => Some(Self::GetAnalogMode),
            0x46 => Some(Self::Unknown46),
            0x47 => Some(Self::Unknown47),
            0x4C => Some(Self::Unknown4C),
            0x4D => Some(Self::UnlockRumble),
            _ => None,
        }
    }
}

impl From<PadCommand> for u8 {
    fn from(command: PadCommand) -> Self {
        command as u8
    }
}

/// Config mode reply to 0x43 (no pad data while in config mode)
pub const SET_CONFIG_MODE_REPLY: [u8; 8] = [0x00, 0x5A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

pub const SET_ANALOG_MODE_REPLY: [u8; 8] = [0x00, 0x5A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Reply to 0x45; the analog mode flag goes into [`GET_ANALOG_MODE_OFFSET`]
pub const GET_ANALOG_MODE_REPLY: [u8; 8] = [0x00, 0x5A, 0x01, 0x02, 0x00, 0x02, 0x01, 0x00];
pub const GET_ANALOG_MODE_OFFSET: usize = 4;

pub const UNKNOWN_46_REPLY: [u8; 8] = [0x00, 0x5A, 0x00, 0x00, 0x01, 0x02, 0x00, 0x0A];
pub const UNKNOWN_47_REPLY: [u8; 8] = [0x00, 0x5A, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00];
pub const UNKNOWN_4C_REPLY: [u8; 8] = [0x00, 0x5A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
pub const UNLOCK_RUMBLE_REPLY: [u8; 8] = [0x00, 0x5A, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Bytes 4..8 of the 0x46 reply, selected by the parameter byte (0 or 1)
pub const UNKNOWN_46_TAIL: [[u8; 4]; 2] = [[0x01, 0x02, 0x00, 0x0A], [0x01, 0x01, 0x01, 0x14]];

/// Byte 5 of the 0x4C reply, selected by the parameter byte (0 or 1)
pub const UNKNOWN_4C_BYTE5: [u8; 2] = [0x04, 0x07];

/// Offset of the parameter byte within a command
pub const PARAMETER_OFFSET: usize = 2;

/// Fixed reply for a configuration-mode command
///
/// Returns `None` for commands that have no config-mode reply (Idle, Read).
pub fn config_reply(command: PadCommand, analog_mode: bool) -> Option<[u8; 8]> {
    let reply = match command {
        PadCommand::SetConfigMode => SET_CONFIG_MODE_REPLY,
        PadCommand::SetAnalogMode => SET_ANALOG_MODE_REPLY,
        PadCommand::GetAnalogMode => {
            let mut reply = GET_ANALOG_MODE_REPLY;
            reply[GET_ANALOG_MODE_OFFSET] = analog_mode as u8;
            reply
        }
        PadCommand::Unknown46 => UNKNOWN_46_REPLY,
        PadCommand::Unknown47 => UNKNOWN_47_REPLY,
        PadCommand::Unknown4C => UNKNOWN_4C_REPLY,
        PadCommand::UnlockRumble => UNLOCK_RUMBLE_REPLY,
        PadCommand::Idle | PadCommand::Read => return None,
    };
    Some(reply)
}
