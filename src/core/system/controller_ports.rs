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

//! PlayStation Controller Port Registers
//!
//! This module owns the two pad sessions and the memory-mapped I/O
//! registers the console uses to talk to them.

use bitflags::bitflags;

use super::Port;
use crate::core::config::PadsConfig;
use crate::core::controller::protocol::PAD_ADDRESS;
use crate::core::controller::{Controller, InputState};
use crate::core::error::{ControllerError, Result};

bitflags! {
    /// JOY_STAT (0x1F801044)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct JoyStat: u32 {
        /// TX buffer can take a byte
        const TX_READY = 1 << 0;
        /// RX FIFO holds a byte
        const RX_NOT_EMPTY = 1 << 1;
        /// Transmission finished
        const TX_FINISHED = 1 << 2;
        /// /ACK input level (device wants the next byte)
        const ACK_INPUT = 1 << 7;
        /// Interrupt request
        const IRQ = 1 << 9;
    }
}

bitflags! {
    /// JOY_CTRL (0x1F80104A)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct JoyCtrl: u16 {
        const TX_ENABLE = 1 << 0;
        /// /JOYn output (chip select)
        const SELECT = 1 << 1;
        const RX_ENABLE = 1 << 2;
        /// Write 1 to acknowledge the interrupt
        const ACKNOWLEDGE = 1 << 4;
        /// Write 1 to reset the interface
        const RESET = 1 << 6;
        const TX_IRQ_ENABLE = 1 << 10;
        const RX_IRQ_ENABLE = 1 << 11;
        const ACK_IRQ_ENABLE = 1 << 12;
        /// 0 = port 1, 1 = port 2
        const PORT_SELECT = 1 << 13;
    }
}

/// Progress of the byte exchange since chip select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    /// Waiting for the address byte
    Address,
    /// Talking to the pad
    Pad,
    /// Not for a pad (or rejected): nobody answers until deselect
    Ignored,
}

/// PlayStation Controller Port Registers
///
/// Manages the memory-mapped I/O registers for controller communication
/// and the pads plugged into both ports.
///
/// # Register Map
/// - 0x1F801040: JOY_TX_DATA / JOY_RX_DATA (read/write)
/// - 0x1F801044: JOY_STAT (Status register)
/// - 0x1F801048: JOY_MODE (Mode register)
/// - 0x1F80104A: JOY_CTRL (Control register)
/// - 0x1F80104E: JOY_BAUD (Baud rate)
///
/// # Protocol
/// The controller uses a synchronous serial protocol:
/// 1. Write to JOY_CTRL to select a port
/// 2. Write the address byte (0x01 for pads) to JOY_TX_DATA
/// 3. Write command and data bytes, reading each answer from JOY_RX_DATA
///    while the pad keeps acknowledging (JOY_STAT bit 7)
/// 4. Write to JOY_CTRL to deselect
///
/// # Examples
///
/// ```
/// use psrx_pad::core::system::{ControllerPorts, Port};
///
/// let mut ports = ControllerPorts::new();
///
/// assert_eq!(ports.start_poll(Port::One), 0xFF);
/// assert_eq!(ports.poll(Port::One, 0x42), (0x41, true));
/// assert_eq!(ports.poll(Port::One, 0x00), (0x5A, true));
/// ```
pub struct ControllerPorts {
    /// JOY_TX_DATA (0x1F801040) - Transmit data
    tx_data: u8,

    /// JOY_RX_DATA (0x1F801040) - Receive data (same register)
    rx_data: u8,

    /// JOY_STAT (0x1F801044) - Status register
    stat: JoyStat,

    /// JOY_MODE (0x1F801048) - Mode register
    mode: u16,

    /// JOY_CTRL (0x1F80104A) - Control register
    ctrl: JoyCtrl,

    /// JOY_BAUD (0x1F80104E) - Baud rate
    baud: u16,

    /// Pads on port 1 and 2
    controllers: [Controller; 2],

    /// Currently selected port
    selected_port: Option<Port>,

    /// Exchange progress on the selected port
    transfer: Transfer,
}

impl ControllerPorts {
    /// JOY_STAT while idle
    const STAT_IDLE: JoyStat = JoyStat::TX_READY.union(JoyStat::TX_FINISHED);

    /// Create new controller ports with default state
    ///
    /// Uses the default configuration: a digital pad on port 1, port 2 empty.
    pub fn new() -> Self {
        let mut ports = Self {
            tx_data: 0xFF,
            rx_data: 0xFF,
            stat: Self::STAT_IDLE,
            mode: 0x000D,
            ctrl: JoyCtrl::empty(),
            baud: 0,
            controllers: [Controller::default(), Controller::default()],
            selected_port: None,
            transfer: Transfer::Address,
        };
        ports.apply_config(&PadsConfig::default());
        ports
    }

    /// Create controller ports from a configuration
    pub fn with_config(config: &PadsConfig) -> Self {
        let mut ports = Self::new();
        ports.apply_config(config);
        ports
    }

    /// Resolve the pad type, connection and mouse settings of both ports
    pub fn apply_config(&mut self, config: &PadsConfig) {
        for port in Port::ALL {
            let settings = config.port(port);
            let controller = self.controller_mut(port);
            controller.set_kind(settings.device_type);
            controller.set_connected(settings.connected);
            controller.set_mouse_sensitivity(
                settings.mouse_sensitivity_x,
                settings.mouse_sensitivity_y,
            );
            log::debug!(
                "{}: {:?} ({})",
                port,
                settings.device_type,
                if settings.connected {
                    "connected"
                } else {
                    "disconnected"
                }
            );
        }
    }

    /// Reset the interface and both pads
    pub fn reset(&mut self) {
        self.stat = Self::STAT_IDLE;
        self.ctrl = JoyCtrl::empty();
        self.selected_port = None;
        self.transfer = Transfer::Address;
        for controller in &mut self.controllers {
            controller.reset();
        }
    }

    /// Write to TX_DATA register (0x1F801040)
    ///
    /// Transmits a byte to the selected controller and receives a response byte.
    ///
    /// # Arguments
    ///
    /// * `value` - Byte to transmit
    pub fn write_tx_data(&mut self, value: u8) {
        self.tx_data = value;

        let (rx, ack) = match self.selected_port {
            Some(port) => self.transfer_byte(port, value),
            None => (0xFF, false),
        };
        self.rx_data = rx;

        // Set RX ready flag (bit 1)
        self.stat.insert(JoyStat::RX_NOT_EMPTY);

        if ack {
            self.stat.insert(JoyStat::ACK_INPUT);
            if self.ctrl.contains(JoyCtrl::ACK_IRQ_ENABLE) {
                self.stat.insert(JoyStat::IRQ);
            }
        } else {
            self.stat.remove(JoyStat::ACK_INPUT);
        }
    }

    /// Exchange one byte with the pad on `port`
    ///
    /// Returns the answer and whether the pad acknowledges it.
    fn transfer_byte(&mut self, port: Port, value: u8) -> (u8, bool) {
        let controller = &mut self.controllers[port.index()];

        match self.transfer {
            Transfer::Address if value == PAD_ADDRESS => {
                self.transfer = Transfer::Pad;
                (controller.start_poll(), controller.is_connected())
            }
            Transfer::Address => {
                log::trace!("{}: address 0x{:02X} is not for a pad", port, value);
                self.transfer = Transfer::Ignored;
                (0xFF, false)
            }
            Transfer::Pad => {
                let (rx, valid) = controller.poll(value);
                if !valid {
                    self.transfer = Transfer::Ignored;
                }
                (rx, valid && controller.has_pending_reply())
            }
            Transfer::Ignored => (0xFF, false),
        }
    }

    /// Read from RX_DATA register (0x1F801040)
    ///
    /// Returns the last received byte from the controller.
    ///
    /// # Returns
    ///
    /// Received byte
    pub fn read_rx_data(&mut self) -> u8 {
        // Clear RX ready flag
        self.stat.remove(JoyStat::RX_NOT_EMPTY);
        self.rx_data
    }

    /// Write to CTRL register (0x1F80104A)
    ///
    /// Controls controller selection and interrupt acknowledgment.
    ///
    /// # Arguments
    ///
    /// * `value` - Control register value
    pub fn write_ctrl(&mut self, value: u16) {
        let ctrl = JoyCtrl::from_bits_retain(value);
        self.ctrl = ctrl;

        if ctrl.contains(JoyCtrl::RESET) {
            self.stat = Self::STAT_IDLE;
            self.transfer = Transfer::Address;
        }

        if ctrl.contains(JoyCtrl::ACKNOWLEDGE) {
            self.stat.remove(JoyStat::IRQ);
        }

        if ctrl.contains(JoyCtrl::SELECT) {
            let port = if ctrl.contains(JoyCtrl::PORT_SELECT) {
                Port::Two
            } else {
                Port::One
            };

            // CTRL is rewritten during a transfer (IRQ acks); only a new
            // selection restarts the exchange.
            if self.selected_port != Some(port) {
                self.selected_port = Some(port);
                self.transfer = Transfer::Address;
                log::trace!("Controller {} selected", port);
            }
        } else if let Some(port) = self.selected_port.take() {
            self.transfer = Transfer::Address;
            log::trace!("Controller {} deselected", port);
        }
    }

    /// Read STAT register (0x1F801044)
    #[inline]
    pub fn read_stat(&self) -> u32 {
        self.stat.bits()
    }

    /// Read MODE register (0x1F801048)
    #[inline]
    pub fn read_mode(&self) -> u16 {
        self.mode
    }

    /// Write MODE register (0x1F801048)
    #[inline]
    pub fn write_mode(&mut self, value: u16) {
        self.mode = value;
    }

    /// Read CTRL register (0x1F80104A)
    #[inline]
    pub fn read_ctrl(&self) -> u16 {
        self.ctrl.bits()
    }

    /// Read BAUD register (0x1F80104E)
    #[inline]
    pub fn read_baud(&self) -> u16 {
        self.baud
    }

    /// Write BAUD register (0x1F80104E)
    #[inline]
    pub fn write_baud(&mut self, value: u16) {
        self.baud = value;
    }

    /// Last byte written to TX_DATA
    #[inline]
    pub fn last_tx_data(&self) -> u8 {
        self.tx_data
    }

    /// Currently selected port
    #[inline]
    pub fn selected_port(&self) -> Option<Port> {
        self.selected_port
    }

    /// Start a pad transaction directly, bypassing the registers
    ///
    /// # Returns
    ///
    /// Always 0xFF
    pub fn start_poll(&mut self, port: Port) -> u8 {
        self.controller_mut(port).start_poll()
    }

    /// Clock one byte into the pad on `port`, bypassing the registers
    ///
    /// # Returns
    ///
    /// The reply byte, and `false` if the pad rejected the command
    pub fn poll(&mut self, port: Port, value: u8) -> (u8, bool) {
        self.controller_mut(port).poll(value)
    }

    /// Hand the latest host input for a port to its pad
    pub fn set_input(&mut self, port: Port, input: InputState) {
        self.controller_mut(port).set_input(input);
    }

    /// Force a button of a port to read as released
    pub fn set_override(&mut self, port: Port, index: u32) -> Result<()> {
        self.controller_mut(port).set_override(index)
    }

    /// Remove a button override
    pub fn clear_override(&mut self, port: Port, index: u32) -> Result<()> {
        self.controller_mut(port).clear_override(index)
    }

    /// Flip the analog mode switch of a port
    pub fn set_analog_mode(&mut self, port: Port, enabled: bool) {
        self.controller_mut(port).set_analog_mode(enabled);
    }

    /// Whether a button is pressed, overrides applied
    pub fn get_button(&self, port: Port, index: u32) -> Result<bool> {
        self.controller(port).get_button(index)
    }

    /// Whether a pad is plugged into a port
    pub fn is_pad_connected(&self, port: Port) -> bool {
        self.controller(port).is_connected()
    }

    /// Get reference to the pad at a port
    #[inline]
    pub fn controller(&self, port: Port) -> &Controller {
        &self.controllers[port.index()]
    }

    /// Get mutable reference to the pad at a port
    #[inline]
    pub fn controller_mut(&mut self, port: Port) -> &mut Controller {
        &mut self.controllers[port.index()]
    }

    /// Serialize both pad sessions
    pub fn save_state(&self) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(&self.controllers, bincode::config::standard())
            .map_err(|e| ControllerError::SaveState(format!("Failed to encode: {}", e)))
    }

    /// Restore both pad sessions from [`ControllerPorts::save_state`] output
    ///
    /// Host input is not part of the state and is kept as is. Any exchange in
    /// progress on the registers is dropped. A state whose reply cursor does
    /// not fit the reply buffer is rejected and the current sessions are kept.
    pub fn load_state(&mut self, data: &[u8]) -> Result<()> {
        let (mut controllers, _): ([Controller; 2], usize) =
            bincode::serde::decode_from_slice(data, bincode::config::standard())
                .map_err(|e| ControllerError::SaveState(format!("Failed to decode: {}", e)))?;

        if let Some(port) = Port::ALL
            .into_iter()
            .find(|port| !controllers[port.index()].is_consistent())
        {
            return Err(ControllerError::SaveState(format!(
                "Inconsistent transaction state for {}",
                port
            )));
        }

        for (restored, current) in controllers.iter_mut().zip(&self.controllers) {
            restored.set_input(*current.input());
        }
        self.controllers = controllers;
        self.selected_port = None;
        self.transfer = Transfer::Address;
        Ok(())
    }
}

impl Default for ControllerPorts {
    fn default() -> Self {
        Self::new()
    }
}
