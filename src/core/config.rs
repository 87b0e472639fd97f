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

//! Persisted pad configuration
//!
//! One [`PortConfig`] per controller port. Only the device type, the
//! connected flag and the mouse sensitivity matter to the pad emulation;
//! input source selection and key bindings are carried for the host input
//! layer and treated as opaque strings here.
//!
//! Configurations are stored as TOML. A JSON form (`{"pads": [...]}`) is
//! also accepted; ports missing from either document fall back to their
//! defaults. Fields missing from a port entry take that port's defaults too,
//! so an entry for port 1 that leaves out `connected` keeps the pad plugged in.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::controller::{buttons, ControllerKind};
use super::error::Result;
use super::system::Port;

/// Where the host input layer reads a port's buttons from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputType {
    /// Gamepad if one is present, keyboard otherwise
    #[default]
    Auto,
    Controller,
    Keyboard,
}

/// Settings of one controller port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    /// Pad plugged into the port
    pub device_type: ControllerKind,

    /// Whether anything is plugged in at all
    pub connected: bool,

    /// Input source selection
    pub input_type: InputType,

    /// Host gamepad slot used for this port
    pub controller_id: u32,

    /// Mouse motion scale factors
    pub mouse_sensitivity_x: f32,
    pub mouse_sensitivity_y: f32,

    /// Host key toggling the analog mode switch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analog_mode_key: Option<String>,

    /// Button name -> keyboard key name
    pub keyboard: HashMap<String, String>,

    /// Button name -> gamepad button name
    pub gamepad: HashMap<String, String>,
}

impl PortConfig {
    /// Create default configuration
    ///
    /// # Arguments
    ///
    /// * `first_port` - Port 1 ships with a pad connected, port 2 empty
    pub fn default_config(first_port: bool) -> Self {
        let keyboard = [
            ("UP", "ArrowUp"),
            ("RIGHT", "ArrowRight"),
            ("DOWN", "ArrowDown"),
            ("LEFT", "ArrowLeft"),
            ("CROSS", "KeyX"),
            ("TRIANGLE", "KeyS"),
            ("SQUARE", "KeyZ"),
            ("CIRCLE", "KeyD"),
            ("SELECT", "Backspace"),
            ("START", "Enter"),
            ("L1", "KeyQ"),
            ("L2", "KeyA"),
            ("L3", "KeyW"),
            ("R1", "KeyR"),
            ("R2", "KeyF"),
            ("R3", "KeyT"),
        ];
        let gamepad = [
            ("UP", "DPadUp"),
            ("RIGHT", "DPadRight"),
            ("DOWN", "DPadDown"),
            ("LEFT", "DPadLeft"),
            ("CROSS", "Cross"),
            ("TRIANGLE", "Triangle"),
            ("SQUARE", "Square"),
            ("CIRCLE", "Circle"),
            ("SELECT", "Back"),
            ("START", "Start"),
            ("L1", "LeftBumper"),
            ("L2", "LeftTrigger"),
            ("L3", "LeftThumb"),
            ("R1", "RightBumper"),
            ("R2", "RightTrigger"),
            ("R3", "RightThumb"),
        ];

        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(button, key)| (button.to_string(), key.to_string()))
                .collect()
        };

        Self {
            device_type: ControllerKind::Digital,
            connected: first_port,
            input_type: InputType::Auto,
            controller_id: 0,
            mouse_sensitivity_x: 0.5,
            mouse_sensitivity_y: 0.5,
            analog_mode_key: None,
            keyboard: to_map(&keyboard),
            gamepad: to_map(&gamepad),
        }
    }

    /// Log bindings that name buttons the pads don't have
    fn check_bindings(&self, port: Port) {
        for button in self.keyboard.keys().chain(self.gamepad.keys()) {
            if buttons::from_name(button).is_none() {
                log::warn!("Unknown button in {} config: {}", port, button);
            }
        }
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::default_config(false)
    }
}

/// Configuration of both controller ports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadsConfig {
    pub pads: [PortConfig; 2],
}

/// On-disk layout; tolerates missing or extra port entries
#[derive(Debug, Default, Deserialize)]
struct PadsDocument {
    #[serde(default)]
    pads: Vec<PortEntry>,
}

/// One `pads` entry as written on disk
///
/// `connected` is the only field whose default depends on the port, so it
/// is read separately and resolved once the entry's position is known.
#[derive(Debug, Deserialize)]
struct PortEntry {
    connected: Option<bool>,
    #[serde(flatten)]
    config: PortConfig,
}

impl PortEntry {
    fn resolve(self, port: Port) -> PortConfig {
        let defaults = PortConfig::default_config(port == Port::One);
        PortConfig {
            connected: self.connected.unwrap_or(defaults.connected),
            ..self.config
        }
    }
}

impl PadsConfig {
    /// Get the configuration of a port
    #[inline]
    pub fn port(&self, port: Port) -> &PortConfig {
        &self.pads[port.index()]
    }

    /// Get mutable configuration of a port
    #[inline]
    pub fn port_mut(&mut self, port: Port) -> &mut PortConfig {
        &mut self.pads[port.index()]
    }

    fn from_document(document: PadsDocument) -> Self {
        if document.pads.len() > 2 {
            log::warn!(
                "Config lists {} pads, ignoring all but the first two",
                document.pads.len()
            );
        }

        let mut entries = document.pads.into_iter();
        let mut next = |port: Port| match entries.next() {
            Some(entry) => entry.resolve(port),
            None => PortConfig::default_config(port == Port::One),
        };
        let config = Self {
            pads: [next(Port::One), next(Port::Two)],
        };

        for port in Port::ALL {
            config.port(port).check_bindings(port);
        }
        config
    }

    /// Parse a TOML configuration
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let document: PadsDocument = toml::from_str(contents)?;
        Ok(Self::from_document(document))
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse a JSON configuration (`{"pads": [...]}`)
    pub fn from_json(contents: &str) -> Result<Self> {
        let document: PadsDocument = serde_json::from_str(contents)?;
        Ok(Self::from_document(document))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from file
    ///
    /// Files ending in `.json` are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Save configuration to file, in the format implied by its extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = if is_json(path) {
            self.to_json()?
        } else {
            self.to_toml_string()?
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for PadsConfig {
    fn default() -> Self {
        Self {
            pads: [
                PortConfig::default_config(true),
                PortConfig::default_config(false),
            ],
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
