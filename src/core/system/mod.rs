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

//! System integration for the controller ports
//!
//! The console has exactly two controller ports sharing one serial
//! interface (SIO0). [`ControllerPorts`] owns both port sessions and is
//! handed around by reference; there is no global pad manager.

mod controller_ports;

pub use controller_ports::{ControllerPorts, JoyCtrl, JoyStat};

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ControllerError;

/// One of the two controller ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Port {
    One,
    Two,
}

impl Port {
    /// Both ports, in order
    pub const ALL: [Port; 2] = [Port::One, Port::Two];

    /// Zero-based array index
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Port::One => 0,
            Port::Two => 1,
        }
    }
}

/// Convert a port number as printed on the console (1 or 2)
impl TryFrom<usize> for Port {
    type Error = ControllerError;

    fn try_from(port: usize) -> Result<Self, Self::Error> {
        match port {
            1 => Ok(Port::One),
            2 => Ok(Port::Two),
            _ => Err(ControllerError::InvalidPort { port }),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {}", self.index() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_numbers() {
        assert_eq!(Port::try_from(1).unwrap(), Port::One);
        assert_eq!(Port::try_from(2).unwrap(), Port::Two);
        assert!(matches!(
            Port::try_from(0),
            Err(ControllerError::InvalidPort { port: 0 })
        ));
        assert!(Port::try_from(3).is_err());
    }

    #[test]
    fn test_port_display() {
        assert_eq!(Port::One.to_string(), "port 1");
        assert_eq!(Port::Two.to_string(), "port 2");
    }
}
