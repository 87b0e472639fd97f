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

//! PSRX pad console
//!
//! Plays the console side of the controller port: selects a port through the
//! SIO0 registers, clocks transactions into the pad and prints what comes
//! back.
//!
//! ```text
//! psrx-pad --kind analog --analog --buttons cross,start 01,42,00,00,00,00,00,00,00
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use psrx_pad::core::config::PadsConfig;
use psrx_pad::core::controller::{buttons, ControllerKind, InputState, MouseState};
use psrx_pad::core::system::{ControllerPorts, JoyCtrl, JoyStat, Port};

/// Read command with room for the longest reply
const DEFAULT_TRANSACTION: &str = "01,42,00,00,00,00,00,00,00";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Digital,
    Analog,
    Mouse,
    Negcon,
}

impl From<Kind> for ControllerKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Digital => ControllerKind::Digital,
            Kind::Analog => ControllerKind::Analog,
            Kind::Mouse => ControllerKind::Mouse,
            Kind::Negcon => ControllerKind::Negcon,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "psrx-pad", version, about = "Poll an emulated PlayStation pad")]
struct Args {
    /// Pad configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Controller port to talk to (1 or 2)
    #[arg(short, long, default_value_t = 1)]
    port: usize,

    /// Pad type plugged into the port (implies connected)
    #[arg(short, long, value_enum)]
    kind: Option<Kind>,

    /// Turn the analog mode switch on
    #[arg(long)]
    analog: bool,

    /// Unplug the pad
    #[arg(long, conflicts_with = "kind")]
    disconnected: bool,

    /// Held buttons, by name or as a hex mask
    #[arg(short, long, value_delimiter = ',')]
    buttons: Vec<String>,

    /// Stick axes in [-1, 1]: right X, right Y, left X, left Y
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    axes: Option<Vec<f32>>,

    /// Mouse motion since the last poll: dx,dy
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    mouse: Option<Vec<f32>>,

    /// Hold the left mouse button
    #[arg(long)]
    mouse_left: bool,

    /// Hold the right mouse button
    #[arg(long)]
    mouse_right: bool,

    /// Buttons forced to read as released, by name or as a hex mask
    #[arg(long = "override", value_delimiter = ',')]
    overrides: Vec<String>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Transactions as comma-separated hex bytes, starting with the address
    #[arg(value_parser = parse_transaction)]
    transactions: Vec<Transaction>,
}

/// Bytes clocked out during one chip select
#[derive(Debug, Clone)]
struct Transaction(Vec<u8>);

fn parse_transaction(s: &str) -> Result<Transaction, String> {
    s.split(',')
        .map(|byte| {
            let byte = byte.trim();
            let digits = byte
                .strip_prefix("0x")
                .or_else(|| byte.strip_prefix("0X"))
                .unwrap_or(byte);
            u8::from_str_radix(digits, 16).map_err(|e| format!("invalid byte '{}': {}", byte, e))
        })
        .collect::<Result<_, _>>()
        .map(Transaction)
}

/// Button names, or raw hex masks such as `0x4008`
fn button_bits(names: &[String]) -> Result<u16, String> {
    names.iter().try_fold(0, |bits, name| {
        let mask = match name.strip_prefix("0x") {
            Some(hex) => u16::from_str_radix(hex, 16).ok(),
            None => buttons::from_name(name),
        };
        mask.map(|mask| bits | mask)
            .ok_or_else(|| format!("unknown button '{}'", name))
    })
}

/// Bytes as two-digit hex cells
fn hex_row(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Acknowledge flags in the same two-character cells as [`hex_row`]
fn ack_row(ack: &[bool]) -> String {
    ack.iter()
        .map(|&a| format!("{:>2}", if a { '+' } else { '-' }))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let port = Port::try_from(args.port)?;

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading pad config: {}", path.display());
            PadsConfig::load(path)?
        }
        None => PadsConfig::default(),
    };

    let settings = config.port_mut(port);
    if let Some(kind) = args.kind {
        settings.device_type = kind.into();
        settings.connected = true;
    }
    if args.disconnected {
        settings.connected = false;
    }

    if let Some(path) = &args.save_config {
        config.save(path)?;
        log::info!("Saved pad config: {}", path.display());
        return Ok(());
    }

    let mut ports = ControllerPorts::with_config(&config);
    ports.set_analog_mode(port, args.analog);

    let axes = match args.axes.as_deref() {
        None => None,
        Some(&[rx, ry, lx, ly]) => Some([rx, ry, lx, ly]),
        Some(other) => return Err(format!("expected 4 axes, got {}", other.len()).into()),
    };
    let mouse = match args.mouse.as_deref() {
        None => MouseState::default(),
        Some(&[delta_x, delta_y]) => MouseState {
            delta_x,
            delta_y,
            ..Default::default()
        },
        Some(other) => return Err(format!("expected dx,dy, got {} values", other.len()).into()),
    };

    ports.set_input(
        port,
        InputState {
            raw_buttons: button_bits(&args.buttons)?,
            axes,
            mouse: MouseState {
                left: args.mouse_left,
                right: args.mouse_right,
                ..mouse
            },
        },
    );

    let overrides = button_bits(&args.overrides)?;
    for bit in 0..16 {
        if overrides & (1 << bit) != 0 {
            ports.set_override(port, bit)?;
        }
    }

    let transactions = if args.transactions.is_empty() {
        vec![parse_transaction(DEFAULT_TRANSACTION)?]
    } else {
        args.transactions
    };

    log::info!(
        "{}: {:?} ({})",
        port,
        ports.controller(port).kind(),
        if ports.is_pad_connected(port) {
            "connected"
        } else {
            "disconnected"
        }
    );

    let select = match port {
        Port::One => JoyCtrl::TX_ENABLE | JoyCtrl::SELECT,
        Port::Two => JoyCtrl::TX_ENABLE | JoyCtrl::SELECT | JoyCtrl::PORT_SELECT,
    };

    for Transaction(bytes) in &transactions {
        ports.write_ctrl(select.bits());

        let mut rx = Vec::with_capacity(bytes.len());
        let mut ack = Vec::with_capacity(bytes.len());
        for &byte in bytes {
            ports.write_tx_data(byte);
            ack.push(ports.read_stat() & JoyStat::ACK_INPUT.bits() != 0);
            rx.push(ports.read_rx_data());
        }

        ports.write_ctrl(0);

        println!("TX  {}", hex_row(bytes));
        println!("RX  {}", hex_row(&rx));
        println!("ACK {}", ack_row(&ack));
    }

    Ok(())
}
