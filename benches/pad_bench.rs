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

//! Pad transaction benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use psrx_pad::core::controller::{buttons, Controller, ControllerKind, InputState};
use psrx_pad::core::system::{ControllerPorts, Port};
use std::hint::black_box;

fn analog_input() -> InputState {
    InputState {
        raw_buttons: buttons::CROSS | buttons::R1,
        axes: Some([0.25, -0.5, 1.0, 0.0]),
        ..Default::default()
    }
}

fn bench_analog_read(c: &mut Criterion) {
    let mut controller = Controller::new(ControllerKind::Analog);
    controller.set_analog_mode(true);
    controller.set_input(analog_input());

    c.bench_function("analog_read_transaction", |b| {
        b.iter(|| {
            controller.start_poll();
            for byte in [0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00] {
                black_box(controller.poll(black_box(byte)));
            }
        });
    });
}

fn bench_config_handshake(c: &mut Criterion) {
    let mut controller = Controller::new(ControllerKind::Analog);

    c.bench_function("config_handshake", |b| {
        b.iter(|| {
            // Enter config mode, switch analog on, leave config mode
            for command in [
                [0x43, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00],
                [0x44, 0x00, 0x01, 0x03, 0x00, 0x00, 0x00, 0x00],
                [0x43, 0x00, 0x00, 0x5A, 0x5A, 0x5A, 0x5A, 0x5A],
            ] {
                controller.start_poll();
                for byte in command {
                    black_box(controller.poll(black_box(byte)));
                }
            }
        });
    });
}

fn bench_register_transaction(c: &mut Criterion) {
    let mut ports = ControllerPorts::new();
    ports.set_input(Port::One, analog_input());

    c.bench_function("register_digital_transaction", |b| {
        b.iter(|| {
            ports.write_ctrl(0x1003);
            for byte in [0x01, 0x42, 0x00, 0x00, 0x00] {
                ports.write_tx_data(black_box(byte));
                black_box(ports.read_rx_data());
            }
            ports.write_ctrl(0x0000);
        });
    });
}

criterion_group!(
    benches,
    bench_analog_read,
    bench_config_handshake,
    bench_register_transaction
);
criterion_main!(benches);
