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

//! Input snapshot encoding
//!
//! Converts the normalized input state handed over by the host input layer
//! into the values a pad puts on the wire:
//!
//! - Buttons are inverted (active-low: 0 = pressed)
//! - Analog axes are mapped from `[-1.0, 1.0]` to `0..=255` with 128 = center
//! - Mouse motion is scaled by the port sensitivity and clamped to `i8`
//!
//! A snapshot is taken once per transaction, when the console starts polling
//! the port.

use serde::{Deserialize, Serialize};

use super::{buttons, ControllerKind};

/// Axis byte reported for a centered stick
pub const AXIS_CENTER: u8 = 0x80;

/// Sticks rarely reach the corners of their range, so axes are scaled up
/// before clamping.
const AXIS_SCALE: f32 = 1.3;

/// Minimum stick deflection that registers as a D-pad direction
const STICK_THRESHOLD: f32 = 0.85;

/// Mouse state reported by the host since the previous poll
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouseState {
    /// Left button held
    pub left: bool,
    /// Right button held
    pub right: bool,
    /// Horizontal motion in host units
    pub delta_x: f32,
    /// Vertical motion in host units
    pub delta_y: f32,
}

/// Normalized input for one port, as resolved by the host input layer
///
/// # Examples
///
/// ```
/// use psrx_pad::core::controller::{buttons, InputState};
///
/// let input = InputState {
///     raw_buttons: buttons::CROSS | buttons::START,
///     axes: Some([0.0, 0.0, -1.0, 1.0]),
///     ..Default::default()
/// };
/// assert_eq!(input.raw_buttons & buttons::CROSS, buttons::CROSS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Held buttons, one bit per button (1 = pressed)
    pub raw_buttons: u16,

    /// Stick axes in `[-1.0, 1.0]`: right X, right Y, left X, left Y
    pub axes: Option<[f32; 4]>,

    /// Mouse buttons and motion (mouse pads only)
    pub mouse: MouseState,
}

/// Stick positions as transmitted (0..=255, 128 = center)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBytes {
    pub right_x: u8,
    pub right_y: u8,
    pub left_x: u8,
    pub left_y: u8,
}

impl AxisBytes {
    /// Both sticks at rest
    pub const CENTERED: Self = Self {
        right_x: AXIS_CENTER,
        right_y: AXIS_CENTER,
        left_x: AXIS_CENTER,
        left_y: AXIS_CENTER,
    };

    /// Encode four normalized axes (right X, right Y, left X, left Y)
    pub fn from_axes(axes: [f32; 4]) -> Self {
        let [right_x, right_y, left_x, left_y] = axes.map(axis_to_u8);
        Self {
            right_x,
            right_y,
            left_x,
            left_y,
        }
    }

    /// Wire order of the stick bytes in an analog reply
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.right_x, self.right_y, self.left_x, self.left_y]
    }
}

impl Default for AxisBytes {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Pad data captured at the start of a transaction
///
/// Every reply byte of the transaction is derived from this snapshot, so
/// input or override changes made while bytes are being clocked only show up
/// in the next transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadData {
    /// Button state (active low: 0 = pressed)
    pub buttons: u16,

    /// Override mask captured with the buttons
    ///
    /// The mask is applied to the pressed bits, so a 0 bit forces the
    /// button to read as released.
    pub overrides: u16,

    /// Stick positions (analog and Negcon pads)
    pub axes: AxisBytes,

    /// Mouse button byte: upper nibble always set, bit 3 left, bit 2 right
    /// (0 = pressed)
    pub mouse_buttons: u8,

    /// Mouse motion since the previous poll
    pub mouse_dx: i8,
    pub mouse_dy: i8,
}

impl PadData {
    /// Nothing pressed, sticks centered, no overrides
    pub const RELEASED: Self = Self {
        buttons: 0xFFFF,
        overrides: 0xFFFF,
        axes: AxisBytes::CENTERED,
        mouse_buttons: 0xFC,
        mouse_dx: 0,
        mouse_dy: 0,
    };

    /// Build the transaction snapshot for a pad
    ///
    /// # Arguments
    ///
    /// * `kind` - Pad personality, decides which fields are encoded
    /// * `connected` - A disconnected port reports nothing pressed and centered sticks
    /// * `input` - Host input for this port
    /// * `overrides` - Current override mask of the port
    /// * `mouse_sensitivity` - Horizontal and vertical mouse scale factors
    pub fn snapshot(
        kind: ControllerKind,
        connected: bool,
        input: &InputState,
        overrides: u16,
        mouse_sensitivity: (f32, f32),
    ) -> Self {
        if !connected {
            return Self {
                overrides,
                ..Self::RELEASED
            };
        }

        let axes = match (kind, input.axes) {
            (ControllerKind::Analog | ControllerKind::Negcon, Some(axes)) => {
                AxisBytes::from_axes(axes)
            }
            _ => AxisBytes::CENTERED,
        };

        let (mouse_buttons, mouse_dx, mouse_dy) = if kind == ControllerKind::Mouse {
            encode_mouse(&input.mouse, mouse_sensitivity)
        } else {
            (Self::RELEASED.mouse_buttons, 0, 0)
        };

        Self {
            buttons: encode_buttons(input.raw_buttons),
            overrides,
            axes,
            mouse_buttons,
            mouse_dx,
            mouse_dy,
        }
    }

    /// Button state with overrides applied, as transmitted
    #[inline]
    pub fn effective_buttons(&self) -> u16 {
        encode_buttons(encode_buttons(self.buttons) & self.overrides)
    }
}

impl Default for PadData {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Invert host button bits into the active-low wire encoding
#[inline]
pub fn encode_buttons(raw_pressed: u16) -> u16 {
    raw_pressed ^ 0xFFFF
}

/// Map a normalized axis in `[-1.0, 1.0]` to a stick byte (128 = center)
///
/// # Examples
///
/// ```
/// use psrx_pad::core::controller::axis_to_u8;
///
/// assert_eq!(axis_to_u8(0.0), 128);
/// assert_eq!(axis_to_u8(1.0), 255);
/// assert_eq!(axis_to_u8(-1.0), 0);
/// ```
pub fn axis_to_u8(axis: f32) -> u8 {
    let scaled = (axis * AXIS_SCALE).clamp(-1.0, 1.0);
    (((scaled + 1.0) / 2.0) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Encode mouse buttons and motion
///
/// Returns the button byte and the clamped X/Y motion.
pub fn encode_mouse(mouse: &MouseState, sensitivity: (f32, f32)) -> (u8, i8, i8) {
    let left = if mouse.left { 0 } else { 1 };
    let right = if mouse.right { 0 } else { 1 };
    // Low two bits read back as zero on real mice
    let buttons = 0xF0 | (left << 3) | (right << 2);

    let dx = (mouse.delta_x * sensitivity.0).clamp(-128.0, 127.0) as i8;
    let dy = (mouse.delta_y * sensitivity.1).clamp(-128.0, 127.0) as i8;

    (buttons, dx, dy)
}

/// Fold a stick position into D-pad button bits
///
/// Helper for input layers driving a digital pad from an analog stick.
/// `y` is positive upward. Deflections below the threshold press nothing;
/// diagonals press two directions.
///
/// Returns raw pressed bits (1 = pressed) to OR into
/// [`InputState::raw_buttons`].
///
/// # Examples
///
/// ```
/// use psrx_pad::core::controller::{buttons, fold_stick_to_dpad};
///
/// assert_eq!(fold_stick_to_dpad(0.0, 1.0), buttons::UP);
/// assert_eq!(fold_stick_to_dpad(0.2, 0.1), 0);
/// ```
pub fn fold_stick_to_dpad(x: f32, y: f32) -> u16 {
    use std::f32::consts::PI;

    let distance_sq = x * x + y * y;
    if distance_sq < STICK_THRESHOLD * STICK_THRESHOLD {
        return 0;
    }

    let distance = distance_sq.sqrt();
    let (x, y) = (x / distance, y / distance);

    // Angle in [0, 2π), counter-clockwise from +X
    let mut angle = y.clamp(-1.0, 1.0).asin();
    if x < 0.0 {
        angle = PI - angle;
    } else if y < 0.0 {
        angle += 2.0 * PI;
    }

    let sector = |eighths: f32| eighths / 8.0 * PI;
    let mut pressed = 0;

    if angle < sector(2.5) || angle >= sector(13.5) {
        pressed |= buttons::RIGHT;
    }
    if (sector(1.5)..sector(6.5)).contains(&angle) {
        pressed |= buttons::UP;
    }
    if (sector(5.5)..sector(10.5)).contains(&angle) {
        pressed |= buttons::LEFT;
    }
    if (sector(9.5)..sector(14.5)).contains(&angle) {
        pressed |= buttons::DOWN;
    }

    pressed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_to_u8_reference_points() {
        assert_eq!(axis_to_u8(0.0), 128);
        assert_eq!(axis_to_u8(1.0), 255);
        assert_eq!(axis_to_u8(-1.0), 0);
    }

    #[test]
    fn test_axis_to_u8_scales_before_clamping() {
        // 0.8 * 1.3 > 1.0, so the stick already reads full deflection
        assert_eq!(axis_to_u8(0.8), 255);
        assert_eq!(axis_to_u8(-0.8), 0);
        // 0.5 * 1.3 = 0.65 -> (1.65 / 2) * 255 = 210.375
        assert_eq!(axis_to_u8(0.5), 210);
    }

    #[test]
    fn test_axis_to_u8_out_of_range_input() {
        assert_eq!(axis_to_u8(4.0), 255);
        assert_eq!(axis_to_u8(-4.0), 0);
    }

    #[test]
    fn test_encode_buttons_inverts() {
        assert_eq!(encode_buttons(0), 0xFFFF);
        assert_eq!(encode_buttons(0xFFFF), 0);
        assert_eq!(encode_buttons(buttons::CROSS), !buttons::CROSS);
    }

    #[test]
    fn test_snapshot_disconnected_ignores_input() {
        let input = InputState {
            raw_buttons: 0xFFFF,
            axes: Some([1.0, 1.0, -1.0, -1.0]),
            ..Default::default()
        };

        let pad = PadData::snapshot(ControllerKind::Analog, false, &input, 0x00FF, (0.5, 0.5));
        assert_eq!(pad.buttons, 0xFFFF);
        assert_eq!(pad.axes, AxisBytes::CENTERED);
        assert_eq!(pad.overrides, 0x00FF);
    }

    #[test]
    fn test_snapshot_digital_leaves_axes_centered() {
        let input = InputState {
            raw_buttons: buttons::UP,
            axes: Some([1.0, 1.0, 1.0, 1.0]),
            ..Default::default()
        };

        let pad = PadData::snapshot(ControllerKind::Digital, true, &input, 0xFFFF, (0.5, 0.5));
        assert_eq!(pad.buttons, !buttons::UP);
        assert_eq!(pad.axes, AxisBytes::CENTERED);
    }

    #[test]
    fn test_snapshot_negcon_encodes_axes() {
        let input = InputState {
            raw_buttons: 0,
            axes: Some([1.0, -1.0, 0.0, 0.5]),
            ..Default::default()
        };

        let pad = PadData::snapshot(ControllerKind::Negcon, true, &input, 0xFFFF, (0.5, 0.5));
        assert_eq!(pad.axes.to_bytes(), [255, 0, 128, 210]);
    }

    #[test]
    fn test_snapshot_analog_without_axes_is_centered() {
        let pad = PadData::snapshot(
            ControllerKind::Analog,
            true,
            &InputState::default(),
            0xFFFF,
            (0.5, 0.5),
        );
        assert_eq!(pad.axes, AxisBytes::CENTERED);
    }

    #[test]
    fn test_effective_buttons_applies_overrides() {
        let pad = PadData {
            buttons: !buttons::CROSS,
            overrides: !buttons::CIRCLE,
            ..PadData::RELEASED
        };
        assert_eq!(pad.effective_buttons(), !buttons::CROSS);

        let forced = PadData {
            buttons: !buttons::CROSS,
            overrides: !buttons::CROSS,
            ..PadData::RELEASED
        };
        assert_eq!(forced.effective_buttons(), 0xFFFF);
    }

    #[test]
    fn test_encode_mouse_buttons() {
        let idle = MouseState::default();
        assert_eq!(encode_mouse(&idle, (1.0, 1.0)).0, 0xFC);

        let left = MouseState {
            left: true,
            ..Default::default()
        };
        assert_eq!(encode_mouse(&left, (1.0, 1.0)).0, 0xF4);

        let both = MouseState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(encode_mouse(&both, (1.0, 1.0)).0, 0xF0);
    }

    #[test]
    fn test_encode_mouse_motion_scaled_and_clamped() {
        let mouse = MouseState {
            delta_x: 20.0,
            delta_y: -1000.0,
            ..Default::default()
        };
        let (_, dx, dy) = encode_mouse(&mouse, (0.5, 0.5));
        assert_eq!(dx, 10);
        assert_eq!(dy, -128);
    }

    #[test]
    fn test_fold_stick_cardinal_directions() {
        assert_eq!(fold_stick_to_dpad(1.0, 0.0), buttons::RIGHT);
        assert_eq!(fold_stick_to_dpad(0.0, 1.0), buttons::UP);
        assert_eq!(fold_stick_to_dpad(-1.0, 0.0), buttons::LEFT);
        assert_eq!(fold_stick_to_dpad(0.0, -1.0), buttons::DOWN);
    }

    #[test]
    fn test_fold_stick_diagonals() {
        let d = std::f32::consts::FRAC_1_SQRT_2;
        assert_eq!(fold_stick_to_dpad(d, d), buttons::UP | buttons::RIGHT);
        assert_eq!(fold_stick_to_dpad(-d, d), buttons::UP | buttons::LEFT);
        assert_eq!(fold_stick_to_dpad(-d, -d), buttons::DOWN | buttons::LEFT);
        assert_eq!(fold_stick_to_dpad(d, -d), buttons::DOWN | buttons::RIGHT);
    }

    #[test]
    fn test_fold_stick_below_threshold() {
        assert_eq!(fold_stick_to_dpad(0.0, 0.0), 0);
        assert_eq!(fold_stick_to_dpad(0.6, 0.5), 0);
    }
}
