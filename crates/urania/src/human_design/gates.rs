//! Gate wheel of the Human Design mandala.
//!
//! The 64 gates each span 5.625° of ecliptic longitude, laid out in a fixed
//! order starting at 302° (gate 41). Each gate holds six lines, each line six
//! colors, each color six tones.

use crate::time::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const GATE_SIZE: f64 = 360.0 / 64.0;
pub const LINE_SIZE: f64 = GATE_SIZE / 6.0;
pub const COLOR_SIZE: f64 = LINE_SIZE / 6.0;
pub const TONE_SIZE: f64 = COLOR_SIZE / 6.0;

/// Longitude where the wheel starts.
pub const WHEEL_START: f64 = 302.0;

/// Gates in wheel order from [`WHEEL_START`].
pub const GATE_ORDER: [u8; 64] = [
    41, 19, 13, 49, 30, 55, 37, 63, 22, 36, 25, 17, 21, 51, 42, 3, 27, 24, 2, 23, 8, 20, 16, 35,
    45, 12, 15, 52, 39, 53, 62, 56, 31, 33, 7, 4, 29, 59, 40, 64, 47, 6, 46, 18, 48, 57, 32, 50,
    28, 44, 1, 43, 14, 34, 9, 5, 26, 11, 10, 58, 38, 54, 61, 60,
];

lazy_static::lazy_static! {
    /// Gate number to its slot on the wheel.
    static ref WHEEL_INDEX: HashMap<u8, usize> = GATE_ORDER
        .iter()
        .enumerate()
        .map(|(index, &gate)| (gate, index))
        .collect();
}

/// A longitude resolved down to gate, line, color and tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub gate: u8,
    pub line: u8,
    pub color: u8,
    pub tone: u8,
    pub longitude: f64,
}

/// Subdivision `1..=6` of `offset` within a span of six `size` steps.
fn sixth(offset: f64, size: f64) -> (u8, f64) {
    let index = ((offset / size).floor() as i64).clamp(0, 5);
    (index as u8 + 1, offset - index as f64 * size)
}

pub fn activation_for_longitude(longitude: f64) -> Activation {
    let longitude = normalize_degrees(longitude);
    let offset = (longitude - WHEEL_START).rem_euclid(360.0);
    let slot = ((offset / GATE_SIZE) as usize).min(GATE_ORDER.len() - 1);
    let within_gate = offset - slot as f64 * GATE_SIZE;

    let (line, within_line) = sixth(within_gate, LINE_SIZE);
    let (color, within_color) = sixth(within_line, COLOR_SIZE);
    let (tone, _) = sixth(within_color, TONE_SIZE);

    Activation {
        gate: GATE_ORDER[slot],
        line,
        color,
        tone,
        longitude,
    }
}

/// Longitude range `[start, end)` covered by a gate. `end` may exceed 360.
pub fn gate_range(gate: u8) -> Option<(f64, f64)> {
    let slot = *WHEEL_INDEX.get(&gate)?;
    let start = normalize_degrees(WHEEL_START + slot as f64 * GATE_SIZE);
    Some((start, start + GATE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_start_is_gate_41() {
        let a = activation_for_longitude(302.0);
        assert_eq!(a.gate, 41);
        assert_eq!(a.line, 1);
        assert_eq!(a.color, 1);
        assert_eq!(a.tone, 1);
    }

    #[test]
    fn test_zero_aries_is_gate_25() {
        assert_eq!(activation_for_longitude(0.0).gate, 25);
        assert_eq!(activation_for_longitude(360.0).gate, 25);
    }

    #[test]
    fn test_lines_advance_within_gate() {
        let a = activation_for_longitude(302.0 + 2.5 * LINE_SIZE);
        assert_eq!(a.gate, 41);
        assert_eq!(a.line, 3);
        let last = activation_for_longitude(302.0 + GATE_SIZE - 1e-9);
        assert_eq!(last.gate, 41);
        assert_eq!(last.line, 6);
        assert_eq!(activation_for_longitude(302.0 + GATE_SIZE).gate, 19);
    }

    #[test]
    fn test_gate_order_is_a_permutation() {
        let mut gates = GATE_ORDER.to_vec();
        gates.sort_unstable();
        assert_eq!(gates, (1..=64).collect::<Vec<u8>>());
    }

    #[test]
    fn test_gate_range_round_trip() {
        for gate in 1..=64 {
            let (start, _) = gate_range(gate).unwrap();
            assert_eq!(activation_for_longitude(start + 0.01).gate, gate);
        }
        assert!(gate_range(65).is_none());
    }
}
