//! Western astrology decans calculations.
//!
//! Each sign is divided into 3 decans (10 degrees each), with decan rulers
//! rotating through the signs of the same element.

use crate::ephemeris::CelestialBody;
use crate::western::rulers::sign_ruler;
use crate::western::signs::{degree_in_sign, Element, ZodiacSign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecanInfo {
    pub sign: ZodiacSign,
    pub element: Element,
    #[serde(rename = "signRuler")]
    pub sign_ruler: CelestialBody,
    /// 1, 2, or 3
    #[serde(rename = "decanIndex")]
    pub decan_index: u8,
    /// 0 <= x < 30
    #[serde(rename = "degreeInSign")]
    pub degree_in_sign: f64,
    #[serde(rename = "decanRuler")]
    pub decan_ruler: CelestialBody,
}

/// Decan index 1, 2, or 3 for a degree in sign. Out-of-range input wraps into the sign.
pub fn get_decan_index(degree_in_sign: f64) -> u8 {
    let d = degree_in_sign.rem_euclid(30.0);
    if d < 10.0 {
        1
    } else if d < 20.0 {
        2
    } else {
        3
    }
}

/// Compute decan info given a sign and degree in that sign.
pub fn get_decan_info_for_sign_and_degree(sign: ZodiacSign, degree_in_sign: f64) -> DecanInfo {
    let decan_index = get_decan_index(degree_in_sign);
    // Signs of one element sit four apart; the rulers rotate through that triplicity.
    let ruling_sign = ZodiacSign::from_index(sign.index() + 4 * usize::from(decan_index - 1));

    DecanInfo {
        sign,
        element: sign.element(),
        sign_ruler: sign_ruler(sign, false),
        decan_index,
        degree_in_sign: degree_in_sign.rem_euclid(30.0),
        decan_ruler: sign_ruler(ruling_sign, false),
    }
}

/// From absolute longitude 0-360.
pub fn get_decan_info_from_longitude(longitude: f64) -> DecanInfo {
    get_decan_info_for_sign_and_degree(
        ZodiacSign::from_longitude(longitude),
        degree_in_sign(longitude),
    )
}
