//! House cusp assignment.

use crate::ephemeris::HousePositions;
use crate::time::normalize_degrees;
use crate::western::{degree_in_sign, ZodiacSign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseData {
    /// 1-12
    pub number: u8,
    /// Cusp longitude
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree: f64,
}

impl HouseData {
    pub fn from_positions(houses: &HousePositions) -> Vec<HouseData> {
        houses
            .cusps
            .iter()
            .zip(1u8..)
            .map(|(&cusp, number)| HouseData {
                number,
                longitude: cusp,
                sign: ZodiacSign::from_longitude(cusp),
                degree: degree_in_sign(cusp),
            })
            .collect()
    }
}

/// House (1-12) whose circular interval `[cusp_i, cusp_i+1)` contains `longitude`.
///
/// Intervals are measured forward through the zodiac, so a house spanning
/// 0 Aries is handled. For degenerate cusp sets the nearest preceding cusp wins.
pub fn house_for_longitude(longitude: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_degrees(longitude);
    for i in 0..12 {
        let start = cusps[i];
        let span = (cusps[(i + 1) % 12] - start).rem_euclid(360.0);
        let offset = (lon - start).rem_euclid(360.0);
        if span > 0.0 && offset < span {
            return i as u8 + 1;
        }
    }

    let mut best = 0;
    let mut best_offset = f64::INFINITY;
    for (i, &cusp) in cusps.iter().enumerate() {
        let offset = (lon - cusp).rem_euclid(360.0);
        if offset < best_offset {
            best = i;
            best_offset = offset;
        }
    }
    best as u8 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_from(asc: f64) -> [f64; 12] {
        std::array::from_fn(|i| (asc + 30.0 * i as f64).rem_euclid(360.0))
    }

    #[test]
    fn test_house_simple() {
        let cusps = equal_from(0.0);
        assert_eq!(house_for_longitude(0.0, &cusps), 1);
        assert_eq!(house_for_longitude(29.99, &cusps), 1);
        assert_eq!(house_for_longitude(30.0, &cusps), 2);
        assert_eq!(house_for_longitude(359.0, &cusps), 12);
    }

    #[test]
    fn test_house_wraps_through_aries() {
        let cusps = equal_from(350.0);
        assert_eq!(house_for_longitude(355.0, &cusps), 1);
        assert_eq!(house_for_longitude(5.0, &cusps), 1);
        assert_eq!(house_for_longitude(20.0, &cusps), 2);
        assert_eq!(house_for_longitude(345.0, &cusps), 12);
    }

    #[test]
    fn test_house_always_in_range() {
        let cusps = [
            10.0, 35.0, 62.0, 95.0, 130.0, 165.0, 190.0, 215.0, 242.0, 275.0, 310.0, 345.0,
        ];
        for i in 0..720 {
            let h = house_for_longitude(i as f64 * 0.5 - 0.25, &cusps);
            assert!((1..=12).contains(&h));
        }
        let degenerate = [0.0; 12];
        assert!((1..=12).contains(&house_for_longitude(123.0, &degenerate)));
    }

    #[test]
    fn test_house_data_from_positions() {
        let houses = HousePositions {
            system: crate::ephemeris::HouseSystem::Equal,
            cusps: equal_from(95.0),
            ascendant: 95.0,
            midheaven: 5.0,
        };
        let data = HouseData::from_positions(&houses);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0].number, 1);
        assert_eq!(data[0].sign, ZodiacSign::Cancer);
        assert!((data[0].degree - 5.0).abs() < 1e-9);
        assert_eq!(data[11].number, 12);
    }
}
