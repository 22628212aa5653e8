//! Essential dignities for Western astrology.
//!
//! Calculates rulership, detriment, exaltation, fall, and exact exaltation for planets.

use crate::ephemeris::CelestialBody;
use crate::time::signed_difference;
use crate::western::signs::ZodiacSign;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DignityType {
    Rulership,
    Detriment,
    Exaltation,
    Fall,
    ExactExaltation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DignityResult {
    #[serde(rename = "type")]
    pub dignity_type: DignityType,
    pub sign: ZodiacSign,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactExaltation {
    pub body: CelestialBody,
    /// Longitude in degrees
    pub position: f64,
    /// Orb in degrees
    pub orbit: f64,
}

/// Domicile, detriment, exaltation and fall signs of a body.
struct DignityTable {
    rulership: &'static [ZodiacSign],
    detriment: &'static [ZodiacSign],
    exaltation: Option<ZodiacSign>,
    fall: Option<ZodiacSign>,
}

fn dignity_table(body: CelestialBody) -> Option<DignityTable> {
    use ZodiacSign::*;
    let table = match body {
        CelestialBody::Sun => DignityTable {
            rulership: &[Leo],
            detriment: &[Aquarius],
            exaltation: Some(Aries),
            fall: Some(Libra),
        },
        CelestialBody::Moon => DignityTable {
            rulership: &[Cancer],
            detriment: &[Capricorn],
            exaltation: Some(Taurus),
            fall: Some(Scorpio),
        },
        CelestialBody::Mercury => DignityTable {
            rulership: &[Gemini, Virgo],
            detriment: &[Sagittarius, Pisces],
            exaltation: Some(Virgo),
            fall: Some(Pisces),
        },
        CelestialBody::Venus => DignityTable {
            rulership: &[Taurus, Libra],
            detriment: &[Aries, Scorpio],
            exaltation: Some(Pisces),
            fall: Some(Virgo),
        },
        CelestialBody::Mars => DignityTable {
            rulership: &[Aries, Scorpio],
            detriment: &[Libra, Taurus],
            exaltation: Some(Capricorn),
            fall: Some(Cancer),
        },
        CelestialBody::Jupiter => DignityTable {
            rulership: &[Sagittarius, Pisces],
            detriment: &[Gemini, Virgo],
            exaltation: Some(Cancer),
            fall: Some(Capricorn),
        },
        CelestialBody::Saturn => DignityTable {
            rulership: &[Capricorn, Aquarius],
            detriment: &[Cancer, Leo],
            exaltation: Some(Libra),
            fall: Some(Aries),
        },
        CelestialBody::Uranus => DignityTable {
            rulership: &[Aquarius],
            detriment: &[Leo],
            exaltation: None,
            fall: None,
        },
        CelestialBody::Neptune => DignityTable {
            rulership: &[Pisces],
            detriment: &[Virgo],
            exaltation: None,
            fall: None,
        },
        CelestialBody::Pluto => DignityTable {
            rulership: &[Scorpio],
            detriment: &[Taurus],
            exaltation: Some(Aries),
            fall: Some(Libra),
        },
        _ => return None,
    };
    Some(table)
}

/// Check if a planet is within `orbit` of its exact exaltation degree
fn has_exact_exaltation(planet_position: f64, exact_position: f64, orbit: f64) -> bool {
    signed_difference(planet_position, exact_position).abs() <= orbit
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DignitiesService;

impl DignitiesService {
    /// Get dignities for a body based on its longitude
    pub fn get_dignities(
        &self,
        body: CelestialBody,
        longitude: f64,
        exact_exaltations: Option<&[ExactExaltation]>,
    ) -> Vec<DignityResult> {
        let Some(table) = dignity_table(body) else {
            return Vec::new();
        };

        let sign = ZodiacSign::from_longitude(longitude);
        let plain = |dignity_type| DignityResult {
            dignity_type,
            sign,
            degree: None,
        };

        let mut result = Vec::new();
        if table.rulership.contains(&sign) {
            result.push(plain(DignityType::Rulership));
        } else if table.detriment.contains(&sign) {
            result.push(plain(DignityType::Detriment));
        }
        if table.exaltation == Some(sign) {
            result.push(plain(DignityType::Exaltation));
        } else if table.fall == Some(sign) {
            result.push(plain(DignityType::Fall));
        }

        for exact in exact_exaltations.unwrap_or_default() {
            if exact.body == body && has_exact_exaltation(longitude, exact.position, exact.orbit) {
                result.push(DignityResult {
                    dignity_type: DignityType::ExactExaltation,
                    sign,
                    degree: Some(exact.position),
                });
            }
        }

        result
    }

    /// Classical exact exaltation degrees with a 2 degree orbit
    pub fn get_default_exact_exaltations() -> Vec<ExactExaltation> {
        [
            (CelestialBody::Sun, 19.0),
            (CelestialBody::Moon, 33.0),
            (CelestialBody::Mercury, 165.0),
            (CelestialBody::Venus, 357.0),
            (CelestialBody::Mars, 298.0),
            (CelestialBody::Jupiter, 95.0),
            (CelestialBody::Saturn, 201.0),
        ]
        .into_iter()
        .map(|(body, position)| ExactExaltation {
            body,
            position,
            orbit: 2.0,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_dignities_sun() {
        let service = DignitiesService;
        // Sun in Leo (120-150 degrees)
        let dignities = service.get_dignities(CelestialBody::Sun, 135.0, None);
        assert!(dignities.iter().any(|d| d.dignity_type == DignityType::Rulership));
    }

    #[test]
    fn test_get_dignities_moon() {
        let service = DignitiesService;
        // Moon in Cancer (90-120 degrees)
        let dignities = service.get_dignities(CelestialBody::Moon, 105.0, None);
        assert!(dignities.iter().any(|d| d.dignity_type == DignityType::Rulership));
    }

    #[test]
    fn test_exact_exaltation_wraps_around_aries() {
        let service = DignitiesService;
        let exact = DignitiesService::get_default_exact_exaltations();
        // Venus exact exaltation at 27 Pisces, 358.5 is within orbit.
        let dignities = service.get_dignities(CelestialBody::Venus, 358.5, Some(&exact));
        assert!(dignities.iter().any(|d| d.dignity_type == DignityType::ExactExaltation));
        // 0.5 Aries is 3.5 degrees away.
        let dignities = service.get_dignities(CelestialBody::Venus, 0.5, Some(&exact));
        assert!(dignities.iter().all(|d| d.dignity_type != DignityType::ExactExaltation));
    }

    #[test]
    fn test_nodes_have_no_dignities() {
        let service = DignitiesService;
        assert!(service.get_dignities(CelestialBody::NorthNode, 10.0, None).is_empty());
    }
}
