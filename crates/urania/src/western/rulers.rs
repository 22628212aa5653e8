//! Sign rulers for Western astrology.
//!
//! Maps zodiac signs to their planetary rulers (traditional and modern).

use crate::ephemeris::CelestialBody;
use crate::western::signs::ZodiacSign;

const TRADITIONAL_RULERS: [CelestialBody; 12] = [
    CelestialBody::Mars,    // Aries
    CelestialBody::Venus,   // Taurus
    CelestialBody::Mercury, // Gemini
    CelestialBody::Moon,    // Cancer
    CelestialBody::Sun,     // Leo
    CelestialBody::Mercury, // Virgo
    CelestialBody::Venus,   // Libra
    CelestialBody::Mars,    // Scorpio
    CelestialBody::Jupiter, // Sagittarius
    CelestialBody::Saturn,  // Capricorn
    CelestialBody::Saturn,  // Aquarius
    CelestialBody::Jupiter, // Pisces
];

/// Get sign ruler, with outer planets for Scorpio, Aquarius and Pisces when `modern`.
pub fn sign_ruler(sign: ZodiacSign, modern: bool) -> CelestialBody {
    if modern {
        match sign {
            ZodiacSign::Scorpio => return CelestialBody::Pluto,
            ZodiacSign::Aquarius => return CelestialBody::Uranus,
            ZodiacSign::Pisces => return CelestialBody::Neptune,
            _ => {}
        }
    }
    TRADITIONAL_RULERS[sign.index()]
}

pub fn sign_ruler_from_longitude(longitude: f64, modern: bool) -> CelestialBody {
    sign_ruler(ZodiacSign::from_longitude(longitude), modern)
}

/// Signs a body rules.
pub fn ruled_signs(body: CelestialBody, modern: bool) -> Vec<ZodiacSign> {
    ZodiacSign::ALL
        .iter()
        .copied()
        .filter(|s| sign_ruler(*s, modern) == body)
        .collect()
}
