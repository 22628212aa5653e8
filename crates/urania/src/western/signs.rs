//! Zodiac signs with their elements and modalities.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign containing an ecliptic longitude (any real value, wrapped to 0-360).
    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index((longitude.rem_euclid(360.0) / 30.0).floor() as usize)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// 0 for Aries through 11 for Pisces.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn start_longitude(&self) -> f64 {
        self.index() as f64 * 30.0
    }

    pub fn element(&self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    pub fn modality(&self) -> Modality {
        match self.index() % 3 {
            0 => Modality::Cardinal,
            1 => Modality::Fixed,
            _ => Modality::Mutable,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn opposite(&self) -> Self {
        Self::from_index(self.index() + 6)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Degree within the sign, in [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    let d = longitude.rem_euclid(360.0) % 30.0;
    if d >= 30.0 {
        0.0
    } else {
        d
    }
}

/// How well two elements combine, from -1 (clashing) to 1 (same element).
pub fn element_affinity(a: Element, b: Element) -> f64 {
    use Element::*;
    match (a, b) {
        _ if a == b => 1.0,
        (Fire, Air) | (Air, Fire) | (Earth, Water) | (Water, Earth) => 0.6,
        (Fire, Earth) | (Earth, Fire) | (Air, Earth) | (Earth, Air) => -0.3,
        (Air, Water) | (Water, Air) => -0.4,
        _ => -0.6,
    }
}
