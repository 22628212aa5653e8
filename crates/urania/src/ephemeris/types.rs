use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Bodies and points the calculators know how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Chiron,
}

impl CelestialBody {
    pub const ALL: [CelestialBody; 13] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
        CelestialBody::NorthNode,
        CelestialBody::SouthNode,
        CelestialBody::Chiron,
    ];

    /// Sun through Pluto.
    pub const PLANETS: [CelestialBody; 10] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "sun",
            CelestialBody::Moon => "moon",
            CelestialBody::Mercury => "mercury",
            CelestialBody::Venus => "venus",
            CelestialBody::Mars => "mars",
            CelestialBody::Jupiter => "jupiter",
            CelestialBody::Saturn => "saturn",
            CelestialBody::Uranus => "uranus",
            CelestialBody::Neptune => "neptune",
            CelestialBody::Pluto => "pluto",
            CelestialBody::NorthNode => "north_node",
            CelestialBody::SouthNode => "south_node",
            CelestialBody::Chiron => "chiron",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
            CelestialBody::NorthNode => "North Node",
            CelestialBody::SouthNode => "South Node",
            CelestialBody::Chiron => "Chiron",
        }
    }

    pub fn is_luminary(&self) -> bool {
        matches!(self, CelestialBody::Sun | CelestialBody::Moon)
    }

    /// Bodies whose apparent motion can turn retrograde.
    pub fn can_station(&self) -> bool {
        matches!(
            self,
            CelestialBody::Mercury
                | CelestialBody::Venus
                | CelestialBody::Mars
                | CelestialBody::Jupiter
                | CelestialBody::Saturn
                | CelestialBody::Uranus
                | CelestialBody::Neptune
                | CelestialBody::Pluto
                | CelestialBody::Chiron
        )
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CelestialBody {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        CelestialBody::ALL
            .iter()
            .copied()
            .find(|b| b.id() == key)
            .or(match key.as_str() {
                "true_node" | "mean_node" | "node" | "rahu" => Some(CelestialBody::NorthNode),
                "ketu" => Some(CelestialBody::SouthNode),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown body: {}", s))
    }
}

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Raw geocentric ecliptic position as returned by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticPosition {
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
}

impl EclipticPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed < 0.0
    }

    /// The lunar south node mirrors the north node.
    pub fn opposite_node(&self) -> Self {
        Self {
            longitude: (self.longitude + 180.0).rem_euclid(360.0),
            latitude: -self.latitude,
            distance: self.distance,
            speed: self.speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    Koch,
    Porphyry,
    Equal,
    WholeSign,
    Regiomontanus,
    Campanus,
}

impl HouseSystem {
    pub const ALL: [HouseSystem; 7] = [
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Porphyry,
        HouseSystem::Equal,
        HouseSystem::WholeSign,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
            HouseSystem::Koch => "koch",
            HouseSystem::Porphyry => "porphyry",
            HouseSystem::Equal => "equal",
            HouseSystem::WholeSign => "whole_sign",
            HouseSystem::Regiomontanus => "regiomontanus",
            HouseSystem::Campanus => "campanus",
        }
    }

    /// Swiss Ephemeris house system letter.
    pub fn code(&self) -> u8 {
        match self {
            HouseSystem::Placidus => b'P',
            HouseSystem::Koch => b'K',
            HouseSystem::Porphyry => b'O',
            HouseSystem::Equal => b'E',
            HouseSystem::WholeSign => b'W',
            HouseSystem::Regiomontanus => b'R',
            HouseSystem::Campanus => b'C',
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HouseSystem {
    type Err = super::EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        HouseSystem::ALL
            .iter()
            .copied()
            .find(|h| {
                h.id() == key
                    || (key.len() == 1 && h.code() == key.as_bytes()[0].to_ascii_uppercase())
            })
            .ok_or_else(|| super::EphemerisError::InvalidHouseSystem {
                system: s.to_string(),
                valid: HouseSystem::ALL.iter().map(|h| h.id().to_string()).collect(),
            })
    }
}

/// House cusps and angles for one moment and place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePositions {
    /// System that actually produced the cusps.
    pub system: HouseSystem,
    /// Cusps of houses 1..=12 in degrees.
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// What the calculators ask a provider for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisSettings {
    pub house_system: HouseSystem,
    pub bodies: Vec<CelestialBody>,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        let mut bodies = CelestialBody::PLANETS.to_vec();
        bodies.extend([CelestialBody::NorthNode, CelestialBody::SouthNode, CelestialBody::Chiron]);
        Self {
            house_system: HouseSystem::Placidus,
            bodies,
        }
    }
}

pub type BodyPositions = BTreeMap<CelestialBody, EclipticPosition>;

/// Complete position data for one moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyPositions {
    pub julian_day: f64,
    pub bodies: BodyPositions,
    /// House positions (None if no location provided)
    pub houses: Option<HousePositions>,
    /// Name of the provider that produced the data.
    pub source: String,
}
