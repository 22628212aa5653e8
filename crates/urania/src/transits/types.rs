use crate::aspects::{AspectKind, AspectSettings, AspectStrength};
use crate::ephemeris::CelestialBody;
use crate::western::ZodiacSign;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct TransitSettings {
    /// Transiting bodies
    pub bodies: Vec<CelestialBody>,
    pub aspects: AspectSettings,
}

impl Default for TransitSettings {
    fn default() -> Self {
        let mut bodies = CelestialBody::PLANETS.to_vec();
        bodies.extend([CelestialBody::NorthNode, CelestialBody::Chiron]);
        Self {
            bodies,
            aspects: AspectSettings::default(),
        }
    }
}

/// A transiting body aspecting a natal body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitAspect {
    pub transiting: CelestialBody,
    pub natal: CelestialBody,
    #[serde(rename = "type")]
    pub kind: AspectKind,
    pub exact_angle: f64,
    pub orb: f64,
    pub strength: AspectStrength,
    pub applying: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitPosition {
    pub body: CelestialBody,
    pub longitude: f64,
    pub speed: f64,
    pub sign: ZodiacSign,
    pub degree: f64,
    /// Natal house the body is passing through
    pub natal_house: u8,
    pub retrograde: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitReport {
    pub at: DateTime<Utc>,
    pub julian_day: f64,
    pub source: String,
    pub positions: Vec<TransitPosition>,
    pub aspects: Vec<TransitAspect>,
}

/// A body entering a new sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingress {
    pub body: CelestialBody,
    pub at: DateTime<Utc>,
    pub from: ZodiacSign,
    pub to: ZodiacSign,
    pub retrograde: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationKind {
    Retrograde,
    Direct,
}

/// A body's apparent motion changing direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub body: CelestialBody,
    pub at: DateTime<Utc>,
    pub kind: StationKind,
    pub longitude: f64,
}

/// A window in which a transiting body stays within orb of an aspect to a natal body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitEvent {
    pub transiting: CelestialBody,
    pub natal: CelestialBody,
    #[serde(rename = "type")]
    pub kind: AspectKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sample with the tightest orb
    pub exact: DateTime<Utc>,
    pub min_orb: f64,
    pub strength: AspectStrength,
}
