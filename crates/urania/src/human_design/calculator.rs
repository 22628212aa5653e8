use crate::ephemeris::{BodyPositions, CelestialBody, EphemerisProvider, EphemerisSettings};
use crate::error::{Result, UraniaError};
use crate::human_design::bodygraph::{Authority, BodyGraph, Definition, HdType};
use crate::human_design::gates::{activation_for_longitude, Activation};
use crate::time::{
    datetime_from_julian_day, julian_day, normalize_degrees, signed_difference, BirthData,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Solar arc between the design moment and birth.
pub const DESIGN_ARC: f64 = 88.0;
const DESIGN_TOLERANCE: f64 = 1e-4;
const MAX_ITERATIONS: usize = 30;
const MEAN_SOLAR_SPEED: f64 = 0.985_647;

/// Points whose gates are activated in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activator {
    Sun,
    Earth,
    Moon,
    NorthNode,
    SouthNode,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Activator {
    pub const ALL: [Activator; 13] = [
        Activator::Sun,
        Activator::Earth,
        Activator::Moon,
        Activator::NorthNode,
        Activator::SouthNode,
        Activator::Mercury,
        Activator::Venus,
        Activator::Mars,
        Activator::Jupiter,
        Activator::Saturn,
        Activator::Uranus,
        Activator::Neptune,
        Activator::Pluto,
    ];

    /// Body read from the ephemeris and the offset added to its longitude.
    fn source(&self) -> (CelestialBody, f64) {
        match self {
            Activator::Sun => (CelestialBody::Sun, 0.0),
            Activator::Earth => (CelestialBody::Sun, 180.0),
            Activator::Moon => (CelestialBody::Moon, 0.0),
            Activator::NorthNode => (CelestialBody::NorthNode, 0.0),
            Activator::SouthNode => (CelestialBody::NorthNode, 180.0),
            Activator::Mercury => (CelestialBody::Mercury, 0.0),
            Activator::Venus => (CelestialBody::Venus, 0.0),
            Activator::Mars => (CelestialBody::Mars, 0.0),
            Activator::Jupiter => (CelestialBody::Jupiter, 0.0),
            Activator::Saturn => (CelestialBody::Saturn, 0.0),
            Activator::Uranus => (CelestialBody::Uranus, 0.0),
            Activator::Neptune => (CelestialBody::Neptune, 0.0),
            Activator::Pluto => (CelestialBody::Pluto, 0.0),
        }
    }
}

pub type Activations = BTreeMap<Activator, Activation>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanDesignChart {
    pub birth: BirthData,
    pub personality_time: DateTime<Utc>,
    pub design_time: DateTime<Utc>,
    /// Conscious activations, at birth.
    pub personality: Activations,
    /// Unconscious activations, at the design moment.
    pub design: Activations,
    pub bodygraph: BodyGraph,
    /// Personality Sun line / design Sun line, e.g. "4/6".
    pub profile: String,
    /// Personality Sun, personality Earth, design Sun, design Earth gates.
    pub incarnation_cross: [u8; 4],
    pub source: String,
}

impl HumanDesignChart {
    pub fn hd_type(&self) -> HdType {
        self.bodygraph.hd_type
    }

    pub fn strategy(&self) -> &'static str {
        self.bodygraph.hd_type.strategy()
    }

    pub fn authority(&self) -> Authority {
        self.bodygraph.authority
    }

    pub fn definition(&self) -> Definition {
        self.bodygraph.definition
    }
}

pub struct HumanDesignCalculator {
    provider: Arc<dyn EphemerisProvider>,
}

impl HumanDesignCalculator {
    pub fn new(provider: Arc<dyn EphemerisProvider>) -> Self {
        Self { provider }
    }

    pub fn calculate(&self, birth: &BirthData) -> Result<HumanDesignChart> {
        let personality_time = birth.to_utc()?;
        let birth_jd = julian_day(personality_time);

        let (personality, source) = self.activations(birth_jd)?;
        let sun = personality
            .get(&Activator::Sun)
            .ok_or(UraniaError::MissingBody(CelestialBody::Sun))?;
        let design_jd = self.design_moment(birth_jd, sun.longitude)?;
        let (design, _) = self.activations(design_jd)?;

        let bodygraph = BodyGraph::from_gates(
            personality
                .values()
                .chain(design.values())
                .map(|a| a.gate),
        );

        let gate = |set: &Activations, key: Activator| {
            set.get(&key)
                .copied()
                .ok_or(UraniaError::MissingBody(key.source().0))
        };
        let p_sun = gate(&personality, Activator::Sun)?;
        let p_earth = gate(&personality, Activator::Earth)?;
        let d_sun = gate(&design, Activator::Sun)?;
        let d_earth = gate(&design, Activator::Earth)?;

        let design_time = datetime_from_julian_day(design_jd).ok_or_else(|| {
            UraniaError::InvalidInput(format!("design Julian Day {} is out of range", design_jd))
        })?;

        log::debug!(
            "human design for {}: design moment {}, {:?}, profile {}/{}",
            personality_time,
            design_time,
            bodygraph.hd_type,
            p_sun.line,
            d_sun.line
        );

        Ok(HumanDesignChart {
            birth: *birth,
            personality_time,
            design_time,
            profile: format!("{}/{}", p_sun.line, d_sun.line),
            incarnation_cross: [p_sun.gate, p_earth.gate, d_sun.gate, d_earth.gate],
            personality,
            design,
            bodygraph,
            source,
        })
    }

    fn activations(&self, jd: f64) -> Result<(Activations, String)> {
        let mut bodies: Vec<CelestialBody> = Activator::ALL.iter().map(|a| a.source().0).collect();
        bodies.dedup();
        let request = EphemerisSettings {
            bodies,
            ..EphemerisSettings::default()
        };
        let sky = self.provider.calc_positions(jd, None, &request)?;
        let activations = activations_from_positions(&sky.bodies)?;
        Ok((activations, sky.source))
    }

    /// Moment before birth when the Sun stood [`DESIGN_ARC`] degrees behind
    /// its birth longitude, by Newton iteration on the Sun's longitude.
    pub fn design_moment(&self, birth_jd: f64, birth_sun: f64) -> Result<f64> {
        let target = normalize_degrees(birth_sun - DESIGN_ARC);
        let mut jd = birth_jd - DESIGN_ARC / MEAN_SOLAR_SPEED;

        for _ in 0..MAX_ITERATIONS {
            let sun = self.provider.position(jd, CelestialBody::Sun)?;
            let error = signed_difference(sun.longitude, target);
            if error.abs() < DESIGN_TOLERANCE {
                return Ok(jd);
            }
            let speed = if sun.speed > 0.5 { sun.speed } else { MEAN_SOLAR_SPEED };
            jd -= error / speed;
        }

        Err(UraniaError::Convergence {
            what: "design moment search".to_string(),
            iterations: MAX_ITERATIONS,
        })
    }
}

/// Activations for every point, given raw positions.
pub fn activations_from_positions(positions: &BodyPositions) -> Result<Activations> {
    Activator::ALL
        .iter()
        .map(|&activator| {
            let (body, offset) = activator.source();
            let pos = positions.get(&body).ok_or(UraniaError::MissingBody(body))?;
            Ok((activator, activation_for_longitude(pos.longitude + offset)))
        })
        .collect()
}
