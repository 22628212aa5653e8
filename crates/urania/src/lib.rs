//! Astrological calculation core: ephemeris access, natal charts, aspects,
//! transits, synastry, numerology and Human Design.

pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod human_design;
pub mod numerology;
pub mod synastry;
pub mod time;
pub mod transits;
pub mod western;

pub use aspects::{AspectCalculator, AspectKind, AspectSettings, AspectStrength, OrbTable};
pub use chart::{ChartCalculator, ChartSettings, HouseData, NatalChart, PlanetPosition};
pub use ephemeris::{
    ApproximateEphemeris, CelestialBody, EphemerisError, EphemerisProvider, FallbackEphemeris,
    GeoLocation, HouseSystem, SwissEphemerisAdapter,
};
pub use error::{Result, UraniaError};
pub use human_design::{HumanDesignCalculator, HumanDesignChart};
pub use synastry::{SynastryEngine, SynastryReport};
pub use time::BirthData;
pub use transits::{TransitReport, TransitsCalculator};
pub use western::{Element, Modality, ZodiacSign};
