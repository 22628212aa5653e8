use crate::aspects::{AspectKind, AspectSettings, AspectStrength};
use crate::ephemeris::CelestialBody;
use crate::western::Element;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partner {
    A,
    B,
}

#[derive(Debug, Clone, Default)]
pub struct SynastrySettings {
    pub aspects: AspectSettings,
}

/// An aspect from a body of chart A to a body of chart B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynastryAspect {
    pub body_a: CelestialBody,
    pub body_b: CelestialBody,
    #[serde(rename = "type")]
    pub kind: AspectKind,
    pub orb: f64,
    pub strength: AspectStrength,
    /// -1 (tense) to 1 (harmonious)
    pub harmony: f64,
    pub description: String,
}

impl SynastryAspect {
    pub fn involves(&self, body: CelestialBody) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// A body of one partner falling in a house of the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynastryHouse {
    /// Whose body it is
    pub body_owner: Partner,
    pub body: CelestialBody,
    /// House number in the other partner's chart
    pub house: u8,
    pub harmony: f64,
    pub description: String,
}

/// Element compatibility of a pair of placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementContact {
    pub body_a: CelestialBody,
    pub body_b: CelestialBody,
    pub element_a: Element,
    pub element_b: Element,
    pub harmony: f64,
}

/// Overall and per-category compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// 0-100
    pub overall: f64,
    pub aspect_harmony: f64,
    pub house_harmony: f64,
    pub element_harmony: f64,
    pub luminary_harmony: f64,
    pub emotional: f64,
    pub romantic: f64,
    pub communication: f64,
    pub stability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynastryReport {
    pub aspects: Vec<SynastryAspect>,
    pub houses: Vec<SynastryHouse>,
    pub elements: Vec<ElementContact>,
    pub score: CompatibilityScore,
}
