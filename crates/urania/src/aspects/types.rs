use crate::ephemeris::CelestialBody;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    Semisextile,
}

impl AspectKind {
    /// Matching order: the first entry within orb wins.
    pub const ALL: [AspectKind; 7] = [
        AspectKind::Conjunction,
        AspectKind::Opposition,
        AspectKind::Trine,
        AspectKind::Square,
        AspectKind::Sextile,
        AspectKind::Quincunx,
        AspectKind::Semisextile,
    ];

    pub fn angle(&self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Opposition => 180.0,
            AspectKind::Trine => 120.0,
            AspectKind::Square => 90.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Semisextile => 30.0,
        }
    }

    pub fn default_orb(&self) -> f64 {
        match self {
            AspectKind::Conjunction | AspectKind::Opposition | AspectKind::Trine => 8.0,
            AspectKind::Square => 7.0,
            AspectKind::Sextile => 6.0,
            AspectKind::Quincunx => 3.0,
            AspectKind::Semisextile => 2.0,
        }
    }

    /// The five Ptolemaic aspects.
    pub fn is_major(&self) -> bool {
        !matches!(self, AspectKind::Quincunx | AspectKind::Semisextile)
    }

    pub fn id(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Opposition => "opposition",
            AspectKind::Trine => "trine",
            AspectKind::Square => "square",
            AspectKind::Sextile => "sextile",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Semisextile => "semisextile",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AspectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        AspectKind::ALL
            .iter()
            .copied()
            .find(|k| k.id() == key)
            .or((key == "inconjunct").then_some(AspectKind::Quincunx))
            .ok_or_else(|| format!("Unknown aspect: {}", s))
    }
}

/// How close an aspect is to exact, by orb as a fraction of the allowed orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectStrength {
    Exact,
    Strong,
    Medium,
    Weak,
}

impl AspectStrength {
    pub fn from_orb(orb: f64, max_orb: f64) -> Self {
        if max_orb <= 0.0 {
            return AspectStrength::Exact;
        }
        let pct = orb.abs() / max_orb;
        if pct <= 0.10 {
            AspectStrength::Exact
        } else if pct <= 0.35 {
            AspectStrength::Strong
        } else if pct <= 0.70 {
            AspectStrength::Medium
        } else {
            AspectStrength::Weak
        }
    }
}

/// Allowed orb per aspect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbTable {
    orbs: [f64; 7],
}

impl OrbTable {
    pub fn get(&self, kind: AspectKind) -> f64 {
        self.orbs[kind.index()]
    }

    pub fn set(&mut self, kind: AspectKind, orb: f64) {
        self.orbs[kind.index()] = orb;
    }

    pub fn with(mut self, kind: AspectKind, orb: f64) -> Self {
        self.set(kind, orb);
        self
    }

    /// Every orb multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            orbs: self.orbs.map(|o| o * factor),
        }
    }

    pub fn max_orb(&self) -> f64 {
        self.orbs.iter().copied().fold(0.0, f64::max)
    }
}

impl Default for OrbTable {
    fn default() -> Self {
        Self {
            orbs: AspectKind::ALL.map(|k| k.default_orb()),
        }
    }
}

/// Core aspect information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectCore {
    #[serde(rename = "type")]
    pub kind: AspectKind,
    /// Exact angle for this aspect
    pub exact_angle: f64,
    /// Deviation from the exact angle
    pub orb: f64,
    /// Orb allowed for this aspect kind
    pub max_orb: f64,
    pub strength: AspectStrength,
    /// Whether the aspect is applying (approaching exact)
    pub is_applying: bool,
    /// Whether the aspect is exact (within 0.1 degrees)
    pub is_exact: bool,
    /// Whether either body is retrograde
    pub is_retrograde: bool,
}

/// Reference to a body in a named layer ("natal", "transit", "partner", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectObjectRef {
    pub layer_id: String,
    pub body: CelestialBody,
}

/// An aspect pair between two objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectPair {
    pub from: AspectObjectRef,
    pub to: AspectObjectRef,
    pub aspect: AspectCore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectSetKind {
    IntraLayer,
    InterLayer,
}

/// A set of aspects (intra-layer or inter-layer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectSet {
    pub id: String,
    pub label: String,
    pub kind: AspectSetKind,
    pub layer_ids: Vec<String>,
    pub pairs: Vec<AspectPair>,
}

/// Settings for aspect calculations
#[derive(Debug, Clone, Default)]
pub struct AspectSettings {
    pub orbs: OrbTable,
    /// Bodies to include; empty means all
    pub include_objects: Vec<CelestialBody>,
    /// Whether to only include major aspects
    pub only_major: bool,
}

impl AspectSettings {
    pub fn with_orbs(orbs: OrbTable) -> Self {
        Self {
            orbs,
            ..Self::default()
        }
    }

    pub(crate) fn includes(&self, body: CelestialBody) -> bool {
        self.include_objects.is_empty() || self.include_objects.contains(&body)
    }
}
