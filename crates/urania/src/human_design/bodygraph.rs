//! Centers, channels and the traits derived from which of them are defined.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    SolarPlexus,
    Sacral,
    Spleen,
    Root,
}

impl Center {
    pub const ALL: [Center; 9] = [
        Center::Head,
        Center::Ajna,
        Center::Throat,
        Center::G,
        Center::Heart,
        Center::SolarPlexus,
        Center::Sacral,
        Center::Spleen,
        Center::Root,
    ];

    /// Centers that supply energy for action.
    pub fn is_motor(&self) -> bool {
        matches!(
            self,
            Center::Sacral | Center::SolarPlexus | Center::Heart | Center::Root
        )
    }

    pub fn gates(&self) -> &'static [u8] {
        match self {
            Center::Head => &[64, 61, 63],
            Center::Ajna => &[47, 24, 4, 17, 43, 11],
            Center::Throat => &[62, 23, 56, 35, 12, 45, 33, 8, 31, 20, 16],
            Center::G => &[7, 1, 13, 10, 25, 15, 46, 2],
            Center::Heart => &[21, 40, 26, 51],
            Center::SolarPlexus => &[6, 37, 22, 36, 30, 55, 49],
            Center::Sacral => &[5, 14, 29, 59, 9, 3, 42, 27, 34],
            Center::Spleen => &[48, 57, 44, 50, 32, 28, 18],
            Center::Root => &[53, 60, 52, 19, 39, 41, 58, 38, 54],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Center::Head => "Head",
            Center::Ajna => "Ajna",
            Center::Throat => "Throat",
            Center::G => "G",
            Center::Heart => "Heart",
            Center::SolarPlexus => "Solar Plexus",
            Center::Sacral => "Sacral",
            Center::Spleen => "Spleen",
            Center::Root => "Root",
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Center a gate belongs to; `None` outside 1..=64.
pub fn center_of_gate(gate: u8) -> Option<Center> {
    Center::ALL
        .iter()
        .copied()
        .find(|c| c.gates().contains(&gate))
}

/// The 36 channels, each joining two gates in different centers.
pub const CHANNELS: [(u8, u8); 36] = [
    (1, 8),
    (2, 14),
    (3, 60),
    (4, 63),
    (5, 15),
    (6, 59),
    (7, 31),
    (9, 52),
    (10, 20),
    (10, 34),
    (10, 57),
    (11, 56),
    (12, 22),
    (13, 33),
    (16, 48),
    (17, 62),
    (18, 58),
    (19, 49),
    (20, 34),
    (20, 57),
    (21, 45),
    (23, 43),
    (24, 61),
    (25, 51),
    (26, 44),
    (27, 50),
    (28, 38),
    (29, 46),
    (30, 41),
    (32, 54),
    (34, 57),
    (35, 36),
    (37, 40),
    (39, 55),
    (42, 53),
    (47, 64),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HdType {
    Manifestor,
    Generator,
    ManifestingGenerator,
    Projector,
    Reflector,
}

impl HdType {
    pub fn strategy(&self) -> &'static str {
        match self {
            HdType::Manifestor => "Inform before acting",
            HdType::Generator => "Wait to respond",
            HdType::ManifestingGenerator => "Wait to respond, then inform",
            HdType::Projector => "Wait for the invitation",
            HdType::Reflector => "Wait a lunar cycle before deciding",
        }
    }

    /// Feeling that signals living in line with the type.
    pub fn signature(&self) -> &'static str {
        match self {
            HdType::Manifestor => "peace",
            HdType::Generator | HdType::ManifestingGenerator => "satisfaction",
            HdType::Projector => "success",
            HdType::Reflector => "surprise",
        }
    }

    pub fn not_self_theme(&self) -> &'static str {
        match self {
            HdType::Manifestor => "anger",
            HdType::Generator | HdType::ManifestingGenerator => "frustration",
            HdType::Projector => "bitterness",
            HdType::Reflector => "disappointment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    Emotional,
    Sacral,
    Splenic,
    Ego,
    SelfProjected,
    Lunar,
    Mental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    None,
    Single,
    Split,
    TripleSplit,
    QuadrupleSplit,
}

impl Definition {
    fn from_groups(groups: usize) -> Self {
        match groups {
            0 => Definition::None,
            1 => Definition::Single,
            2 => Definition::Split,
            3 => Definition::TripleSplit,
            _ => Definition::QuadrupleSplit,
        }
    }
}

/// Defined structure of a chart, derived from its activated gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyGraph {
    pub gates: BTreeSet<u8>,
    pub channels: Vec<(u8, u8)>,
    pub defined_centers: BTreeSet<Center>,
    pub hd_type: HdType,
    pub authority: Authority,
    pub definition: Definition,
}

impl BodyGraph {
    pub fn from_gates(gates: impl IntoIterator<Item = u8>) -> Self {
        let gates: BTreeSet<u8> = gates.into_iter().collect();
        let channels: Vec<(u8, u8)> = CHANNELS
            .iter()
            .copied()
            .filter(|(a, b)| gates.contains(a) && gates.contains(b))
            .collect();

        let edges: Vec<(Center, Center)> = channels
            .iter()
            .filter_map(|&(a, b)| Some((center_of_gate(a)?, center_of_gate(b)?)))
            .collect();
        let defined_centers: BTreeSet<Center> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        let groups = components(&defined_centers, &edges);

        let motor_to_throat = groups.get(&Center::Throat).is_some_and(|throat_group| {
            defined_centers
                .iter()
                .any(|c| c.is_motor() && groups.get(c) == Some(throat_group))
        });

        let hd_type = derive_type(&defined_centers, motor_to_throat);
        let authority = derive_authority(&defined_centers, hd_type);
        let group_count = groups.values().collect::<BTreeSet<_>>().len();

        Self {
            gates,
            channels,
            defined_centers,
            hd_type,
            authority,
            definition: Definition::from_groups(group_count),
        }
    }

    pub fn is_defined(&self, center: Center) -> bool {
        self.defined_centers.contains(&center)
    }

    pub fn open_centers(&self) -> Vec<Center> {
        Center::ALL
            .iter()
            .copied()
            .filter(|c| !self.is_defined(*c))
            .collect()
    }
}

/// Connected-group id of every defined center.
fn components(centers: &BTreeSet<Center>, edges: &[(Center, Center)]) -> BTreeMap<Center, usize> {
    let mut group: BTreeMap<Center, usize> = BTreeMap::new();
    let mut next = 0;
    for &start in centers {
        if group.contains_key(&start) {
            continue;
        }
        let mut stack = vec![start];
        while let Some(c) = stack.pop() {
            if group.insert(c, next).is_some() {
                continue;
            }
            for &(a, b) in edges {
                if a == c && !group.contains_key(&b) {
                    stack.push(b);
                } else if b == c && !group.contains_key(&a) {
                    stack.push(a);
                }
            }
        }
        next += 1;
    }
    group
}

fn derive_type(defined: &BTreeSet<Center>, motor_to_throat: bool) -> HdType {
    let sacral = defined.contains(&Center::Sacral);
    match (defined.is_empty(), sacral, motor_to_throat) {
        (true, _, _) => HdType::Reflector,
        (false, true, true) => HdType::ManifestingGenerator,
        (false, true, false) => HdType::Generator,
        (false, false, true) => HdType::Manifestor,
        (false, false, false) => HdType::Projector,
    }
}

fn derive_authority(defined: &BTreeSet<Center>, hd_type: HdType) -> Authority {
    if defined.contains(&Center::SolarPlexus) {
        Authority::Emotional
    } else if defined.contains(&Center::Sacral) {
        Authority::Sacral
    } else if defined.contains(&Center::Spleen) {
        Authority::Splenic
    } else if defined.contains(&Center::Heart) {
        Authority::Ego
    } else if defined.contains(&Center::G) {
        Authority::SelfProjected
    } else if hd_type == HdType::Reflector {
        Authority::Lunar
    } else {
        Authority::Mental
    }
}
