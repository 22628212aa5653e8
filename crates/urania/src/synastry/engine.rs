use crate::aspects::{AspectCalculator, AspectKind};
use crate::chart::NatalChart;
use crate::ephemeris::CelestialBody;
use crate::synastry::descriptions::{describe_aspect, describe_house};
use crate::synastry::types::{
    CompatibilityScore, ElementContact, Partner, SynastryAspect, SynastryHouse, SynastryReport,
    SynastrySettings,
};
use crate::western::element_affinity;

const ASPECT_WEIGHT: f64 = 0.45;
const HOUSE_WEIGHT: f64 = 0.20;
const ELEMENT_WEIGHT: f64 = 0.20;
const LUMINARY_WEIGHT: f64 = 0.15;

/// Placements compared for element compatibility, as (chart A body, chart B body).
const ELEMENT_PAIRS: [(CelestialBody, CelestialBody); 4] = [
    (CelestialBody::Sun, CelestialBody::Sun),
    (CelestialBody::Moon, CelestialBody::Moon),
    (CelestialBody::Venus, CelestialBody::Mars),
    (CelestialBody::Mars, CelestialBody::Venus),
];

/// Bodies whose contacts read as friction.
pub fn is_challenging(body: CelestialBody) -> bool {
    matches!(
        body,
        CelestialBody::Mars | CelestialBody::Saturn | CelestialBody::Uranus | CelestialBody::Pluto
    )
}

/// Relative importance of a body in relationship scoring.
pub fn body_weight(body: CelestialBody) -> f64 {
    match body {
        CelestialBody::Sun
        | CelestialBody::Moon
        | CelestialBody::Mercury
        | CelestialBody::Venus
        | CelestialBody::Mars => 1.0,
        CelestialBody::Jupiter | CelestialBody::Saturn => 0.7,
        _ => 0.4,
    }
}

/// Harmony of an inter-chart aspect in [-1, 1], softened as the orb widens.
pub fn aspect_harmony(
    kind: AspectKind,
    a: CelestialBody,
    b: CelestialBody,
    orb: f64,
    max_orb: f64,
) -> f64 {
    let base: f64 = match kind {
        AspectKind::Trine => 0.8,
        AspectKind::Sextile => 0.6,
        AspectKind::Semisextile => 0.1,
        AspectKind::Quincunx => -0.3,
        AspectKind::Opposition => -0.5,
        AspectKind::Square => -0.7,
        AspectKind::Conjunction => match (is_challenging(a), is_challenging(b)) {
            (true, true) => -0.4,
            (false, false) => 0.6,
            _ => 0.0,
        },
    };
    let tightness = if max_orb > 0.0 {
        1.0 - 0.5 * (orb / max_orb).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (base * tightness).clamp(-1.0, 1.0)
}

/// Harmony of a body falling in a partner's house.
pub fn house_harmony(house: u8, body: CelestialBody) -> f64 {
    let base: f64 = match house {
        1 | 5 | 7 => 0.8,
        4 | 9 | 11 => 0.5,
        2 | 3 | 10 => 0.3,
        6 => 0.0,
        8 => -0.2,
        _ => -0.4,
    };
    let h = if is_challenging(body) { 0.5 * base - 0.2 } else { base };
    h.clamp(-1.0, 1.0)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Map a harmony in [-1, 1] to a 0-100 percentage.
fn percent(harmony: f64) -> f64 {
    (50.0 + 50.0 * harmony).clamp(0.0, 100.0)
}

/// Compares two natal charts.
#[derive(Debug, Clone, Default)]
pub struct SynastryEngine {
    settings: SynastrySettings,
}

impl SynastryEngine {
    pub fn new(settings: SynastrySettings) -> Self {
        Self { settings }
    }

    pub fn compare(&self, a: &NatalChart, b: &NatalChart) -> SynastryReport {
        let aspects = self.aspects(a, b);
        let mut houses = self.overlays(Partner::B, b, a);
        houses.extend(self.overlays(Partner::A, a, b));
        let elements = element_contacts(a, b);
        let score = score(&aspects, &houses, &elements);

        log::debug!(
            "synastry: {} aspects, {} overlays, overall {:.1}",
            aspects.len(),
            houses.len(),
            score.overall
        );

        SynastryReport {
            aspects,
            houses,
            elements,
            score,
        }
    }

    fn aspects(&self, a: &NatalChart, b: &NatalChart) -> Vec<SynastryAspect> {
        let set = AspectCalculator::new().compute_inter_layer_aspects(
            "a",
            "b",
            &a.body_positions(),
            &b.body_positions(),
            &self.settings.aspects,
        );
        set.pairs
            .into_iter()
            .map(|pair| {
                let (body_a, body_b) = (pair.from.body, pair.to.body);
                let core = pair.aspect;
                let harmony = aspect_harmony(core.kind, body_a, body_b, core.orb, core.max_orb);
                SynastryAspect {
                    body_a,
                    body_b,
                    kind: core.kind,
                    orb: core.orb,
                    strength: core.strength,
                    harmony,
                    description: describe_aspect(body_a, body_b, core.kind, harmony),
                }
            })
            .collect()
    }

    /// `guest`'s bodies placed in `host`'s houses.
    fn overlays(
        &self,
        owner: Partner,
        guest: &NatalChart,
        host: &NatalChart,
    ) -> Vec<SynastryHouse> {
        guest
            .planets
            .iter()
            .filter(|p| {
                self.settings.aspects.includes(p.body) && p.body != CelestialBody::SouthNode
            })
            .map(|p| {
                let house = host.house_of(p.longitude);
                let harmony = house_harmony(house, p.body);
                SynastryHouse {
                    body_owner: owner,
                    body: p.body,
                    house,
                    harmony,
                    description: describe_house(p.body, house, harmony),
                }
            })
            .collect()
    }
}

fn element_contacts(a: &NatalChart, b: &NatalChart) -> Vec<ElementContact> {
    ELEMENT_PAIRS
        .iter()
        .filter_map(|&(body_a, body_b)| {
            let element_a = a.planet(body_a)?.sign.element();
            let element_b = b.planet(body_b)?.sign.element();
            Some(ElementContact {
                body_a,
                body_b,
                element_a,
                element_b,
                harmony: element_affinity(element_a, element_b),
            })
        })
        .collect()
}

fn score(
    aspects: &[SynastryAspect],
    houses: &[SynastryHouse],
    elements: &[ElementContact],
) -> CompatibilityScore {
    let (weighted, total) = aspects.iter().fold((0.0, 0.0), |(s, w), asp| {
        let weight = body_weight(asp.body_a) * body_weight(asp.body_b);
        (s + weight * asp.harmony, w + weight)
    });
    let aspect_harmony = if total > 0.0 { weighted / total } else { 0.0 };
    let house_harmony = mean(houses.iter().map(|h| h.harmony)).unwrap_or(0.0);
    let element_harmony = mean(elements.iter().map(|e| e.harmony)).unwrap_or(0.0);
    let luminary_harmony = mean(
        aspects
            .iter()
            .filter(|a| a.body_a.is_luminary() && a.body_b.is_luminary())
            .map(|a| a.harmony),
    )
    .unwrap_or(0.0);

    let combined = ASPECT_WEIGHT * aspect_harmony
        + HOUSE_WEIGHT * house_harmony
        + ELEMENT_WEIGHT * element_harmony
        + LUMINARY_WEIGHT * luminary_harmony;

    let category = |bodies: &[CelestialBody]| {
        mean(
            aspects
                .iter()
                .filter(|a| bodies.iter().any(|b| a.involves(*b)))
                .map(|a| a.harmony),
        )
        .map(percent)
        .unwrap_or(50.0)
    };

    CompatibilityScore {
        overall: percent(combined),
        aspect_harmony,
        house_harmony,
        element_harmony,
        luminary_harmony,
        emotional: category(&[CelestialBody::Moon]),
        romantic: category(&[CelestialBody::Venus, CelestialBody::Mars]),
        communication: category(&[CelestialBody::Mercury]),
        stability: category(&[CelestialBody::Saturn]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::AspectStrength;
    use crate::western::Element;

    #[test]
    fn test_aspect_harmony_bounds() {
        for kind in AspectKind::ALL {
            for a in CelestialBody::ALL {
                for b in CelestialBody::ALL {
                    for orb in [0.0, 2.0, 8.0, 20.0] {
                        let h = aspect_harmony(kind, a, b, orb, 8.0);
                        assert!((-1.0..=1.0).contains(&h));
                    }
                }
            }
        }
    }

    #[test]
    fn test_conjunction_depends_on_bodies() {
        let sun = CelestialBody::Sun;
        let venus = CelestialBody::Venus;
        let mars = CelestialBody::Mars;
        let saturn = CelestialBody::Saturn;
        assert_eq!(aspect_harmony(AspectKind::Conjunction, sun, venus, 0.0, 8.0), 0.6);
        assert_eq!(aspect_harmony(AspectKind::Conjunction, sun, mars, 0.0, 8.0), 0.0);
        assert_eq!(aspect_harmony(AspectKind::Conjunction, mars, saturn, 0.0, 8.0), -0.4);
    }

    #[test]
    fn test_wide_orb_softens_harmony() {
        let (sun, moon) = (CelestialBody::Sun, CelestialBody::Moon);
        let tight = aspect_harmony(AspectKind::Trine, sun, moon, 0.0, 8.0);
        let wide = aspect_harmony(AspectKind::Trine, sun, moon, 8.0, 8.0);
        assert_eq!(tight, 0.8);
        assert!((wide - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_house_harmony_table() {
        assert_eq!(house_harmony(7, CelestialBody::Venus), 0.8);
        assert_eq!(house_harmony(12, CelestialBody::Moon), -0.4);
        assert!((house_harmony(7, CelestialBody::Saturn) - 0.2).abs() < 1e-12);
        assert!((house_harmony(12, CelestialBody::Pluto) + 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_comparison_is_neutral() {
        let s = score(&[], &[], &[]);
        assert_eq!(s.overall, 50.0);
        assert_eq!(s.emotional, 50.0);
        assert_eq!(s.stability, 50.0);
    }

    fn contact(
        a: CelestialBody,
        b: CelestialBody,
        kind: AspectKind,
        harmony: f64,
    ) -> SynastryAspect {
        SynastryAspect {
            body_a: a,
            body_b: b,
            kind,
            orb: 0.0,
            strength: AspectStrength::Exact,
            harmony,
            description: String::new(),
        }
    }

    fn overlay(body: CelestialBody, house: u8, harmony: f64) -> SynastryHouse {
        SynastryHouse {
            body_owner: Partner::B,
            body,
            house,
            harmony,
            description: String::new(),
        }
    }

    fn elements(a: Element, b: Element, harmony: f64) -> ElementContact {
        ElementContact {
            body_a: CelestialBody::Sun,
            body_b: CelestialBody::Sun,
            element_a: a,
            element_b: b,
            harmony,
        }
    }

    #[test]
    fn test_score_blends_weighted_components() {
        use CelestialBody::*;
        let aspects = [
            contact(Sun, Moon, AspectKind::Trine, 0.8),
            contact(Venus, Saturn, AspectKind::Square, -0.7),
            contact(Moon, Pluto, AspectKind::Opposition, -0.5),
        ];
        let houses = [overlay(Venus, 7, 0.8), overlay(Mars, 8, -0.2)];
        let contacts = [
            elements(Element::Fire, Element::Fire, 1.0),
            elements(Element::Fire, Element::Water, -0.6),
        ];

        let s = score(&aspects, &houses, &contacts);

        // weights 1.0, 0.7 and 0.4 from the body products
        let aspect = (0.8 - 0.7 * 0.7 - 0.4 * 0.5) / 2.1;
        assert!((s.aspect_harmony - aspect).abs() < 1e-12);
        assert!((s.house_harmony - 0.3).abs() < 1e-12);
        assert!((s.element_harmony - 0.2).abs() < 1e-12);
        assert!((s.luminary_harmony - 0.8).abs() < 1e-12);

        let combined = 0.45 * aspect + 0.20 * 0.3 + 0.20 * 0.2 + 0.15 * 0.8;
        assert!((s.overall - (50.0 + 50.0 * combined)).abs() < 1e-9);
        assert!((s.overall - 62.178_571_428_6).abs() < 1e-6);

        assert!((s.emotional - 57.5).abs() < 1e-9);
        assert!((s.romantic - 15.0).abs() < 1e-9);
        assert!((s.stability - 15.0).abs() < 1e-9);
        assert_eq!(s.communication, 50.0);
    }
}
