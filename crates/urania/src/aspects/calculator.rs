use crate::aspects::types::{
    AspectCore, AspectKind, AspectObjectRef, AspectPair, AspectSet, AspectSetKind,
    AspectSettings, AspectStrength, OrbTable,
};
use crate::ephemeris::{BodyPositions, CelestialBody};
use crate::time::signed_difference;

/// Orb below which an aspect is flagged exact, in degrees.
const EXACT_ORB: f64 = 0.1;

/// Absolute circular difference between two longitudes, in [0, 180].
pub fn angular_distance(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = (lon1 - lon2).rem_euclid(360.0);
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// First aspect in table order whose orb contains the separation of two longitudes.
///
/// Returns the kind and the deviation from exact.
pub fn match_aspect(
    lon1: f64,
    lon2: f64,
    orbs: &OrbTable,
    only_major: bool,
) -> Option<(AspectKind, f64)> {
    let angle_diff = angular_distance(lon1, lon2);
    AspectKind::ALL
        .iter()
        .filter(|kind| !only_major || kind.is_major())
        .find_map(|&kind| {
            let orb_value = (angle_diff - kind.angle()).abs();
            (orb_value <= orbs.get(kind)).then_some((kind, orb_value))
        })
}

/// Aspect calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectCalculator;

impl AspectCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute aspects between all pairs of bodies in one layer
    pub fn compute_intra_layer_aspects(
        &self,
        layer_id: &str,
        positions: &BodyPositions,
        settings: &AspectSettings,
    ) -> AspectSet {
        let bodies: Vec<CelestialBody> = positions
            .keys()
            .copied()
            .filter(|b| settings.includes(*b))
            .collect();

        let mut pairs = Vec::new();
        for (i, &b1) in bodies.iter().enumerate() {
            for &b2 in &bodies[i + 1..] {
                if is_node_axis(b1, b2) {
                    continue;
                }
                let p1 = &positions[&b1];
                let p2 = &positions[&b2];
                if let Some(aspect) =
                    self.calculate_aspect(p1.longitude, p2.longitude, p1.speed, p2.speed, settings)
                {
                    pairs.push(AspectPair {
                        from: object_ref(layer_id, b1),
                        to: object_ref(layer_id, b2),
                        aspect,
                    });
                }
            }
        }

        AspectSet {
            id: layer_id.to_string(),
            label: format!("{} Aspects", capitalize_first(layer_id)),
            kind: AspectSetKind::IntraLayer,
            layer_ids: vec![layer_id.to_string()],
            pairs,
        }
    }

    /// Compute aspects from every body of layer A to every body of layer B.
    /// Same-body pairs are kept: a transit to its own natal place is a return.
    pub fn compute_inter_layer_aspects(
        &self,
        layer_id_a: &str,
        layer_id_b: &str,
        positions_a: &BodyPositions,
        positions_b: &BodyPositions,
        settings: &AspectSettings,
    ) -> AspectSet {
        let mut pairs = Vec::new();
        for (&b1, p1) in positions_a.iter().filter(|(b, _)| settings.includes(**b)) {
            for (&b2, p2) in positions_b.iter().filter(|(b, _)| settings.includes(**b)) {
                if let Some(aspect) =
                    self.calculate_aspect(p1.longitude, p2.longitude, p1.speed, p2.speed, settings)
                {
                    pairs.push(AspectPair {
                        from: object_ref(layer_id_a, b1),
                        to: object_ref(layer_id_b, b2),
                        aspect,
                    });
                }
            }
        }

        AspectSet {
            id: format!("{}:{}", layer_id_a, layer_id_b),
            label: format!(
                "{} / {} Aspects",
                capitalize_first(layer_id_a),
                capitalize_first(layer_id_b)
            ),
            kind: AspectSetKind::InterLayer,
            layer_ids: vec![layer_id_a.to_string(), layer_id_b.to_string()],
            pairs,
        }
    }

    /// Calculate aspect between two longitudes using their speeds
    pub fn calculate_aspect(
        &self,
        lon1: f64,
        lon2: f64,
        speed1: f64,
        speed2: f64,
        settings: &AspectSettings,
    ) -> Option<AspectCore> {
        let (kind, orb_value) = match_aspect(lon1, lon2, &settings.orbs, settings.only_major)?;
        let max_orb = settings.orbs.get(kind);

        Some(AspectCore {
            kind,
            exact_angle: kind.angle(),
            orb: orb_value,
            max_orb,
            strength: AspectStrength::from_orb(orb_value, max_orb),
            is_applying: is_aspect_applying(lon1, lon2, speed1, speed2, kind.angle()),
            is_exact: orb_value < EXACT_ORB,
            is_retrograde: speed1 < 0.0 || speed2 < 0.0,
        })
    }
}

/// Whether the separation moves toward the exact angle over the next tenth of a day.
pub fn is_aspect_applying(
    lon1: f64,
    lon2: f64,
    speed1: f64,
    speed2: f64,
    aspect_angle: f64,
) -> bool {
    let relative_speed = speed1 - speed2;
    let signed_diff = signed_difference(lon1, lon2);
    let current_distance = (signed_diff.abs() - aspect_angle).abs();

    if relative_speed.abs() < 0.01 {
        // Motion too slow to call; treat near-exact as applying
        return current_distance < 0.5;
    }

    let time_step = 0.1;
    let future_signed_diff = signed_difference(signed_diff + relative_speed * time_step, 0.0);
    let future_distance = (future_signed_diff.abs() - aspect_angle).abs();

    future_distance < current_distance
}

fn is_node_axis(a: CelestialBody, b: CelestialBody) -> bool {
    matches!(
        (a, b),
        (CelestialBody::NorthNode, CelestialBody::SouthNode)
            | (CelestialBody::SouthNode, CelestialBody::NorthNode)
    )
}

fn object_ref(layer_id: &str, body: CelestialBody) -> AspectObjectRef {
    AspectObjectRef {
        layer_id: layer_id.to_string(),
        body,
    }
}

/// Capitalize first letter of a string
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
