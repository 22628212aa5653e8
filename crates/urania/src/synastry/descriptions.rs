//! Short text for synastry contacts.

use crate::aspects::AspectKind;
use crate::ephemeris::CelestialBody;

pub fn body_keyword(body: CelestialBody) -> &'static str {
    match body {
        CelestialBody::Sun => "identity",
        CelestialBody::Moon => "emotions",
        CelestialBody::Mercury => "communication",
        CelestialBody::Venus => "affection",
        CelestialBody::Mars => "desire",
        CelestialBody::Jupiter => "growth",
        CelestialBody::Saturn => "commitment",
        CelestialBody::Uranus => "independence",
        CelestialBody::Neptune => "idealism",
        CelestialBody::Pluto => "transformation",
        CelestialBody::NorthNode => "shared purpose",
        CelestialBody::SouthNode => "familiar patterns",
        CelestialBody::Chiron => "healing",
    }
}

fn aspect_verb(kind: AspectKind) -> &'static str {
    match kind {
        AspectKind::Conjunction => "merges with",
        AspectKind::Opposition => "mirrors",
        AspectKind::Trine => "flows easily with",
        AspectKind::Square => "challenges",
        AspectKind::Sextile => "supports",
        AspectKind::Quincunx => "needs adjustment with",
        AspectKind::Semisextile => "gently touches",
    }
}

fn house_theme(house: u8) -> &'static str {
    match house {
        1 => "self-image",
        2 => "values and resources",
        3 => "everyday communication",
        4 => "home and family",
        5 => "romance and play",
        6 => "daily routine",
        7 => "partnership",
        8 => "intimacy and shared resources",
        9 => "beliefs and travel",
        10 => "career and status",
        11 => "friendship and hopes",
        _ => "the hidden and unconscious",
    }
}

fn tone(harmony: f64) -> &'static str {
    if harmony >= 0.3 {
        "harmonious"
    } else if harmony <= -0.3 {
        "challenging"
    } else {
        "mixed"
    }
}

pub fn describe_aspect(
    a: CelestialBody,
    b: CelestialBody,
    kind: AspectKind,
    harmony: f64,
) -> String {
    format!(
        "{} ({}) {} {} ({}): {}",
        a,
        body_keyword(a),
        aspect_verb(kind),
        b,
        body_keyword(b),
        tone(harmony)
    )
}

pub fn describe_house(body: CelestialBody, house: u8, harmony: f64) -> String {
    format!(
        "{} ({}) falls in the partner's house {} of {}: {}",
        body,
        body_keyword(body),
        house,
        house_theme(house),
        tone(harmony)
    )
}
