use std::sync::Arc;
use urania::aspects::AspectKind;
use urania::chart::{ChartCalculator, ChartSettings};
use urania::ephemeris::{ApproximateEphemeris, CelestialBody};
use urania::synastry::{Partner, SynastryEngine};
use urania::{BirthData, NatalChart};

fn chart(year: i32, month: u32, day: u32, hour: u32, lat: f64, lon: f64, tz: f64) -> NatalChart {
    let birth = BirthData {
        year,
        month,
        day,
        hour,
        minute: 0,
        second: 0,
        latitude: lat,
        longitude: lon,
        timezone: tz,
    };
    ChartCalculator::new(Arc::new(ApproximateEphemeris::new()), ChartSettings::default())
        .calculate(&birth)
        .unwrap()
}

fn pair() -> (NatalChart, NatalChart) {
    (
        chart(1988, 3, 12, 9, 59.93, 30.36, 3.0),
        chart(1991, 8, 27, 22, 48.14, 11.58, 2.0),
    )
}

#[test]
fn test_scores_are_bounded() {
    let (a, b) = pair();
    let report = SynastryEngine::default().compare(&a, &b);
    let s = &report.score;
    for value in [s.overall, s.emotional, s.romantic, s.communication, s.stability] {
        assert!((0.0..=100.0).contains(&value), "score {}", value);
    }
    for h in [s.aspect_harmony, s.house_harmony, s.element_harmony, s.luminary_harmony] {
        assert!((-1.0..=1.0).contains(&h));
    }
    for aspect in &report.aspects {
        assert!((-1.0..=1.0).contains(&aspect.harmony));
        assert!(!aspect.description.is_empty());
    }
    for overlay in &report.houses {
        assert!((1..=12).contains(&overlay.house));
        assert!((-1.0..=1.0).contains(&overlay.harmony));
    }
}

#[test]
fn test_overlays_run_both_ways() {
    let (a, b) = pair();
    let report = SynastryEngine::default().compare(&a, &b);
    let from_a = report.houses.iter().filter(|h| h.body_owner == Partner::A).count();
    let from_b = report.houses.iter().filter(|h| h.body_owner == Partner::B).count();
    assert_eq!(from_a, from_b);
    assert!(from_a > 0);
    assert!(!report.houses.iter().any(|h| h.body == CelestialBody::SouthNode));

    let venus_b = report
        .houses
        .iter()
        .find(|h| h.body_owner == Partner::B && h.body == CelestialBody::Venus)
        .unwrap();
    assert_eq!(venus_b.house, a.house_of(b.planet(CelestialBody::Venus).unwrap().longitude));
}

#[test]
fn test_self_comparison_is_full_of_conjunctions() {
    let (a, _) = pair();
    let report = SynastryEngine::default().compare(&a, &a);
    let sun_sun = report
        .aspects
        .iter()
        .find(|x| x.body_a == CelestialBody::Sun && x.body_b == CelestialBody::Sun)
        .unwrap();
    assert_eq!(sun_sun.kind, AspectKind::Conjunction);
    assert!(sun_sun.orb.abs() < 1e-9);
    assert!((sun_sun.harmony - 0.6).abs() < 1e-9);

    let same_placements_agree = report
        .elements
        .iter()
        .filter(|e| e.body_a == e.body_b)
        .all(|e| e.harmony == 1.0);
    assert!(same_placements_agree);
}

#[test]
fn test_comparison_is_deterministic() {
    let (a, b) = pair();
    let engine = SynastryEngine::default();
    let first = engine.compare(&a, &b);
    let second = engine.compare(&a, &b);
    assert_eq!(first.score, second.score);
    assert_eq!(first.aspects, second.aspects);
}

#[test]
fn test_report_serializes() {
    let (a, b) = pair();
    let report = SynastryEngine::default().compare(&a, &b);
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["score"]["overall"].is_number());
    assert!(json["aspects"].is_array());
}
