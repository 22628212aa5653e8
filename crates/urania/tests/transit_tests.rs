use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use urania::aspects::{AspectSettings, AspectStrength, OrbTable};
use urania::chart::{ChartCalculator, ChartSettings};
use urania::ephemeris::{ApproximateEphemeris, CelestialBody, EphemerisProvider};
use urania::transits::{StationKind, TransitSettings, TransitsCalculator};
use urania::western::ZodiacSign;
use urania::{BirthData, NatalChart};

fn provider() -> Arc<dyn EphemerisProvider> {
    Arc::new(ApproximateEphemeris::new())
}

fn natal() -> NatalChart {
    let birth = BirthData {
        year: 1985,
        month: 10,
        day: 26,
        hour: 8,
        minute: 15,
        second: 0,
        latitude: 40.7128,
        longitude: -74.006,
        timezone: -4.0,
    };
    ChartCalculator::new(provider(), ChartSettings::default())
        .calculate(&birth)
        .unwrap()
}

fn only(bodies: &[CelestialBody]) -> TransitSettings {
    TransitSettings {
        bodies: bodies.to_vec(),
        ..TransitSettings::default()
    }
}

#[test]
fn test_current_transits_report() {
    let calc = TransitsCalculator::new(provider(), TransitSettings::default());
    let natal = natal();
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let report = calc.calculate(&natal, at).unwrap();

    assert_eq!(report.source, "approximate");
    assert!(!report.positions.is_empty());
    for pos in &report.positions {
        assert!((1..=12).contains(&pos.natal_house));
    }
    // strongest first, then tightest
    for pair in report.aspects.windows(2) {
        assert!(
            pair[0].strength < pair[1].strength
                || (pair[0].strength == pair[1].strength && pair[0].orb <= pair[1].orb)
        );
    }
    for aspect in &report.aspects {
        assert!(aspect.orb <= OrbTable::default().get(aspect.kind) + 1e-9);
    }
}

#[test]
fn test_tighter_transit_orbs_find_fewer_aspects() {
    let natal = natal();
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let wide = TransitsCalculator::new(provider(), TransitSettings::default())
        .calculate(&natal, at)
        .unwrap();
    let tight_settings = TransitSettings {
        aspects: AspectSettings::with_orbs(OrbTable::default().scaled(0.25)),
        ..TransitSettings::default()
    };
    let tight = TransitsCalculator::new(provider(), tight_settings)
        .calculate(&natal, at)
        .unwrap();
    assert!(tight.aspects.len() <= wide.aspects.len());
}

#[test]
fn test_sun_ingress_into_aries_2024() {
    let calc = TransitsCalculator::new(provider(), only(&[CelestialBody::Sun]));
    let start = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap();
    let ingresses = calc.find_ingresses(start, end).unwrap();

    assert_eq!(ingresses.len(), 1);
    let ingress = &ingresses[0];
    assert_eq!(ingress.from, ZodiacSign::Pisces);
    assert_eq!(ingress.to, ZodiacSign::Aries);
    assert!(!ingress.retrograde);
    let equinox = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
    assert!((ingress.at - equinox).num_hours().abs() <= 6, "ingress at {}", ingress.at);
}

#[test]
fn test_moon_ingresses_every_few_days() {
    let calc = TransitsCalculator::new(provider(), only(&[CelestialBody::Moon]));
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let ingresses = calc.find_ingresses(start, start + Duration::days(28)).unwrap();
    assert!((11..=14).contains(&ingresses.len()), "{} ingresses", ingresses.len());
    for pair in ingresses.windows(2) {
        assert!(pair[0].at < pair[1].at);
        assert_eq!(pair[0].to, pair[1].from);
    }
}

#[test]
fn test_mars_stations_retrograde_december_2024() {
    let calc = TransitsCalculator::new(provider(), only(&[CelestialBody::Mars]));
    let start = Utc.with_ymd_and_hms(2024, 11, 15, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
    let stations = calc.find_stations(start, end).unwrap();

    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].kind, StationKind::Retrograde);
    let expected = Utc.with_ymd_and_hms(2024, 12, 6, 23, 0, 0).unwrap();
    assert!((stations[0].at - expected).num_days().abs() <= 3, "station at {}", stations[0].at);
    assert_eq!(ZodiacSign::from_longitude(stations[0].longitude), ZodiacSign::Leo);
}

#[test]
fn test_luminaries_never_station() {
    let settings = only(&[CelestialBody::Sun, CelestialBody::Moon]);
    let calc = TransitsCalculator::new(provider(), settings);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let stations = calc.find_stations(start, start + Duration::days(60)).unwrap();
    assert!(stations.is_empty());
}

#[test]
fn test_forecast_windows() {
    let calc = TransitsCalculator::new(provider(), TransitSettings::default());
    let natal = natal();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let events = calc.forecast(&natal, start, 30).unwrap();

    assert!(!events.is_empty());
    for event in &events {
        assert_ne!(event.transiting, CelestialBody::Moon);
        assert!(event.start <= event.exact && event.exact <= event.end);
        assert!(event.start >= start && event.end <= start + Duration::days(30));
        assert!(event.min_orb <= OrbTable::default().get(event.kind) + 1e-9);
        assert_eq!(
            event.strength,
            AspectStrength::from_orb(event.min_orb, OrbTable::default().get(event.kind))
        );
    }
    for pair in events.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
}
