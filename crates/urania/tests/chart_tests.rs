use chrono::{Datelike, Timelike};
use std::sync::Arc;
use urania::chart::{house_for_longitude, ChartCalculator, ChartSettings};
use urania::ephemeris::{ApproximateEphemeris, CelestialBody, EphemerisSettings, HouseSystem};
use urania::western::{Element, ZodiacSign};
use urania::{BirthData, UraniaError};

fn birth() -> BirthData {
    BirthData {
        year: 1990,
        month: 5,
        day: 15,
        hour: 14,
        minute: 30,
        second: 0,
        latitude: 55.7558,
        longitude: 37.6173,
        timezone: 3.0,
    }
}

fn calculator(settings: ChartSettings) -> ChartCalculator {
    ChartCalculator::new(Arc::new(ApproximateEphemeris::new()), settings)
}

#[test]
fn test_natal_chart_basics() {
    let chart = calculator(ChartSettings::default()).calculate(&birth()).unwrap();

    assert_eq!(chart.source, "approximate");
    assert_eq!(chart.houses.len(), 12);
    assert_eq!(chart.house_system, HouseSystem::Placidus);
    assert_eq!(chart.datetime_utc.hour(), 11);

    // Sun in Taurus in mid-May
    let sun = chart.planet(CelestialBody::Sun).unwrap();
    assert_eq!(sun.sign, ZodiacSign::Taurus);
    assert!((0.0..30.0).contains(&sun.degree));
    assert!(chart.planet(CelestialBody::Chiron).is_none());

    for p in &chart.planets {
        assert!((1..=12).contains(&p.house), "{} in house {}", p.body, p.house);
        assert_eq!(p.house, chart.house_of(p.longitude));
        assert_eq!(p.sign, ZodiacSign::from_longitude(p.longitude));
    }
    assert!((chart.houses[0].longitude - chart.ascendant).abs() < 1e-9);
    assert!((chart.houses[9].longitude - chart.midheaven).abs() < 1e-9);
}

#[test]
fn test_timezone_moves_the_date() {
    let data = BirthData {
        year: 2000,
        month: 1,
        day: 1,
        hour: 2,
        minute: 0,
        timezone: 5.5,
        ..birth()
    };
    let utc = data.to_utc().unwrap();
    assert_eq!((utc.year(), utc.month(), utc.day()), (1999, 12, 31));
    assert_eq!((utc.hour(), utc.minute()), (20, 30));
}

#[test]
fn test_invalid_birth_data_is_rejected() {
    let data = BirthData {
        month: 13,
        ..birth()
    };
    let err = calculator(ChartSettings::default()).calculate(&data).unwrap_err();
    assert!(matches!(err, UraniaError::InvalidBirthData { field: "month", .. }));

    let data = BirthData {
        latitude: 91.0,
        ..birth()
    };
    assert!(data.validate().is_err());
}

#[test]
fn test_house_system_choice() {
    let settings = ChartSettings {
        ephemeris: EphemerisSettings {
            house_system: HouseSystem::Equal,
            ..EphemerisSettings::default()
        },
        ..ChartSettings::default()
    };
    let chart = calculator(settings).calculate(&birth()).unwrap();
    assert_eq!(chart.house_system, HouseSystem::Equal);
    let cusps = chart.cusps();
    for i in 0..12 {
        let step = (cusps[(i + 1) % 12] - cusps[i]).rem_euclid(360.0);
        assert!((step - 30.0).abs() < 1e-9);
    }
}

#[test]
fn test_polar_birth_uses_porphyry() {
    let data = BirthData {
        latitude: 69.65,
        longitude: 18.96,
        timezone: 1.0,
        ..birth()
    };
    let chart = calculator(ChartSettings::default()).calculate(&data).unwrap();
    assert_eq!(chart.house_system, HouseSystem::Porphyry);
}

#[test]
fn test_chart_summaries() {
    let chart = calculator(ChartSettings::default()).calculate(&birth()).unwrap();
    let elements = chart.element_balance();
    assert_eq!(elements.values().sum::<usize>(), 10);
    assert!(elements.contains_key(&Element::Water));
    assert_eq!(chart.modality_balance().values().sum::<usize>(), 10);
    assert_eq!(chart.decans().len(), chart.planets.len());
    assert_eq!(chart.chart_ruler(), urania::western::sign_ruler(chart.ascendant_sign(), false));
}

#[test]
fn test_node_axis_has_no_aspect() {
    let chart = calculator(ChartSettings::default()).calculate(&birth()).unwrap();
    assert!(!chart.aspects.iter().any(|a| {
        matches!(
            (a.from.body, a.to.body),
            (CelestialBody::NorthNode, CelestialBody::SouthNode)
                | (CelestialBody::SouthNode, CelestialBody::NorthNode)
        )
    }));
}

#[test]
fn test_house_for_longitude_wraparound() {
    let cusps = [
        350.0, 20.0, 50.0, 80.0, 110.0, 140.0, 170.0, 200.0, 230.0, 260.0, 290.0, 320.0,
    ];
    assert_eq!(house_for_longitude(355.0, &cusps), 1);
    assert_eq!(house_for_longitude(5.0, &cusps), 1);
    assert_eq!(house_for_longitude(20.0, &cusps), 2);
    assert_eq!(house_for_longitude(349.9, &cusps), 12);
}

#[test]
fn test_chart_serializes_to_json() {
    let chart = calculator(ChartSettings::default()).calculate(&birth()).unwrap();
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["source"], "approximate");
    assert_eq!(json["planets"][0]["name"], "sun");
    assert_eq!(json["house_system"], "placidus");
}
