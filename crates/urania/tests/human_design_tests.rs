use std::sync::Arc;
use urania::ephemeris::ApproximateEphemeris;
use urania::human_design::{
    activation_for_longitude, center_of_gate, Activator, BodyGraph, Center, HdType,
    HumanDesignCalculator, CHANNELS,
};
use urania::BirthData;

fn birth() -> BirthData {
    BirthData {
        year: 1992,
        month: 7,
        day: 4,
        hour: 6,
        minute: 45,
        second: 0,
        latitude: 52.52,
        longitude: 13.405,
        timezone: 2.0,
    }
}

#[test]
fn test_gate_wheel_reference_points() {
    let start = activation_for_longitude(302.0);
    assert_eq!((start.gate, start.line), (41, 1));
    assert_eq!(activation_for_longitude(0.0).gate, 25);
    assert_eq!(activation_for_longitude(-58.0).gate, 41);
}

#[test]
fn test_chart_structure() {
    let calc = HumanDesignCalculator::new(Arc::new(ApproximateEphemeris::new()));
    let chart = calc.calculate(&birth()).unwrap();

    assert_eq!(chart.personality.len(), 13);
    assert_eq!(chart.design.len(), 13);
    assert_eq!(chart.source, "approximate");

    let days = (chart.personality_time - chart.design_time).num_days();
    assert!((85..=95).contains(&days), "design {} days before birth", days);

    let p_sun = chart.personality[&Activator::Sun];
    let d_sun = chart.design[&Activator::Sun];
    assert_eq!(chart.profile, format!("{}/{}", p_sun.line, d_sun.line));
    assert_eq!(chart.incarnation_cross[0], p_sun.gate);
    assert_eq!(chart.incarnation_cross[2], d_sun.gate);
    assert_eq!(chart.incarnation_cross[1], chart.personality[&Activator::Earth].gate);
}

#[test]
fn test_defined_centers_come_from_channels() {
    let calc = HumanDesignCalculator::new(Arc::new(ApproximateEphemeris::new()));
    let chart = calc.calculate(&birth()).unwrap();
    let graph = &chart.bodygraph;

    for &(a, b) in &graph.channels {
        assert!(CHANNELS.contains(&(a, b)));
        assert!(graph.gates.contains(&a) && graph.gates.contains(&b));
        assert!(graph.is_defined(center_of_gate(a).unwrap()));
        assert!(graph.is_defined(center_of_gate(b).unwrap()));
    }
    assert_eq!(graph.defined_centers.len() + graph.open_centers().len(), 9);

    let expected = BodyGraph::from_gates(graph.gates.iter().copied());
    assert_eq!(&expected, graph);
    assert_eq!(chart.strategy(), chart.hd_type().strategy());
}

#[test]
fn test_type_rules() {
    assert_eq!(BodyGraph::from_gates(Vec::new()).hd_type, HdType::Reflector);
    // 3-60 Sacral to Root, 10-20 G to Throat: no motor reaches the Throat
    let generator = BodyGraph::from_gates([3, 60, 10, 20]);
    assert_eq!(generator.hd_type, HdType::Generator);
    // 12-22 Throat to Solar Plexus
    let manifestor = BodyGraph::from_gates([12, 22]);
    assert_eq!(manifestor.hd_type, HdType::Manifestor);
    assert!(manifestor.is_defined(Center::SolarPlexus));
}

#[test]
fn test_invalid_birth_is_rejected() {
    let calc = HumanDesignCalculator::new(Arc::new(ApproximateEphemeris::new()));
    let bad = BirthData { day: 31, month: 6, ..birth() };
    assert!(calc.calculate(&bad).is_err());
}
