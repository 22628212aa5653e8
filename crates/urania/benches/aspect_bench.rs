use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urania::aspects::{match_aspect, AspectCalculator, AspectSettings, OrbTable};
use urania::ephemeris::{BodyPositions, CelestialBody, EclipticPosition};

fn bench_match_aspect(c: &mut Criterion) {
    let orbs = OrbTable::default();

    c.bench_function("match_aspect", |b| {
        b.iter(|| match_aspect(black_box(100.0), black_box(222.5), black_box(&orbs), false))
    });
}

fn bench_calculate_aspect(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| {
            calculator.calculate_aspect(
                black_box(100.0),
                black_box(102.0),
                black_box(1.0),
                black_box(1.0),
                black_box(&settings),
            )
        })
    });
}

fn bench_compute_intra_layer_aspects(c: &mut Criterion) {
    let calculator = AspectCalculator::new();

    let mut positions = BodyPositions::new();
    for (i, body) in CelestialBody::ALL.iter().enumerate() {
        positions.insert(
            *body,
            EclipticPosition {
                longitude: (i as f64) * 29.0,
                latitude: 0.0,
                distance: 1.0,
                speed: 1.0,
            },
        );
    }

    let settings = AspectSettings::default();

    c.bench_function("compute_intra_layer_aspects", |b| {
        b.iter(|| {
            calculator.compute_intra_layer_aspects(
                black_box("natal"),
                black_box(&positions),
                black_box(&settings),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_match_aspect,
    bench_calculate_aspect,
    bench_compute_intra_layer_aspects
);
criterion_main!(benches);
