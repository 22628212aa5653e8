use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urania::ephemeris::{
    ApproximateEphemeris, CelestialBody, EphemerisProvider, EphemerisSettings, GeoLocation,
    HouseSystem,
};

const JD: f64 = 2_460_390.0;

fn bench_calc_positions(c: &mut Criterion) {
    let eph = ApproximateEphemeris::new();
    let settings = EphemerisSettings::default();
    let location = GeoLocation {
        lat: 40.7128,
        lon: -74.0060,
    };

    c.bench_function("approximate_calc_positions", |b| {
        b.iter(|| {
            eph.calc_positions(black_box(JD), black_box(Some(&location)), black_box(&settings))
        })
    });
}

fn bench_moon_position(c: &mut Criterion) {
    let eph = ApproximateEphemeris::new();

    c.bench_function("approximate_moon", |b| {
        b.iter(|| eph.position(black_box(JD), CelestialBody::Moon))
    });
}

fn bench_placidus_houses(c: &mut Criterion) {
    let eph = ApproximateEphemeris::new();
    let location = GeoLocation {
        lat: 51.5074,
        lon: -0.1278,
    };

    c.bench_function("approximate_placidus", |b| {
        b.iter(|| eph.houses(black_box(JD), black_box(&location), HouseSystem::Placidus))
    });
}

criterion_group!(benches, bench_calc_positions, bench_moon_position, bench_placidus_houses);
criterion_main!(benches);
