//! Deterministic analytic ephemeris used when Swiss Ephemeris data is unavailable.
//!
//! Planets come from Keplerian mean elements (J2000 ecliptic, valid roughly
//! 1800-2050), precessed to the equinox of date. The Moon uses the principal
//! periodic terms of the lunar theory and the node is the mean node. Accuracy
//! is a few arcminutes for the planets and about a tenth of a degree for the
//! Moon, which is enough for sign, house and aspect work.

use crate::ephemeris::adapter::EphemerisError;
use crate::ephemeris::provider::EphemerisProvider;
use crate::ephemeris::types::{
    CelestialBody, EclipticPosition, GeoLocation, HousePositions, HouseSystem,
};
use crate::time::{julian_centuries, normalize_degrees, signed_difference, J2000};

const AU_KM: f64 = 149_597_870.7;
/// General precession in longitude, degrees per Julian century.
const PRECESSION_RATE: f64 = 1.396_971;
/// Half-width of the central difference used for speeds, in days.
const SPEED_STEP: f64 = 0.5;
const PLACIDUS_BISECTIONS: usize = 60;

/// Keplerian elements and their rates per Julian century.
struct OrbitalElements {
    a: [f64; 2],
    e: [f64; 2],
    i: [f64; 2],
    l: [f64; 2],
    peri: [f64; 2],
    node: [f64; 2],
}

const MERCURY: OrbitalElements = OrbitalElements {
    a: [0.387_099_27, 0.000_000_37],
    e: [0.205_635_93, 0.000_019_06],
    i: [7.004_979_02, -0.005_947_49],
    l: [252.250_323_50, 149_472.674_111_75],
    peri: [77.457_796_28, 0.160_476_89],
    node: [48.330_765_93, -0.125_340_81],
};

const VENUS: OrbitalElements = OrbitalElements {
    a: [0.723_335_66, 0.000_003_90],
    e: [0.006_776_72, -0.000_041_07],
    i: [3.394_676_05, -0.000_788_90],
    l: [181.979_099_50, 58_517.815_387_29],
    peri: [131.602_467_18, 0.002_683_29],
    node: [76.679_842_55, -0.277_694_18],
};

const EARTH_MOON: OrbitalElements = OrbitalElements {
    a: [1.000_002_61, 0.000_005_62],
    e: [0.016_711_23, -0.000_043_92],
    i: [-0.000_015_31, -0.012_946_68],
    l: [100.464_571_66, 35_999.372_449_81],
    peri: [102.937_681_93, 0.323_273_64],
    node: [0.0, 0.0],
};

const MARS: OrbitalElements = OrbitalElements {
    a: [1.523_710_34, 0.000_018_47],
    e: [0.093_394_10, 0.000_078_82],
    i: [1.849_691_42, -0.008_131_31],
    l: [-4.553_432_05, 19_140.302_684_99],
    peri: [-23.943_629_59, 0.444_410_88],
    node: [49.559_538_91, -0.292_573_43],
};

const JUPITER: OrbitalElements = OrbitalElements {
    a: [5.202_887_00, -0.000_116_07],
    e: [0.048_386_24, -0.000_132_53],
    i: [1.304_396_95, -0.001_837_14],
    l: [34.396_440_51, 3_034.746_127_75],
    peri: [14.728_479_83, 0.212_526_68],
    node: [100.473_909_09, 0.204_691_06],
};

const SATURN: OrbitalElements = OrbitalElements {
    a: [9.536_675_94, -0.001_250_60],
    e: [0.053_861_79, -0.000_509_91],
    i: [2.485_991_87, 0.001_936_09],
    l: [49.954_244_23, 1_222.493_622_01],
    peri: [92.598_878_31, -0.418_972_16],
    node: [113.662_424_48, -0.288_677_94],
};

const URANUS: OrbitalElements = OrbitalElements {
    a: [19.189_164_64, -0.001_961_76],
    e: [0.047_257_44, -0.000_043_97],
    i: [0.772_637_83, -0.002_429_39],
    l: [313.238_104_51, 428.482_027_85],
    peri: [170.954_276_30, 0.408_052_81],
    node: [74.016_925_03, 0.042_405_89],
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    a: [30.069_922_76, 0.000_262_91],
    e: [0.008_590_48, 0.000_051_05],
    i: [1.770_043_47, 0.000_353_72],
    l: [-55.120_029_69, 218.459_453_25],
    peri: [44.964_762_27, -0.322_414_64],
    node: [131.784_225_74, -0.005_086_64],
};

const PLUTO: OrbitalElements = OrbitalElements {
    a: [39.482_116_75, -0.000_315_96],
    e: [0.248_827_30, 0.000_051_70],
    i: [17.140_012_06, 0.000_048_18],
    l: [238.929_038_33, 145.207_805_15],
    peri: [224.068_916_29, -0.040_629_42],
    node: [110.303_936_84, -0.011_834_82],
};

fn elements_for(body: CelestialBody) -> Option<&'static OrbitalElements> {
    match body {
        CelestialBody::Mercury => Some(&MERCURY),
        CelestialBody::Venus => Some(&VENUS),
        CelestialBody::Mars => Some(&MARS),
        CelestialBody::Jupiter => Some(&JUPITER),
        CelestialBody::Saturn => Some(&SATURN),
        CelestialBody::Uranus => Some(&URANUS),
        CelestialBody::Neptune => Some(&NEPTUNE),
        CelestialBody::Pluto => Some(&PLUTO),
        _ => None,
    }
}

/// Heliocentric rectangular coordinates, J2000 ecliptic, AU.
fn heliocentric(el: &OrbitalElements, t: f64) -> [f64; 3] {
    let at = |p: [f64; 2]| p[0] + p[1] * t;
    let a = at(el.a);
    let e = at(el.e);
    let i = at(el.i).to_radians();
    let l = at(el.l);
    let peri = at(el.peri);
    let node = at(el.node);

    let omega = (peri - node).to_radians();
    let node = node.to_radians();
    let m = signed_difference(l, peri).to_radians();
    let ecc = solve_kepler(m, e);

    let xp = a * (ecc.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = i.sin_cos();
    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

/// Eccentric anomaly for mean anomaly `m` (radians).
fn solve_kepler(m: f64, e: f64) -> f64 {
    let mut ecc = m + e * m.sin();
    for _ in 0..30 {
        let delta = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

fn spherical(v: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = v;
    let rho = (x * x + y * y).sqrt();
    (
        normalize_degrees(y.atan2(x).to_degrees()),
        z.atan2(rho).to_degrees(),
        (rho * rho + z * z).sqrt(),
    )
}

/// Longitude, latitude (degrees) and distance (AU) for the equinox of date.
fn geocentric(body: CelestialBody, jd: f64) -> Option<(f64, f64, f64)> {
    let t = julian_centuries(jd);
    let earth = heliocentric(&EARTH_MOON, t);
    let (lon, lat, dist) = match body {
        CelestialBody::Moon => return Some(moon(t)),
        CelestialBody::NorthNode => return Some((mean_node(t), 0.0, moon(t).2)),
        CelestialBody::Sun => spherical([-earth[0], -earth[1], -earth[2]]),
        other => {
            let p = heliocentric(elements_for(other)?, t);
            spherical([p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]])
        }
    };
    Some((normalize_degrees(lon + PRECESSION_RATE * t), lat, dist))
}

fn mean_node(t: f64) -> f64 {
    normalize_degrees(125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t * t)
}

// (D, M, M', F, longitude 1e-6 deg, distance 1e-3 km)
const MOON_LR: [(f64, f64, f64, f64, f64, f64); 19] = [
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0, -20_905_355.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0, -3_699_111.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0, -2_955_968.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0, -569_925.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0, 48_888.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0, -3_149.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0, 246_158.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0, -152_138.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0, -170_733.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0, -204_586.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0, -129_620.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0, 108_743.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0, 104_755.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0, 10_321.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0, 0.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0, 79_661.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0, -34_782.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0, -23_210.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0, -21_636.0),
];

// (D, M, M', F, latitude 1e-6 deg)
const MOON_B: [(f64, f64, f64, f64, f64); 8] = [
    (0.0, 0.0, 0.0, 1.0, 5_128_122.0),
    (0.0, 0.0, 1.0, 1.0, 280_602.0),
    (0.0, 0.0, 1.0, -1.0, 277_693.0),
    (2.0, 0.0, 0.0, -1.0, 173_237.0),
    (2.0, 0.0, -1.0, 1.0, 55_413.0),
    (2.0, 0.0, -1.0, -1.0, 46_271.0),
    (2.0, 0.0, 0.0, 1.0, 32_573.0),
    (0.0, 0.0, 2.0, 1.0, 17_198.0),
];

fn moon(t: f64) -> (f64, f64, f64) {
    let lp = normalize_degrees(218.316_447_7 + 481_267.881_234_21 * t);
    let d = normalize_degrees(297.850_192_1 + 445_267.111_403_4 * t);
    let m = normalize_degrees(357.529_109_2 + 35_999.050_290_9 * t);
    let mp = normalize_degrees(134.963_396_4 + 477_198.867_505_5 * t);
    let f = normalize_degrees(93.272_095_0 + 483_202.017_523_3 * t);
    let e = 1.0 - 0.002_516 * t;
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();

    let eccentricity = |mc: f64| match mc.abs() as u8 {
        1 => e,
        2 => e * e,
        _ => 1.0,
    };
    let arg = |cd: f64, cm: f64, cmp: f64, cf: f64| {
        (cd * d + cm * m + cmp * mp + cf * f).to_radians()
    };

    let mut sl = 0.0;
    let mut sr = 0.0;
    for &(cd, cm, cmp, cf, l, r) in MOON_LR.iter() {
        let x = arg(cd, cm, cmp, cf);
        let k = eccentricity(cm);
        sl += l * k * x.sin();
        sr += r * k * x.cos();
    }
    let mut sb = 0.0;
    for &(cd, cm, cmp, cf, b) in MOON_B.iter() {
        sb += b * eccentricity(cm) * arg(cd, cm, cmp, cf).sin();
    }

    let lp_r = lp.to_radians();
    let f_r = f.to_radians();
    sl += 3_958.0 * a1.sin() + 1_962.0 * (lp_r - f_r).sin() + 318.0 * a2.sin();
    sb += -2_235.0 * lp_r.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f_r).sin()
        + 175.0 * (a1 + f_r).sin()
        + 127.0 * (lp_r - mp.to_radians()).sin()
        - 115.0 * (lp_r + mp.to_radians()).sin();

    (
        normalize_degrees(lp + sl / 1_000_000.0),
        sb / 1_000_000.0,
        (385_000.56 + sr / 1_000.0) / AU_KM,
    )
}

/// Mean obliquity of the ecliptic in degrees.
pub(crate) fn mean_obliquity(t: f64) -> f64 {
    23.439_291_111 - 0.013_004_166_7 * t
}

/// Right ascension of the meridian (local sidereal time) in degrees.
fn armc(jd: f64, east_longitude: f64) -> f64 {
    let t = julian_centuries(jd);
    let gmst = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(gmst + east_longitude)
}

/// Ecliptic longitude of the point with right ascension `ra` on the ecliptic.
fn ecliptic_from_ra(ra: f64, eps: f64) -> f64 {
    let (ra, eps) = (ra.to_radians(), eps.to_radians());
    normalize_degrees(ra.sin().atan2(ra.cos() * eps.cos()).to_degrees())
}

fn midheaven(ramc: f64, eps: f64) -> f64 {
    ecliptic_from_ra(ramc, eps)
}

fn ascendant(ramc: f64, eps: f64, lat: f64) -> f64 {
    let (r, e, p) = (ramc.to_radians(), eps.to_radians(), lat.to_radians());
    let asc = r.cos().atan2(-(r.sin() * e.cos() + p.tan() * e.sin()));
    normalize_degrees(asc.to_degrees())
}

/// Cusps for `system` from the angles. Placidus can fail at high latitudes.
pub(crate) fn compute_cusps(
    system: HouseSystem,
    ramc: f64,
    eps: f64,
    lat: f64,
) -> Option<[f64; 12]> {
    let asc = ascendant(ramc, eps, lat);
    let mc = midheaven(ramc, eps);
    match system {
        HouseSystem::Placidus => placidus_cusps(ramc, eps, lat, asc, mc),
        HouseSystem::Equal => Some(equal_cusps(asc)),
        HouseSystem::WholeSign => Some(whole_sign_cusps(asc)),
        _ => Some(porphyry_cusps(asc, mc)),
    }
}

pub(crate) fn equal_cusps(asc: f64) -> [f64; 12] {
    std::array::from_fn(|i| normalize_degrees(asc + 30.0 * i as f64))
}

pub(crate) fn whole_sign_cusps(asc: f64) -> [f64; 12] {
    let start = (asc / 30.0).floor() * 30.0;
    std::array::from_fn(|i| normalize_degrees(start + 30.0 * i as f64))
}

/// Each quadrant between the angles divided into equal thirds.
pub(crate) fn porphyry_cusps(asc: f64, mc: f64) -> [f64; 12] {
    let ic = normalize_degrees(mc + 180.0);
    let upper = normalize_degrees(asc - mc);
    let lower = normalize_degrees(ic - asc);
    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[1] = asc + lower / 3.0;
    cusps[2] = asc + 2.0 * lower / 3.0;
    cusps[3] = ic;
    cusps[9] = mc;
    cusps[10] = mc + upper / 3.0;
    cusps[11] = mc + 2.0 * upper / 3.0;
    fill_opposites(&mut cusps);
    cusps
}

fn fill_opposites(cusps: &mut [f64; 12]) {
    for i in [0, 1, 2, 3, 9, 10, 11] {
        cusps[i] = normalize_degrees(cusps[i]);
    }
    for (house, opposite) in [(4, 10), (5, 11), (6, 0), (7, 1), (8, 2)] {
        cusps[house] = normalize_degrees(cusps[opposite] + 180.0);
    }
}

/// Placidus intermediate cusps. Each cusp is bisected between the angles that
/// bracket it until the time-trisected semi-arc condition holds.
fn placidus_cusps(ramc: f64, eps: f64, lat: f64, asc: f64, mc: f64) -> Option<[f64; 12]> {
    if lat.abs() >= 90.0 - eps {
        return None;
    }
    let tan_phi = lat.to_radians().tan();
    let sin_eps = eps.to_radians().sin();
    let ic = normalize_degrees(mc + 180.0);

    // (fraction of the semi-arc, diurnal?)
    let cusp = |fraction: f64, diurnal: bool| -> Option<f64> {
        let ra_for = |semi_arc: f64| {
            if diurnal {
                ramc + fraction * semi_arc
            } else {
                ramc + 180.0 - fraction * (180.0 - semi_arc)
            }
        };
        // positive before the cusp, negative after it
        let residual = |lon: f64| -> Option<f64> {
            let decl = (sin_eps * lon.to_radians().sin()).asin();
            let x = -tan_phi * decl.tan();
            if !(-1.0..=1.0).contains(&x) {
                return None;
            }
            let dsa = x.acos().to_degrees();
            Some(signed_difference(ecliptic_from_ra(ra_for(dsa), eps), lon))
        };

        let (start, end) = if diurnal { (mc, asc) } else { (asc, ic) };
        let span = normalize_degrees(end - start);
        if residual(start)? < -1e-9 || residual(end)? > 1e-9 {
            return None;
        }
        let (mut lo, mut hi) = (0.0, span);
        for _ in 0..PLACIDUS_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            if residual(start + mid)? > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(normalize_degrees(start + 0.5 * (lo + hi)))
    };

    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[9] = mc;
    cusps[3] = mc + 180.0;
    cusps[10] = cusp(1.0 / 3.0, true)?;
    cusps[11] = cusp(2.0 / 3.0, true)?;
    cusps[1] = cusp(2.0 / 3.0, false)?;
    cusps[2] = cusp(1.0 / 3.0, false)?;
    fill_opposites(&mut cusps);
    Some(cusps)
}

/// Analytic ephemeris with no data files. Identical inputs always give identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateEphemeris;

impl ApproximateEphemeris {
    pub fn new() -> Self {
        Self
    }

    fn raw(&self, jd: f64, body: CelestialBody) -> Result<(f64, f64, f64), EphemerisError> {
        geocentric(body, jd).ok_or(EphemerisError::UnsupportedBody {
            provider: "approximate",
            body,
        })
    }
}

impl EphemerisProvider for ApproximateEphemeris {
    fn name(&self) -> &'static str {
        "approximate"
    }

    fn position(
        &self,
        jd_ut: f64,
        body: CelestialBody,
    ) -> Result<EclipticPosition, EphemerisError> {
        if body == CelestialBody::SouthNode {
            return self
                .position(jd_ut, CelestialBody::NorthNode)
                .map(|north| north.opposite_node());
        }
        let (longitude, latitude, distance) = self.raw(jd_ut, body)?;
        let (before, _, _) = self.raw(jd_ut - SPEED_STEP, body)?;
        let (after, _, _) = self.raw(jd_ut + SPEED_STEP, body)?;
        Ok(EclipticPosition {
            longitude,
            latitude,
            distance,
            speed: signed_difference(after, before) / (2.0 * SPEED_STEP),
        })
    }

    fn houses(
        &self,
        jd_ut: f64,
        location: &GeoLocation,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        if !location.lat.is_finite() || !location.lon.is_finite() || location.lat.abs() > 90.0 {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("invalid location {:?}", location),
            });
        }
        let eps = mean_obliquity(julian_centuries(jd_ut));
        let ramc = armc(jd_ut, location.lon);

        let served = match system {
            HouseSystem::Placidus
            | HouseSystem::Porphyry
            | HouseSystem::Equal
            | HouseSystem::WholeSign => system,
            other => {
                log::warn!("approximate ephemeris has no {} houses, using porphyry", other);
                HouseSystem::Porphyry
            }
        };

        let (system, cusps) = match compute_cusps(served, ramc, eps, location.lat) {
            Some(cusps) => (served, cusps),
            None => {
                log::warn!(
                    "{} houses undefined at latitude {:.2}, using porphyry",
                    served,
                    location.lat
                );
                let cusps = compute_cusps(HouseSystem::Porphyry, ramc, eps, location.lat)
                    .ok_or_else(|| EphemerisError::HouseCalculationFailed {
                        message: "porphyry cusps unavailable".to_string(),
                    })?;
                (HouseSystem::Porphyry, cusps)
            }
        };

        Ok(HousePositions {
            system,
            cusps,
            ascendant: ascendant(ramc, eps, location.lat),
            midheaven: midheaven(ramc, eps),
        })
    }
}
