use crate::ephemeris::approximate::mean_obliquity;
use crate::ephemeris::provider::EphemerisProvider;
use crate::ephemeris::types::{
    CelestialBody, EclipticPosition, GeoLocation, HousePositions, HouseSystem,
};
use crate::time::julian_centuries;
use chrono::{DateTime, TimeZone, Utc};
use std::env;
use std::path::PathBuf;
use swisseph::swe::{calc_ut, houses_ex, revjul, set_ephe_path};
use swisseph::{AscMc, Cusp};
use thiserror::Error;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Failed to calculate position for {body} at {datetime}: {message}")]
    CalculationFailed {
        body: CelestialBody,
        datetime: DateTime<Utc>,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
    #[error("{provider} ephemeris cannot compute {body}")]
    UnsupportedBody {
        provider: &'static str,
        body: CelestialBody,
    },
    #[error("No ephemeris available: {message}")]
    Unavailable { message: String },
}

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;

/// Swiss Ephemeris planet code, `None` for derived points.
fn swe_code(body: CelestialBody) -> Option<i32> {
    match body {
        CelestialBody::Sun => Some(0),
        CelestialBody::Moon => Some(1),
        CelestialBody::Mercury => Some(2),
        CelestialBody::Venus => Some(3),
        CelestialBody::Mars => Some(4),
        CelestialBody::Jupiter => Some(5),
        CelestialBody::Saturn => Some(6),
        CelestialBody::Uranus => Some(7),
        CelestialBody::Neptune => Some(8),
        CelestialBody::Pluto => Some(9),
        CelestialBody::NorthNode => Some(11), // TRUE_NODE
        CelestialBody::Chiron => Some(15),
        CelestialBody::SouthNode => None,
    }
}

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter;

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path.
    ///
    /// Falls back to `SWISS_EPHEMERIS_PATH`, then to the system default.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files \
                          are installed."
                    .to_string(),
            });
        }

        let path_str = path
            .to_str()
            .filter(|p| !p.contains('\0'))
            .ok_or_else(|| EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path is not valid UTF-8.".to_string(),
            })?;
        set_ephe_path(path_str);

        log::info!("Using Swiss Ephemeris data at {}", path.display());
        Ok(Self)
    }

    /// Calculate position for a single body
    pub fn calc_body_position(
        &self,
        body: CelestialBody,
        jd: f64,
    ) -> Result<EclipticPosition, EphemerisError> {
        let Some(code) = swe_code(body) else {
            return self
                .calc_body_position(CelestialBody::NorthNode, jd)
                .map(|north| north.opposite_node());
        };

        let result = calc_ut(jd, code as u32, CALC_FLAGS as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body,
                datetime: julian_day_to_datetime(jd),
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(EclipticPosition {
            longitude: out[0].rem_euclid(360.0),
            latitude: out[1],
            distance: out[2],
            speed: out[3],
        })
    }

    /// Calculate house cusps and angles
    pub fn calc_houses(
        &self,
        jd: f64,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        let eps = mean_obliquity(julian_centuries(jd));
        let system = served_system(system, lat, eps);
        let (c, a) = houses_ex(jd, 0, lat, lon, system.code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if cusp_values.iter().any(|c| !c.is_finite()) {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("{} cusps undefined at latitude {:.2}", system, lat),
            });
        }

        Ok(HousePositions {
            system,
            cusps: cusp_values.map(|c| c.rem_euclid(360.0)),
            ascendant: ascmc.ascendant.rem_euclid(360.0),
            midheaven: ascmc.mc.rem_euclid(360.0),
        })
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn name(&self) -> &'static str {
        "swiss"
    }

    fn position(
        &self,
        jd_ut: f64,
        body: CelestialBody,
    ) -> Result<EclipticPosition, EphemerisError> {
        self.calc_body_position(body, jd_ut)
    }

    fn houses(
        &self,
        jd_ut: f64,
        location: &GeoLocation,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        self.calc_houses(jd_ut, location.lat, location.lon, system)
    }
}

/// Placidus and Koch are undefined inside the polar circles; Porphyry stands in.
fn served_system(system: HouseSystem, lat: f64, eps: f64) -> HouseSystem {
    match system {
        HouseSystem::Placidus | HouseSystem::Koch if lat.abs() >= 90.0 - eps => {
            log::warn!("{} houses undefined at latitude {:.2}, using porphyry", system, lat);
            HouseSystem::Porphyry
        }
        other => other,
    }
}

/// Convert Julian Day to UTC datetime
fn julian_day_to_datetime(jd: f64) -> DateTime<Utc> {
    // GREG_CAL = 1
    let (year, month, day, hour_decimal) = revjul(jd, 1);
    let hour = hour_decimal as u32;
    let minute = ((hour_decimal - hour as f64) * 60.0) as u32;
    let second = (((hour_decimal - hour as f64) * 60.0 - minute as f64) * 60.0) as u32;
    Utc.with_ymd_and_hms(year, month as u32, day as u32, hour, minute, second)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_reported() {
        let err = SwissEphemerisAdapter::new(Some(PathBuf::from("/nonexistent/swisseph/data")))
            .err()
            .expect("missing path must fail");
        assert!(matches!(err, EphemerisError::FileNotFound { .. }));
    }

    #[test]
    fn test_south_node_has_no_swiss_code() {
        assert_eq!(swe_code(CelestialBody::SouthNode), None);
        assert_eq!(swe_code(CelestialBody::NorthNode), Some(11));
        assert_eq!(swe_code(CelestialBody::Chiron), Some(15));
    }

    #[test]
    fn test_polar_placidus_is_served_as_porphyry() {
        let eps = 23.44;
        assert_eq!(served_system(HouseSystem::Placidus, 78.2, eps), HouseSystem::Porphyry);
        assert_eq!(served_system(HouseSystem::Koch, -70.0, eps), HouseSystem::Porphyry);
        assert_eq!(served_system(HouseSystem::Placidus, 66.0, eps), HouseSystem::Placidus);
        assert_eq!(served_system(HouseSystem::Equal, 78.2, eps), HouseSystem::Equal);
    }
}
