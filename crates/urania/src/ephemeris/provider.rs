use crate::ephemeris::adapter::{EphemerisError, SwissEphemerisAdapter};
use crate::ephemeris::approximate::ApproximateEphemeris;
use crate::ephemeris::types::{
    BodyPositions, CelestialBody, EclipticPosition, EphemerisSettings, GeoLocation,
    HousePositions, HouseSystem, SkyPositions,
};
use std::path::PathBuf;

/// Source of raw body positions and house cusps.
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn position(&self, jd_ut: f64, body: CelestialBody) -> Result<EclipticPosition, EphemerisError>;

    fn houses(
        &self,
        jd_ut: f64,
        location: &GeoLocation,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError>;

    /// Positions for every requested body plus houses when a location is given.
    ///
    /// Bodies the provider cannot place are skipped. Fails when none of the
    /// requested bodies could be placed.
    fn calc_positions(
        &self,
        jd_ut: f64,
        location: Option<&GeoLocation>,
        settings: &EphemerisSettings,
    ) -> Result<SkyPositions, EphemerisError> {
        let bodies = collect_positions(self, jd_ut, &settings.bodies)?;
        let houses = match location {
            Some(loc) => Some(self.houses(jd_ut, loc, settings.house_system)?),
            None => None,
        };
        Ok(SkyPositions {
            julian_day: jd_ut,
            bodies,
            houses,
            source: self.name().to_string(),
        })
    }
}

fn collect_positions<P: EphemerisProvider + ?Sized>(
    provider: &P,
    jd_ut: f64,
    bodies: &[CelestialBody],
) -> Result<BodyPositions, EphemerisError> {
    let mut positions = BodyPositions::new();
    let mut last_error = None;
    for &body in bodies {
        if positions.contains_key(&body) {
            continue;
        }
        match provider.position(jd_ut, body) {
            Ok(pos) => {
                positions.insert(body, pos);
            }
            Err(e) => {
                log::debug!("{}: skipping {}: {}", provider.name(), body, e);
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if positions.is_empty() => Err(e),
        _ => Ok(positions),
    }
}

/// Tries a primary provider and answers from the approximate ephemeris when it fails.
pub struct FallbackEphemeris {
    primary: Option<Box<dyn EphemerisProvider>>,
    fallback: ApproximateEphemeris,
    allow_fallback: bool,
}

impl FallbackEphemeris {
    pub fn new(primary: Option<Box<dyn EphemerisProvider>>) -> Self {
        Self {
            primary,
            fallback: ApproximateEphemeris::new(),
            allow_fallback: true,
        }
    }

    /// Swiss Ephemeris when its data files are present, otherwise approximate only.
    pub fn swiss_or_approximate(ephemeris_path: Option<PathBuf>) -> Self {
        match SwissEphemerisAdapter::new(ephemeris_path) {
            Ok(adapter) => Self::new(Some(Box::new(adapter))),
            Err(e) => {
                log::warn!("Swiss Ephemeris unavailable, using approximate positions: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn approximate_only() -> Self {
        Self::new(None)
    }

    /// Disable the approximate fallback so primary errors propagate.
    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    fn resolve<T>(
        &self,
        what: &str,
        primary: impl FnOnce(&dyn EphemerisProvider) -> Result<T, EphemerisError>,
        fallback: impl FnOnce(&ApproximateEphemeris) -> Result<T, EphemerisError>,
    ) -> Result<T, EphemerisError> {
        match (&self.primary, self.allow_fallback) {
            (Some(p), true) => primary(p.as_ref()).or_else(|e| {
                log::warn!("{} failed for {}, falling back to approximate: {}", p.name(), what, e);
                fallback(&self.fallback)
            }),
            (Some(p), false) => primary(p.as_ref()),
            (None, true) => fallback(&self.fallback),
            (None, false) => Err(EphemerisError::Unavailable {
                message: "no primary ephemeris configured and fallback is disabled".to_string(),
            }),
        }
    }
}

impl EphemerisProvider for FallbackEphemeris {
    fn name(&self) -> &'static str {
        match &self.primary {
            Some(p) => p.name(),
            None => self.fallback.name(),
        }
    }

    fn position(
        &self,
        jd_ut: f64,
        body: CelestialBody,
    ) -> Result<EclipticPosition, EphemerisError> {
        self.resolve(
            body.id(),
            |p| p.position(jd_ut, body),
            |f| f.position(jd_ut, body),
        )
    }

    fn houses(
        &self,
        jd_ut: f64,
        location: &GeoLocation,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        self.resolve(
            "houses",
            |p| p.houses(jd_ut, location, system),
            |f| f.houses(jd_ut, location, system),
        )
    }

    /// Whole snapshots come from a single provider so a chart never mixes sources.
    fn calc_positions(
        &self,
        jd_ut: f64,
        location: Option<&GeoLocation>,
        settings: &EphemerisSettings,
    ) -> Result<SkyPositions, EphemerisError> {
        self.resolve(
            "positions",
            |p| p.calc_positions(jd_ut, location, settings),
            |f| f.calc_positions(jd_ut, location, settings),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl EphemerisProvider for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn position(
            &self,
            _jd: f64,
            body: CelestialBody,
        ) -> Result<EclipticPosition, EphemerisError> {
            Err(EphemerisError::UnsupportedBody {
                provider: "broken",
                body,
            })
        }

        fn houses(
            &self,
            _jd: f64,
            _location: &GeoLocation,
            _system: HouseSystem,
        ) -> Result<HousePositions, EphemerisError> {
            Err(EphemerisError::HouseCalculationFailed {
                message: "broken".to_string(),
            })
        }
    }

    const JD: f64 = 2_451_545.0;

    #[test]
    fn test_fallback_answers_when_primary_fails() {
        let eph = FallbackEphemeris::new(Some(Box::new(Broken)));
        let snapshot = eph
            .calc_positions(
                JD,
                Some(&GeoLocation { lat: 51.5, lon: 0.0 }),
                &EphemerisSettings::default(),
            )
            .unwrap();
        assert_eq!(snapshot.source, "approximate");
        assert!(snapshot.bodies.contains_key(&CelestialBody::Sun));
        assert!(snapshot.houses.is_some());
    }

    #[test]
    fn test_disabled_fallback_propagates_error() {
        let eph = FallbackEphemeris::new(Some(Box::new(Broken))).with_fallback(false);
        assert!(eph.position(JD, CelestialBody::Sun).is_err());

        let none = FallbackEphemeris::approximate_only().with_fallback(false);
        assert!(matches!(
            none.position(JD, CelestialBody::Sun),
            Err(EphemerisError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_unsupported_bodies_are_skipped() {
        let eph = ApproximateEphemeris::new();
        let settings = EphemerisSettings::default();
        let snapshot = eph.calc_positions(JD, None, &settings).unwrap();
        assert!(!snapshot.bodies.contains_key(&CelestialBody::Chiron));
        assert!(snapshot.bodies.contains_key(&CelestialBody::SouthNode));
        assert!(snapshot.houses.is_none());
    }

    #[test]
    fn test_all_bodies_failing_is_an_error() {
        let settings = EphemerisSettings {
            house_system: HouseSystem::Placidus,
            bodies: vec![CelestialBody::Sun],
        };
        assert!(Broken.calc_positions(JD, None, &settings).is_err());
    }
}
