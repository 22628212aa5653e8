use crate::aspects::{match_aspect, AspectCalculator, AspectKind, AspectStrength};
use crate::chart::NatalChart;
use crate::ephemeris::{
    CelestialBody, EclipticPosition, EphemerisProvider, EphemerisSettings, SkyPositions,
};
use crate::error::{Result, UraniaError};
use crate::time::{datetime_from_julian_day, julian_day};
use crate::transits::types::{
    Ingress, Station, StationKind, TransitAspect, TransitEvent, TransitPosition, TransitReport,
    TransitSettings,
};
use crate::western::{degree_in_sign, ZodiacSign};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Bisection stops once the bracket is under a minute.
const MINUTE: f64 = 1.0 / 1440.0;
const MAX_BISECTIONS: usize = 40;

/// Compares the moving sky against a natal chart.
pub struct TransitsCalculator {
    provider: Arc<dyn EphemerisProvider>,
    settings: TransitSettings,
}

impl TransitsCalculator {
    pub fn new(provider: Arc<dyn EphemerisProvider>, settings: TransitSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &TransitSettings {
        &self.settings
    }

    /// Aspect between a transiting and a natal longitude: the first table entry within orb.
    pub fn calculate_aspect(
        &self,
        lon1: f64,
        lon2: f64,
    ) -> Option<(AspectKind, f64, AspectStrength)> {
        let orbs = &self.settings.aspects.orbs;
        match_aspect(lon1, lon2, orbs, self.settings.aspects.only_major)
            .map(|(kind, orb)| (kind, orb, AspectStrength::from_orb(orb, orbs.get(kind))))
    }

    pub fn positions_at(&self, at: DateTime<Utc>) -> Result<SkyPositions> {
        self.positions_jd(julian_day(at), &self.settings.bodies)
    }

    fn positions_jd(&self, jd: f64, bodies: &[CelestialBody]) -> Result<SkyPositions> {
        let request = EphemerisSettings {
            bodies: bodies.to_vec(),
            ..EphemerisSettings::default()
        };
        Ok(self.provider.calc_positions(jd, None, &request)?)
    }

    /// Current transits to a natal chart, strongest first.
    pub fn calculate(&self, natal: &NatalChart, at: DateTime<Utc>) -> Result<TransitReport> {
        let sky = self.positions_at(at)?;
        let natal_positions = natal.body_positions();

        let set = AspectCalculator::new().compute_inter_layer_aspects(
            "transit",
            "natal",
            &sky.bodies,
            &natal_positions,
            &self.settings.aspects,
        );

        let mut aspects: Vec<TransitAspect> = set
            .pairs
            .into_iter()
            .map(|pair| TransitAspect {
                transiting: pair.from.body,
                natal: pair.to.body,
                kind: pair.aspect.kind,
                exact_angle: pair.aspect.exact_angle,
                orb: pair.aspect.orb,
                strength: pair.aspect.strength,
                applying: pair.aspect.is_applying,
            })
            .collect();
        aspects.sort_by(|a, b| a.strength.cmp(&b.strength).then(a.orb.total_cmp(&b.orb)));

        let positions = sky
            .bodies
            .iter()
            .map(|(&body, pos)| TransitPosition {
                body,
                longitude: pos.longitude,
                speed: pos.speed,
                sign: ZodiacSign::from_longitude(pos.longitude),
                degree: degree_in_sign(pos.longitude),
                natal_house: natal.house_of(pos.longitude),
                retrograde: pos.is_retrograde(),
            })
            .collect();

        Ok(TransitReport {
            at,
            julian_day: sky.julian_day,
            source: sky.source,
            positions,
            aspects,
        })
    }

    /// Sign ingresses of the transiting bodies between `start` and `end`, in time order.
    pub fn find_ingresses(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Ingress>> {
        let (start_jd, end_jd) = span(start, end)?;
        let mut ingresses = Vec::new();

        for &body in self.scan_bodies(|b| b != CelestialBody::SouthNode) {
            let Some(first) = self.first_position(body, start_jd) else {
                continue;
            };
            let step = if body == CelestialBody::Moon { 1.0 / 12.0 } else { 1.0 };
            let mut jd0 = start_jd;
            let mut sign0 = ZodiacSign::from_longitude(first.longitude);

            while jd0 < end_jd {
                let jd1 = (jd0 + step).min(end_jd);
                let lon1 = self.provider.position(jd1, body)?.longitude;
                let sign1 = ZodiacSign::from_longitude(lon1);
                if sign1 != sign0 {
                    let still_in =
                        |p: &EclipticPosition| ZodiacSign::from_longitude(p.longitude) == sign0;
                    let at = self.bisect(jd0, jd1, still_in, body)?;
                    let pos = self.provider.position(at, body)?;
                    ingresses.push(Ingress {
                        body,
                        at: to_datetime(at)?,
                        from: sign0,
                        to: sign1,
                        retrograde: pos.is_retrograde(),
                    });
                    sign0 = sign1;
                }
                jd0 = jd1;
            }
        }

        ingresses.sort_by_key(|i| i.at);
        Ok(ingresses)
    }

    /// Retrograde and direct stations between `start` and `end`, in time order.
    pub fn find_stations(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Station>> {
        let (start_jd, end_jd) = span(start, end)?;
        let mut stations = Vec::new();

        for &body in self.scan_bodies(|b| b.can_station()) {
            let Some(first) = self.first_position(body, start_jd) else {
                continue;
            };
            let mut jd0 = start_jd;
            let mut retro0 = first.is_retrograde();

            while jd0 < end_jd {
                let jd1 = (jd0 + 1.0).min(end_jd);
                let retro1 = self.provider.position(jd1, body)?.is_retrograde();
                if retro1 != retro0 {
                    let at = self.bisect(jd0, jd1, |p| p.is_retrograde() == retro0, body)?;
                    let pos = self.provider.position(at, body)?;
                    stations.push(Station {
                        body,
                        at: to_datetime(at)?,
                        kind: if retro1 {
                            StationKind::Retrograde
                        } else {
                            StationKind::Direct
                        },
                        longitude: pos.longitude,
                    });
                    retro0 = retro1;
                }
                jd0 = jd1;
            }
        }

        stations.sort_by_key(|s| s.at);
        Ok(stations)
    }

    /// Daily scan of transit windows to a natal chart. The Moon moves too fast
    /// for daily sampling and is left out.
    pub fn forecast(
        &self,
        natal: &NatalChart,
        start: DateTime<Utc>,
        days: u32,
    ) -> Result<Vec<TransitEvent>> {
        struct Open {
            start: f64,
            exact: f64,
            min_orb: f64,
        }

        let aspects = &self.settings.aspects;
        let natal_positions: Vec<(CelestialBody, f64)> = natal
            .planets
            .iter()
            .filter(|p| aspects.includes(p.body))
            .map(|p| (p.body, p.longitude))
            .collect();
        let bodies: Vec<CelestialBody> = self
            .scan_bodies(|b| b != CelestialBody::Moon && aspects.includes(b))
            .copied()
            .collect();

        let start_jd = julian_day(start);
        let mut open: HashMap<(CelestialBody, CelestialBody, AspectKind), Open> = HashMap::new();
        let mut events = Vec::new();

        for day in 0..=days {
            let jd = start_jd + f64::from(day);
            let sky = self.positions_jd(jd, &bodies)?;
            let mut seen = HashSet::new();

            for (&transiting, pos) in &sky.bodies {
                for &(natal_body, natal_lon) in &natal_positions {
                    let Some((kind, orb)) =
                        match_aspect(pos.longitude, natal_lon, &aspects.orbs, aspects.only_major)
                    else {
                        continue;
                    };
                    let key = (transiting, natal_body, kind);
                    seen.insert(key);
                    let entry = open.entry(key).or_insert(Open {
                        start: jd,
                        exact: jd,
                        min_orb: orb,
                    });
                    if orb < entry.min_orb {
                        entry.min_orb = orb;
                        entry.exact = jd;
                    }
                }
            }

            let closed: Vec<_> = open.keys().filter(|k| !seen.contains(*k)).copied().collect();
            for key in closed {
                if let Some(o) = open.remove(&key) {
                    events.push(self.event(key, o.start, jd - 1.0, o.exact, o.min_orb)?);
                }
            }
        }

        let last_jd = start_jd + f64::from(days);
        for (key, o) in open {
            events.push(self.event(key, o.start, last_jd, o.exact, o.min_orb)?);
        }

        events.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.transiting.cmp(&b.transiting))
                .then(a.natal.cmp(&b.natal))
        });
        Ok(events)
    }

    fn event(
        &self,
        (transiting, natal, kind): (CelestialBody, CelestialBody, AspectKind),
        start: f64,
        end: f64,
        exact: f64,
        min_orb: f64,
    ) -> Result<TransitEvent> {
        Ok(TransitEvent {
            transiting,
            natal,
            kind,
            start: to_datetime(start)?,
            end: to_datetime(end)?,
            exact: to_datetime(exact)?,
            min_orb,
            strength: AspectStrength::from_orb(min_orb, self.settings.aspects.orbs.get(kind)),
        })
    }

    fn scan_bodies(
        &self,
        keep: impl Fn(CelestialBody) -> bool,
    ) -> impl Iterator<Item = &CelestialBody> {
        let mut seen = HashSet::new();
        self.settings
            .bodies
            .iter()
            .filter(move |b| keep(**b) && seen.insert(**b))
    }

    /// Position at the start of a scan; bodies the provider cannot place are skipped.
    fn first_position(&self, body: CelestialBody, jd: f64) -> Option<EclipticPosition> {
        match self.provider.position(jd, body) {
            Ok(pos) => Some(pos),
            Err(e) => {
                log::debug!("skipping {} in scan: {}", body, e);
                None
            }
        }
    }

    /// Narrow `[lo, hi]` to the first moment where `still_before` stops holding.
    fn bisect(
        &self,
        mut lo: f64,
        mut hi: f64,
        still_before: impl Fn(&EclipticPosition) -> bool,
        body: CelestialBody,
    ) -> Result<f64> {
        for _ in 0..MAX_BISECTIONS {
            if hi - lo < MINUTE {
                break;
            }
            let mid = 0.5 * (lo + hi);
            if still_before(&self.provider.position(mid, body)?) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(hi)
    }
}

fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(f64, f64)> {
    if end < start {
        return Err(UraniaError::InvalidInput(format!(
            "search end {} is before start {}",
            end, start
        )));
    }
    Ok((julian_day(start), julian_day(end)))
}

fn to_datetime(jd: f64) -> Result<DateTime<Utc>> {
    datetime_from_julian_day(jd)
        .ok_or_else(|| UraniaError::InvalidInput(format!("Julian Day {} is out of range", jd)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::ApproximateEphemeris;

    fn calculator() -> TransitsCalculator {
        TransitsCalculator::new(Arc::new(ApproximateEphemeris::new()), TransitSettings::default())
    }

    #[test]
    fn test_calculate_aspect_first_match() {
        let calc = calculator();
        let (kind, orb, strength) = calc.calculate_aspect(10.0, 130.5).unwrap();
        assert_eq!(kind, AspectKind::Trine);
        assert!((orb - 0.5).abs() < 1e-9);
        assert_eq!(strength, AspectStrength::Exact);
        assert!(calc.calculate_aspect(0.0, 45.0).is_none());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let calc = calculator();
        let start = Utc::now();
        let end = start - chrono::Duration::days(1);
        assert!(calc.find_ingresses(start, end).is_err());
    }
}
