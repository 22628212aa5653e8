use crate::aspects::{AspectCalculator, AspectPair, AspectSettings};
use crate::chart::houses::{house_for_longitude, HouseData};
use crate::ephemeris::{
    BodyPositions, CelestialBody, EclipticPosition, EphemerisError, EphemerisProvider,
    EphemerisSettings, HouseSystem, SkyPositions,
};
use crate::error::Result;
use crate::time::{julian_day, BirthData};
use crate::western::{
    degree_in_sign, get_decan_info_from_longitude, sign_ruler, DecanInfo, DignitiesService,
    DignityResult, Element, Modality, ZodiacSign,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A body placed in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    #[serde(rename = "name")]
    pub body: CelestialBody,
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    pub speed: f64,
    pub sign: ZodiacSign,
    /// Degree within the sign
    pub degree: f64,
    pub house: u8,
    pub retrograde: bool,
}

impl PlanetPosition {
    pub fn new(body: CelestialBody, pos: &EclipticPosition, cusps: &[f64; 12]) -> Self {
        Self {
            body,
            longitude: pos.longitude,
            latitude: pos.latitude,
            distance: pos.distance,
            speed: pos.speed,
            sign: ZodiacSign::from_longitude(pos.longitude),
            degree: degree_in_sign(pos.longitude),
            house: house_for_longitude(pos.longitude, cusps),
            retrograde: pos.is_retrograde(),
        }
    }

    pub fn ecliptic(&self) -> EclipticPosition {
        EclipticPosition {
            longitude: self.longitude,
            latitude: self.latitude,
            distance: self.distance,
            speed: self.speed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartSettings {
    pub ephemeris: EphemerisSettings,
    pub aspects: AspectSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatalChart {
    pub birth: BirthData,
    pub datetime_utc: DateTime<Utc>,
    pub julian_day: f64,
    pub house_system: HouseSystem,
    pub planets: Vec<PlanetPosition>,
    pub houses: Vec<HouseData>,
    pub ascendant: f64,
    pub midheaven: f64,
    pub aspects: Vec<AspectPair>,
    /// Provider that produced the positions ("swiss" or "approximate").
    pub source: String,
}

impl NatalChart {
    pub fn planet(&self, body: CelestialBody) -> Option<&PlanetPosition> {
        self.planets.iter().find(|p| p.body == body)
    }

    pub fn body_positions(&self) -> BodyPositions {
        self.planets.iter().map(|p| (p.body, p.ecliptic())).collect()
    }

    pub fn cusps(&self) -> [f64; 12] {
        let mut cusps = [0.0; 12];
        for h in &self.houses {
            if let 1..=12 = h.number {
                cusps[usize::from(h.number - 1)] = h.longitude;
            }
        }
        cusps
    }

    /// House of this chart containing an arbitrary longitude.
    pub fn house_of(&self, longitude: f64) -> u8 {
        house_for_longitude(longitude, &self.cusps())
    }

    pub fn ascendant_sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.ascendant)
    }

    /// Traditional ruler of the rising sign.
    pub fn chart_ruler(&self) -> CelestialBody {
        sign_ruler(self.ascendant_sign(), false)
    }

    /// Sun-through-Pluto count per element.
    pub fn element_balance(&self) -> BTreeMap<Element, usize> {
        let mut balance: BTreeMap<Element, usize> =
            [Element::Fire, Element::Earth, Element::Air, Element::Water]
                .into_iter()
                .map(|e| (e, 0))
                .collect();
        for p in self.classical_planets() {
            *balance.entry(p.sign.element()).or_default() += 1;
        }
        balance
    }

    pub fn modality_balance(&self) -> BTreeMap<Modality, usize> {
        let mut balance: BTreeMap<Modality, usize> =
            [Modality::Cardinal, Modality::Fixed, Modality::Mutable]
                .into_iter()
                .map(|m| (m, 0))
                .collect();
        for p in self.classical_planets() {
            *balance.entry(p.sign.modality()).or_default() += 1;
        }
        balance
    }

    pub fn dignities(&self) -> BTreeMap<CelestialBody, Vec<DignityResult>> {
        let service = DignitiesService;
        let exact = DignitiesService::get_default_exact_exaltations();
        self.planets
            .iter()
            .map(|p| (p.body, service.get_dignities(p.body, p.longitude, Some(&exact))))
            .filter(|(_, d)| !d.is_empty())
            .collect()
    }

    pub fn decans(&self) -> BTreeMap<CelestialBody, DecanInfo> {
        self.planets
            .iter()
            .map(|p| (p.body, get_decan_info_from_longitude(p.longitude)))
            .collect()
    }

    fn classical_planets(&self) -> impl Iterator<Item = &PlanetPosition> {
        self.planets
            .iter()
            .filter(|p| CelestialBody::PLANETS.contains(&p.body))
    }
}

/// Computes natal charts from birth data through an ephemeris provider.
pub struct ChartCalculator {
    provider: Arc<dyn EphemerisProvider>,
    settings: ChartSettings,
}

impl ChartCalculator {
    pub fn new(provider: Arc<dyn EphemerisProvider>, settings: ChartSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider(&self) -> &Arc<dyn EphemerisProvider> {
        &self.provider
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn calculate(&self, birth: &BirthData) -> Result<NatalChart> {
        let datetime_utc = birth.to_utc()?;
        let jd = julian_day(datetime_utc);
        let location = birth.location();

        let sky = self
            .provider
            .calc_positions(jd, Some(&location), &self.settings.ephemeris)?;
        let houses = sky.houses.ok_or_else(|| EphemerisError::HouseCalculationFailed {
            message: "provider returned no houses for a located chart".to_string(),
        })?;

        let planets: Vec<PlanetPosition> = sky
            .bodies
            .iter()
            .map(|(&body, pos)| PlanetPosition::new(body, pos, &houses.cusps))
            .collect();

        let aspects = AspectCalculator::new()
            .compute_intra_layer_aspects("natal", &sky.bodies, &self.settings.aspects)
            .pairs;

        log::debug!(
            "natal chart for {} ({}): {} bodies, {} aspects",
            datetime_utc,
            sky.source,
            planets.len(),
            aspects.len()
        );

        Ok(NatalChart {
            birth: *birth,
            datetime_utc,
            julian_day: jd,
            house_system: houses.system,
            houses: HouseData::from_positions(&houses),
            planets,
            ascendant: houses.ascendant,
            midheaven: houses.midheaven,
            aspects,
            source: sky.source,
        })
    }

    /// Sky positions for an arbitrary moment, without houses.
    pub fn positions_at(&self, at: DateTime<Utc>) -> Result<SkyPositions> {
        Ok(self
            .provider
            .calc_positions(julian_day(at), None, &self.settings.ephemeris)?)
    }
}
