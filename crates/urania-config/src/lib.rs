use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use urania::aspects::{AspectKind, AspectSettings, OrbTable};
use urania::chart::ChartSettings;
use urania::ephemeris::{CelestialBody, EphemerisSettings, FallbackEphemeris, HouseSystem};
use urania::synastry::SynastrySettings;
use urania::transits::TransitSettings;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "URANIA_CONFIG";

const CANDIDATE_PATHS: [&str; 2] = ["configs/urania.toml", "../../configs/urania.toml"];
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
const MAX_ORB: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct UraniaSettings {
    /// Swiss Ephemeris data directory; the library default when unset.
    pub ephemeris_path: Option<PathBuf>,
    /// Answer from the approximate ephemeris when Swiss Ephemeris fails.
    pub allow_fallback: bool,
    pub house_system: HouseSystem,
    pub bodies: Vec<CelestialBody>,
    pub orbs: OrbTable,
    pub transit_orbs: OrbTable,
    pub log_level: String,
}

impl Default for UraniaSettings {
    fn default() -> Self {
        let ephemeris = EphemerisSettings::default();
        Self {
            ephemeris_path: None,
            allow_fallback: true,
            house_system: ephemeris.house_system,
            bodies: ephemeris.bodies,
            orbs: OrbTable::default(),
            transit_orbs: OrbTable::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    fallback: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartToml {
    #[serde(default)]
    house_system: Option<String>,
    #[serde(default)]
    bodies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OrbsToml {
    conjunction: Option<f64>,
    opposition: Option<f64>,
    trine: Option<f64>,
    square: Option<f64>,
    sextile: Option<f64>,
    quincunx: Option<f64>,
    semisextile: Option<f64>,
}

impl OrbsToml {
    fn apply(&self, base: OrbTable) -> OrbTable {
        let overrides = [
            (AspectKind::Conjunction, self.conjunction),
            (AspectKind::Opposition, self.opposition),
            (AspectKind::Trine, self.trine),
            (AspectKind::Square, self.square),
            (AspectKind::Sextile, self.sextile),
            (AspectKind::Quincunx, self.quincunx),
            (AspectKind::Semisextile, self.semisextile),
        ];
        overrides
            .into_iter()
            .fold(base, |table, (kind, orb)| match orb {
                Some(orb) => table.with(kind, orb),
                None => table,
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingToml {
    #[serde(default)]
    level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    chart: ChartToml,
    #[serde(default)]
    orbs: OrbsToml,
    #[serde(default)]
    transit_orbs: Option<OrbsToml>,
    #[serde(default)]
    logging: LoggingToml,
}

/// Config file to read: the explicit path, then `URANIA_CONFIG`, then the
/// first existing common relative path.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    CANDIDATE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Load settings from the resolved config file, or defaults when there is none.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<UraniaSettings> {
    let Some(path) = config_path(explicit) else {
        return Ok(UraniaSettings::default());
    };
    let text = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Could not read config {}: {e}", path.display()))?;
    from_toml_str(&text)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))
}

pub fn from_toml_str(text: &str) -> anyhow::Result<UraniaSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania.toml: {e}"))?;
    let RootConfigToml {
        ephemeris,
        chart,
        orbs,
        transit_orbs,
        logging,
    } = root;

    let defaults = UraniaSettings::default();
    let house_system = match chart.house_system {
        Some(name) => name
            .parse::<HouseSystem>()
            .map_err(|e| anyhow::anyhow!("[chart] house_system: {e}"))?,
        None => defaults.house_system,
    };
    let bodies = match chart.bodies {
        Some(names) => names
            .iter()
            .map(|n| n.parse::<CelestialBody>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("[chart] bodies: {e}"))?,
        None => defaults.bodies,
    };
    let natal_orbs = orbs.apply(OrbTable::default());
    let transit_orbs = match transit_orbs {
        Some(t) => t.apply(natal_orbs),
        None => natal_orbs,
    };

    let settings = UraniaSettings {
        ephemeris_path: ephemeris.path,
        allow_fallback: ephemeris.fallback.unwrap_or(defaults.allow_fallback),
        house_system,
        bodies,
        orbs: natal_orbs,
        transit_orbs,
        log_level: logging.level.unwrap_or(defaults.log_level),
    };
    settings.validate()?;
    Ok(settings)
}

impl UraniaSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (section, table) in [("orbs", &self.orbs), ("transit_orbs", &self.transit_orbs)] {
            for kind in AspectKind::ALL {
                let orb = table.get(kind);
                if !(0.0..=MAX_ORB).contains(&orb) {
                    anyhow::bail!("[{section}] {kind} = {orb} is outside [0, {MAX_ORB}]");
                }
            }
        }
        if self.bodies.is_empty() {
            anyhow::bail!("[chart] bodies must name at least one body");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            anyhow::bail!(
                "[logging] level {:?} is not one of {:?}",
                self.log_level,
                LOG_LEVELS
            );
        }
        Ok(())
    }

    pub fn ephemeris_settings(&self) -> EphemerisSettings {
        EphemerisSettings {
            house_system: self.house_system,
            bodies: self.bodies.clone(),
        }
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            ephemeris: self.ephemeris_settings(),
            aspects: AspectSettings::with_orbs(self.orbs),
        }
    }

    pub fn transit_settings(&self) -> TransitSettings {
        TransitSettings {
            bodies: self.bodies.clone(),
            aspects: AspectSettings::with_orbs(self.transit_orbs),
        }
    }

    pub fn synastry_settings(&self) -> SynastrySettings {
        SynastrySettings {
            aspects: AspectSettings::with_orbs(self.orbs),
        }
    }

    /// Swiss Ephemeris with the approximate fallback, as configured.
    pub fn provider(&self) -> FallbackEphemeris {
        FallbackEphemeris::swiss_or_approximate(self.ephemeris_path.clone())
            .with_fallback(self.allow_fallback)
    }
}
