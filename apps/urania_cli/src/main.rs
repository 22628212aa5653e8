mod birth;

use anyhow::Context;
use birth::BirthArg;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use urania::chart::ChartCalculator;
use urania::ephemeris::EphemerisProvider;
use urania::human_design::HumanDesignCalculator;
use urania::numerology;
use urania::synastry::SynastryEngine;
use urania::transits::TransitsCalculator;
use urania::BirthData;
use urania_config::{load_settings, UraniaSettings};

/// Natal, transit, synastry, numerology and Human Design calculations as JSON.
///
/// Births are given as `YYYY-MM-DDTHH:MM[:SS][+HH:MM]@LAT,LON`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (otherwise $URANIA_CONFIG or configs/urania.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging regardless of the configured level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use only the approximate ephemeris.
    #[arg(long, global = true)]
    approximate: bool,

    /// Single-line JSON output.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Natal chart with houses, aspects, dignities and decans.
    Natal { birth: BirthArg },
    /// Transits to a natal chart at one moment.
    Transits {
        birth: BirthArg,
        /// RFC 3339 moment (default: now).
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Transit windows, ingresses and stations over a span of days.
    Forecast {
        birth: BirthArg,
        /// RFC 3339 start (default: now).
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Compatibility of two natal charts.
    Synastry { person: BirthArg, partner: BirthArg },
    /// Numerology numbers from a name and birth date.
    Numerology {
        #[arg(long)]
        name: String,
        /// Birth date, YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,
        /// Year for the personal-year number (default: current year).
        #[arg(long)]
        year: Option<i32>,
    },
    /// Human Design chart.
    HumanDesign { birth: BirthArg },
}

fn init_logging(settings: &UraniaSettings, verbose: bool) {
    let level = if verbose { "debug" } else { settings.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn emit<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn provider(settings: &UraniaSettings, approximate: bool) -> Arc<dyn EphemerisProvider> {
    if approximate {
        Arc::new(urania::FallbackEphemeris::approximate_only())
    } else {
        Arc::new(settings.provider())
    }
}

fn natal_chart(
    settings: &UraniaSettings,
    provider: &Arc<dyn EphemerisProvider>,
    birth: &BirthData,
) -> anyhow::Result<urania::NatalChart> {
    ChartCalculator::new(provider.clone(), settings.chart_settings())
        .calculate(birth)
        .context("Failed to calculate natal chart")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    init_logging(&settings, args.verbose);
    let eph = provider(&settings, args.approximate);
    log::info!("ephemeris provider: {}", eph.name());

    match args.command {
        Command::Natal { birth: BirthArg(birth) } => {
            let chart = natal_chart(&settings, &eph, &birth)?;
            emit(
                &json!({
                    "dignities": chart.dignities(),
                    "decans": chart.decans(),
                    "elements": chart.element_balance(),
                    "modalities": chart.modality_balance(),
                    "chart_ruler": chart.chart_ruler(),
                    "chart": chart,
                }),
                args.compact,
            )
        }
        Command::Transits { birth: BirthArg(birth), at } => {
            let chart = natal_chart(&settings, &eph, &birth)?;
            let report = TransitsCalculator::new(eph.clone(), settings.transit_settings())
                .calculate(&chart, at.unwrap_or_else(Utc::now))
                .context("Failed to calculate transits")?;
            emit(&report, args.compact)
        }
        Command::Forecast {
            birth: BirthArg(birth),
            from,
            days,
        } => {
            let chart = natal_chart(&settings, &eph, &birth)?;
            let start = from.unwrap_or_else(Utc::now);
            let end = start + Duration::days(i64::from(days));
            let calc = TransitsCalculator::new(eph.clone(), settings.transit_settings());
            let events = calc
                .forecast(&chart, start, days)
                .context("Failed to scan transit windows")?;
            let ingresses = calc
                .find_ingresses(start, end)
                .context("Failed to find ingresses")?;
            let stations = calc
                .find_stations(start, end)
                .context("Failed to find stations")?;
            emit(
                &json!({
                    "start": start,
                    "end": end,
                    "events": events,
                    "ingresses": ingresses,
                    "stations": stations,
                }),
                args.compact,
            )
        }
        Command::Synastry {
            person: BirthArg(a),
            partner: BirthArg(b),
        } => {
            let chart_a = natal_chart(&settings, &eph, &a)?;
            let chart_b = natal_chart(&settings, &eph, &b)?;
            let engine = SynastryEngine::new(settings.synastry_settings());
            let report = engine.compare(&chart_a, &chart_b);
            emit(&report, args.compact)
        }
        Command::Numerology { name, date, year } => {
            let birth = BirthData {
                year: date.year(),
                month: date.month(),
                day: date.day(),
                hour: 0,
                minute: 0,
                second: 0,
                latitude: 0.0,
                longitude: 0.0,
                timezone: 0.0,
            };
            let target_year = year.unwrap_or_else(|| Utc::now().year());
            let report = numerology::reading(&name, &birth, target_year)
                .with_context(|| format!("Failed to read numbers for {:?}", name))?;
            emit(&report, args.compact)
        }
        Command::HumanDesign { birth: BirthArg(birth) } => {
            let chart = HumanDesignCalculator::new(eph.clone())
                .calculate(&birth)
                .context("Failed to calculate Human Design chart")?;
            emit(
                &json!({
                    "type": chart.hd_type(),
                    "strategy": chart.strategy(),
                    "signature": chart.hd_type().signature(),
                    "not_self_theme": chart.hd_type().not_self_theme(),
                    "authority": chart.authority(),
                    "definition": chart.definition(),
                    "profile": chart.profile.clone(),
                    "open_centers": chart.bodygraph.open_centers(),
                    "chart": chart,
                }),
                args.compact,
            )
        }
    }
}
