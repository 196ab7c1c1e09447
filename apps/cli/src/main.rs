#![deny(warnings)]

//! Headless driver: load a works catalog and an event script, replay it
//! through an editing session and report the derived quantity.

use anyhow::{Context, Result};
use boq_calc::{line_total, EditSession, SyncOutcome};
use boq_core::{validate_catalog, SessionEvent, SourceItem};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    scenario: Option<String>,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Args {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => out.scenario = it.next(),
            "--version" => out.version = true,
            _ => {}
        }
    }
    out
}

fn default_dp() -> u32 {
    2
}

/// A scripted editing session for one BOQ line.
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    name: String,
    works: Vec<SourceItem>,
    #[serde(default)]
    initial_quantity: Option<f64>,
    #[serde(default)]
    unit_rate: Decimal,
    #[serde(default = "default_dp")]
    rounding_dp: u32,
    #[serde(default)]
    events: Vec<SessionEvent>,
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let mut scenario: Scenario = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    if scenario.name.is_empty() {
        scenario.name = path.display().to_string();
    }
    Ok(scenario)
}

/// The four walkthrough steps for a single work "W1" with base quantity 10.
fn builtin_scenario() -> Scenario {
    Scenario {
        name: "builtin".to_string(),
        works: vec![SourceItem::new("W1", 10.0)],
        initial_quantity: None,
        unit_rate: Decimal::ZERO,
        rounding_dp: default_dp(),
        events: vec![
            SessionEvent::SelectSource {
                id: "W1".to_string(),
            },
            SessionEvent::SetConsumption { value: Some(2.0) },
            SessionEvent::SetConversion { value: Some(1.5) },
            SessionEvent::SetConsumption { value: Some(0.0) },
            SessionEvent::SelectSource {
                id: "ZZZ".to_string(),
            },
        ],
    }
}

fn run(scenario: &Scenario) -> Result<EditSession> {
    validate_catalog(&scenario.works)
        .with_context(|| format!("invalid works catalog in {}", scenario.name))?;
    let mut session = match scenario.initial_quantity {
        Some(q) => EditSession::with_quantity(q),
        None => EditSession::new(),
    };
    for (step, event) in scenario.events.iter().enumerate() {
        match session.apply(&scenario.works, event) {
            SyncOutcome::Recomputed(value) => info!(step, ?event, value, "recomputed"),
            SyncOutcome::Skipped(reason) => info!(step, ?event, ?reason, "skipped"),
        }
    }
    Ok(session)
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::DEBUG)
        .init();

    let args = parse_args(std::env::args().skip(1));
    if args.version {
        println!(
            "boq-sync {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(scenario = ?args.scenario, "starting CLI");

    let scenario = match &args.scenario {
        Some(path) => load_scenario(Path::new(path))?,
        None => builtin_scenario(),
    };
    let session = run(&scenario)?;

    let selected = session
        .inputs()
        .selected_source
        .as_ref()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| "-".to_string());
    match session.quantity() {
        Some(q) => {
            let total = line_total(q, scenario.unit_rate, scenario.rounding_dp)?;
            println!(
                "Quantity | {} | value: {} | writes: {} | selected: {} | total: {}",
                scenario.name,
                q,
                session.writes(),
                selected,
                total
            );
        }
        None => {
            warn!(scenario = %scenario.name, "no quantity derived");
            println!(
                "Quantity | {} | value: - | writes: {} | selected: {}",
                scenario.name,
                session.writes(),
                selected
            );
        }
    }

    Ok(())
}
