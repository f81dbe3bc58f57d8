//! Compare every plan in a file across the three utilization scenarios
//!
//! Outputs one CSV row per plan and scenario for spreadsheet review

use anyhow::{Context, Result};
use clap::Parser;
use healthcare_cost_estimator::{
    assumptions::{load_cost_settings, DEFAULT_COST_SETTINGS_PATH},
    household::load_people,
    plan::load_plans,
    CostSettings, ScenarioKind, ScenarioRunner, Scenarios,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "compare_plans", about = "Scenario totals for every plan, written as CSV")]
struct Args {
    #[arg(long, default_value = "data/sample_plans.json")]
    plans: PathBuf,

    #[arg(long, default_value = "data/sample_household.json")]
    people: PathBuf,

    #[arg(long, default_value = DEFAULT_COST_SETTINGS_PATH)]
    costs: PathBuf,

    #[arg(long, short, default_value = "plan_comparison.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ComparisonRow<'a> {
    plan: &'a str,
    scenario: &'static str,
    annual_premium: String,
    out_of_pocket: String,
    total: String,
}

/// Built-in defaults only stand in for a missing file at the default location
fn load_costs(path: &Path) -> Result<CostSettings> {
    if path == Path::new(DEFAULT_COST_SETTINGS_PATH) && !path.exists() {
        log::info!("No {} found, using default cost assumptions", DEFAULT_COST_SETTINGS_PATH);
        return Ok(CostSettings::default());
    }
    load_cost_settings(path).with_context(|| format!("Failed to load cost assumptions from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let plans = load_plans(&args.plans)
        .with_context(|| format!("Failed to load plans from {}", args.plans.display()))?;
    let people = load_people(&args.people)
        .with_context(|| format!("Failed to load people from {}", args.people.display()))?;
    println!("Loaded {} plans and {} people in {:?}", plans.len(), people.len(), start.elapsed());

    let runner = ScenarioRunner::new().with_cost_settings(load_costs(&args.costs)?);
    let scenarios = Scenarios::derive(&people);

    let run_start = Instant::now();
    let results = runner.compare_plans(&plans, &scenarios);
    println!("Estimates complete in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for result in &results {
        for kind in ScenarioKind::ALL {
            let summary = result.summaries.get(kind);
            writer.serialize(ComparisonRow {
                plan: &result.plan_name,
                scenario: kind.label(),
                annual_premium: format!("{:.2}", summary.premium),
                out_of_pocket: format!("{:.2}", summary.visits),
                total: format!("{:.2}", summary.total),
            })?;
        }
    }
    writer.flush()?;

    // Cheapest plan per scenario
    for kind in ScenarioKind::ALL {
        let cheapest = results
            .iter()
            .min_by(|a, b| a.summaries.get(kind).total.total_cmp(&b.summaries.get(kind).total));
        if let Some(best) = cheapest {
            println!(
                "{:<12} cheapest: {} (${:.2})",
                kind.label(),
                best.plan_name,
                best.summaries.get(kind).total
            );
        }
    }

    println!("Output written to {}", args.output.display());
    Ok(())
}
