//! Healthcare Cost Estimator CLI
//!
//! Command-line interface for estimating a household's annual cost under one
//! or more insurance plans

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use healthcare_cost_estimator::{
    assumptions::load_cost_settings,
    estimate::{CoinsuranceMode, FullBreakdown},
    household::load_people,
    plan::load_plans,
    CostSettings, EstimateConfig, Person, Plan, ScenarioKind, ScenarioRunner, Scenarios, Workspace,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "healthcare-cost", version, about = "Estimate annual healthcare cost under insurance plans")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate premium + out-of-pocket cost for each plan
    Estimate {
        #[command(flatten)]
        inputs: Inputs,

        /// Print the itemized breakdown instead of the summary
        #[arg(long)]
        detailed: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compare plans under most likely, best case and worst case utilization
    Scenarios {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Write people, plans, cost assumptions and derived scenarios to one JSON file
    Export {
        #[command(flatten)]
        inputs: Inputs,

        /// Output path for the workspace file
        #[arg(long, short)]
        out: PathBuf,
    },
}

#[derive(Args)]
struct Inputs {
    /// Plan JSON file (one plan or an array of plans)
    #[arg(long)]
    plan: PathBuf,

    /// Household JSON file
    #[arg(long)]
    people: PathBuf,

    /// Cost assumptions, CSV (service,cost) or JSON; defaults are used when omitted
    #[arg(long)]
    costs: Option<PathBuf>,

    /// Only use the plan with this name
    #[arg(long)]
    plan_name: Option<String>,

    /// Apply one coinsurance rate per person (the last detected) instead of per charge
    #[arg(long)]
    last_rate_wins: bool,
}

impl Inputs {
    fn load(&self) -> Result<(Vec<Plan>, Vec<Person>, CostSettings)> {
        let mut plans = load_plans(&self.plan)
            .with_context(|| format!("Failed to load plans from {}", self.plan.display()))?;
        if let Some(name) = &self.plan_name {
            plans.retain(|p| &p.name == name);
            if plans.is_empty() {
                bail!("No plan named '{}' in {}", name, self.plan.display());
            }
        }

        let people = load_people(&self.people)
            .with_context(|| format!("Failed to load people from {}", self.people.display()))?;

        let costs = match &self.costs {
            Some(path) => load_costs(path)?,
            None => CostSettings::default(),
        };

        log::info!("Loaded {} plan(s) and {} people", plans.len(), people.len());
        Ok((plans, people, costs))
    }

    fn runner(&self, costs: CostSettings) -> ScenarioRunner {
        let config = EstimateConfig {
            coinsurance_mode: if self.last_rate_wins {
                CoinsuranceMode::LastRateWins
            } else {
                CoinsuranceMode::PerCharge
            },
            ..Default::default()
        };
        ScenarioRunner::new().with_config(config).with_cost_settings(costs)
    }
}

fn load_costs(path: &Path) -> Result<CostSettings> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let settings = if is_json {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cost assumptions from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid cost assumptions JSON in {}", path.display()))?
    } else {
        load_cost_settings(path)
            .with_context(|| format!("Failed to load cost assumptions from {}", path.display()))?
    };
    Ok(settings)
}

fn print_breakdown(breakdown: &FullBreakdown) {
    println!("{}", breakdown.plan_name);
    println!("{}", "=".repeat(breakdown.plan_name.len().max(20)));
    println!(
        "Premium: ${:.2}/month, ${:.2}/year",
        breakdown.premium_breakdown.monthly_premium, breakdown.premium_breakdown.annual_premium
    );

    for person in &breakdown.person_breakdowns {
        println!("\n  {}", person.name);
        for item in &person.exempt {
            println!("    {:<30} {:>10.2}  {}", item.label, item.cost, item.calculation_note);
        }
        for item in &person.deductible_applicable {
            println!("    {:<30} {:>10.2}  {} [deductible]", item.label, item.cost, item.calculation_note);
        }
        println!("    Copays:            ${:>10.2}", person.exempt_total);
        println!("    Deductible paid:   ${:>10.2}", person.deductible_paid);
        println!("    Coinsurance paid:  ${:>10.2}", person.coinsurance_paid);
        println!(
            "    Out of pocket:     ${:>10.2}{}",
            person.total_oop,
            person.note.as_deref().map(|n| format!("  ({})", n)).unwrap_or_default()
        );
    }

    let oop = &breakdown.oop_breakdown;
    println!();
    println!(
        "Family deductible paid: ${:.2} of ${:.2}",
        breakdown.deductible_breakdown.family_paid, breakdown.deductible_breakdown.family_limit
    );
    println!(
        "Household out of pocket: ${:.2}{}",
        oop.final_family_oop,
        if oop.family_moop_hit { " (Family MOOP Hit)" } else { "" }
    );
    println!("Grand total: ${:.2}\n", breakdown.grand_total);
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Estimate { inputs, detailed, json } => {
            let (plans, people, costs) = inputs.load()?;
            let runner = inputs.runner(costs);
            let breakdowns: Vec<FullBreakdown> =
                plans.iter().map(|plan| runner.run_detailed(plan, &people)).collect();

            if json {
                if detailed {
                    println!("{}", serde_json::to_string_pretty(&breakdowns)?);
                } else {
                    let summaries: Vec<_> = breakdowns.iter().map(|b| (&b.plan_name, b.summary())).collect();
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
            } else if detailed {
                breakdowns.iter().for_each(print_breakdown);
            } else {
                println!("{:<30} {:>12} {:>14} {:>12}", "Plan", "Premium", "Out of pocket", "Total");
                println!("{}", "-".repeat(71));
                for breakdown in &breakdowns {
                    let summary = breakdown.summary();
                    println!(
                        "{:<30} {:>12.2} {:>14.2} {:>12.2}",
                        breakdown.plan_name, summary.premium, summary.visits, summary.total
                    );
                }
            }
        }
        Command::Scenarios { inputs } => {
            let (plans, people, costs) = inputs.load()?;
            let runner = inputs.runner(costs);
            let scenarios = Scenarios::derive(&people);
            let results = runner.compare_plans(&plans, &scenarios);

            print!("{:<30}", "Plan");
            for kind in ScenarioKind::ALL {
                print!(" {:>14}", kind.label());
            }
            println!();
            println!("{}", "-".repeat(75));
            for result in &results {
                print!("{:<30}", result.plan_name);
                for kind in ScenarioKind::ALL {
                    print!(" {:>14.2}", result.summaries.get(kind).total);
                }
                println!();
            }
        }
        Command::Export { inputs, out } => {
            let (plans, people, costs) = inputs.load()?;
            let mut workspace = Workspace::new(people, plans, costs);
            workspace.refresh_scenarios();
            workspace
                .save(&out)
                .with_context(|| format!("Failed to write workspace to {}", out.display()))?;
            println!("Workspace written to: {}", out.display());
        }
    }

    Ok(())
}
