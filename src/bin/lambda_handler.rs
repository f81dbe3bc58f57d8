//! AWS Lambda handler for household cost estimates
//!
//! Accepts a plan (or list of plans), the household and optional cost
//! assumptions as JSON, and returns the estimate for every plan along with
//! best/worst case scenario totals.
//!
//! Works with direct invocation and with Lambda Function URLs, whose payload
//! carries the request as a JSON string in `body`.

use healthcare_cost_estimator::{
    estimate::{CoinsuranceMode, CostSummary, FullBreakdown},
    household::people_from_value,
    plan::plans_from_value,
    scenario::ScenarioSummaries,
    CostSettings, EstimateConfig, ScenarioRunner, Scenarios,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Input for one estimate request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    /// One plan object or an array of plans, in the import format
    pub plan: Value,

    /// Array of people or `{ "people": [...] }`
    pub people: Value,

    /// Cost assumptions (default: built-in national averages)
    #[serde(default)]
    pub cost_settings: Option<CostSettings>,

    /// Return itemized breakdowns instead of summaries
    #[serde(default)]
    pub detailed: bool,

    /// Use one detected coinsurance rate per person
    #[serde(default)]
    pub last_rate_wins: bool,

    /// Also estimate best and worst case households (default: true)
    #[serde(default = "default_true")]
    pub include_scenarios: bool,
}

fn default_true() -> bool { true }

/// Estimate for one plan
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEstimate {
    pub plan_name: String,
    pub summary: CostSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<FullBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<ScenarioSummaries>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub plan_count: usize,
    pub person_count: usize,
    pub estimates: Vec<PlanEstimate>,
    pub execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Value {
    json!({ "statusCode": status, "error": message })
}

/// Function URLs wrap the request in an HTTP envelope
fn unwrap_request(payload: Value) -> Result<EstimateRequest, String> {
    let body = payload.get("body").and_then(Value::as_str).map(str::to_owned);
    let request = match body {
        Some(body) => serde_json::from_str(&body),
        None => serde_json::from_value(payload),
    };
    request.map_err(|e| format!("Invalid JSON: {}", e))
}

fn estimate(request: EstimateRequest) -> Result<EstimateResponse, String> {
    let start = std::time::Instant::now();

    let plans = plans_from_value(&request.plan).map_err(|e| format!("Invalid plan: {}", e))?;
    let people = people_from_value(&request.people).map_err(|e| format!("Invalid people: {}", e))?;
    log::info!("Estimating {} plan(s) for {} people", plans.len(), people.len());

    let config = EstimateConfig {
        coinsurance_mode: if request.last_rate_wins {
            CoinsuranceMode::LastRateWins
        } else {
            CoinsuranceMode::PerCharge
        },
        ..Default::default()
    };
    let runner = ScenarioRunner::new()
        .with_config(config)
        .with_cost_settings(request.cost_settings.unwrap_or_default());

    let scenarios = request.include_scenarios.then(|| Scenarios::derive(&people));

    let estimates = plans
        .iter()
        .map(|plan| {
            let breakdown = runner.run_detailed(plan, &people);
            PlanEstimate {
                plan_name: plan.name.clone(),
                summary: breakdown.summary(),
                breakdown: request.detailed.then_some(breakdown),
                scenarios: scenarios.as_ref().map(|s| runner.run_scenarios(plan, s)),
            }
        })
        .collect();

    Ok(EstimateResponse {
        plan_count: plans.len(),
        person_count: people.len(),
        estimates,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let request = match unwrap_request(event.payload) {
        Ok(r) => r,
        Err(message) => return Ok(error_response(400, &message)),
    };

    match estimate(request) {
        Ok(response) => Ok(serde_json::to_value(response)?),
        Err(message) => {
            log::warn!("Rejected request: {}", message);
            Ok(error_response(422, &message))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
