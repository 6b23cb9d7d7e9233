//! AWS Lambda handler for the calculator engine
//!
//! Accepts one JSON request naming an `operation` and its inputs, runs exactly
//! one engine operation and returns the structured result with a one-line
//! summary. Engine errors come back as 422 with their kind and message.

use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use payoff_engine::{
    amortization::{compute_schedule, Loan},
    bond::{solve_price, solve_yield, Bond},
    goal::{required_contribution, solve_time_to_goal, SavingsGoal},
    payoff::{compare_strategies, Debt, PayoffConfig, PayoffSimulator, Strategy},
    report::{PlainFormatter, Summarize},
    EngineError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Input for one engine call
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineRequest {
    Schedule {
        loan: Loan,
    },
    Payoff {
        debts: Vec<Debt>,
        #[serde(default)]
        extra_monthly_budget: f64,
        #[serde(default = "default_strategy")]
        strategy: Strategy,
        #[serde(default)]
        detailed: bool,
    },
    Compare {
        debts: Vec<Debt>,
        #[serde(default)]
        extra_monthly_budget: f64,
    },
    Yield {
        bond: Bond,
    },
    Price {
        bond: Bond,
    },
    Goal {
        goal: SavingsGoal,
        /// Also solve the contribution needed to finish in this many months
        #[serde(default)]
        within_months: Option<u32>,
    },
}

fn default_strategy() -> Strategy { Strategy::Avalanche }

/// Successful output
#[derive(Debug, Serialize)]
pub struct EngineResponse {
    pub result: Value,
    pub summary: Option<String>,
    pub execution_time_ms: u64,
}

/// Run the requested operation
fn dispatch(request: EngineRequest) -> Result<(Value, Option<String>), EngineError> {
    let fmt = PlainFormatter::default();

    let output = match request {
        EngineRequest::Schedule { loan } => {
            let schedule = compute_schedule(&loan)?;
            let summary = schedule.summarize(&fmt);
            (json!({ "schedule": schedule, "summary": schedule.summary() }), Some(summary))
        }
        EngineRequest::Payoff { debts, extra_monthly_budget, strategy, detailed } => {
            let mut config = PayoffConfig::new(strategy, extra_monthly_budget);
            config.detailed_output = detailed;
            let plan = PayoffSimulator::new(config).simulate(&debts)?;
            let summary = plan.summarize(&fmt);
            (json!(plan), Some(summary))
        }
        EngineRequest::Compare { debts, extra_monthly_budget } => {
            let comparison = compare_strategies(&debts, extra_monthly_budget)?;
            let summary = comparison.summarize(&fmt);
            (
                json!({
                    "avalanche": comparison.avalanche,
                    "snowball": comparison.snowball,
                    "interest_saved_by_avalanche": comparison.interest_saved_by_avalanche(),
                }),
                Some(summary),
            )
        }
        EngineRequest::Yield { bond } => {
            let solution = solve_yield(&bond)?;
            let summary = solution.summarize(&fmt);
            (json!(solution), Some(summary))
        }
        EngineRequest::Price { bond } => {
            let price = solve_price(&bond)?;
            (json!({ "price": price }), None)
        }
        EngineRequest::Goal { goal, within_months } => {
            let projection = solve_time_to_goal(&goal)?;
            let needed = within_months
                .map(|months| required_contribution(&goal, months))
                .transpose()?;
            let summary = projection.summarize(&fmt);
            (json!({ "projection": projection, "required_contribution": needed }), Some(summary))
        }
    };

    Ok(output)
}

fn respond(status: i64, body: String) -> Result<ApiGatewayProxyResponse, Error> {
    let mut response = ApiGatewayProxyResponse {
        status_code: status,
        body: Some(Body::Text(body)),
        ..Default::default()
    };
    response.headers.insert("content-type", "application/json".parse()?);
    response.headers.insert("access-control-allow-origin", "*".parse()?);
    response.headers.insert("access-control-allow-methods", "POST, OPTIONS".parse()?);
    response.headers.insert("access-control-allow-headers", "Content-Type".parse()?);
    Ok(response)
}

fn error_body(kind: &str, message: &str) -> String {
    json!({ "error": { "kind": kind, "message": message } }).to_string()
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ApiGatewayProxyRequest>) -> Result<ApiGatewayProxyResponse, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.payload.http_method.as_str() == "OPTIONS" {
        return respond(200, String::new());
    }

    let body = event.payload.body.as_deref().unwrap_or("{}");
    let request: EngineRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return respond(400, error_body("bad_request", &format!("Invalid JSON: {}", e))),
    };
    log::debug!("Dispatching {:?}", request);

    match dispatch(request) {
        Ok((result, summary)) => {
            let response = EngineResponse {
                result,
                summary,
                execution_time_ms: start.elapsed().as_millis() as u64,
            };
            respond(200, serde_json::to_string(&response)?)
        }
        Err(e) => {
            log::warn!("Engine error: {}", e);
            respond(422, error_body(e.kind(), &e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
