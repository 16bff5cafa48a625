// src/handlers/calculate.rs
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{CostBreakdown, LoanInputs};
use crate::services::amortization::breakdown_for;
use crate::services::display::BreakdownDisplay;

#[derive(Serialize)]
struct CalculateResponse {
    success: bool,
    data: Option<CostBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<BreakdownDisplay>,
}

/// Takes the raw form fields as a loose map, so missing, repeated or garbage
/// parameters all end up as "no result" rather than a rejected request.
pub async fn calculate(query: HashMap<String, String>) -> Result<Json, Rejection> {
    info!("Handling calculate request: {:?}", query);

    let field = |name: &str| query.get(name).map(String::as_str).unwrap_or("");
    let breakdown = LoanInputs::from_fields(field("principal"), field("rate"), field("term"))
        .and_then(|inputs| breakdown_for(&inputs));

    if breakdown.is_none() {
        debug!("Inputs incomplete or invalid, returning no result");
    }

    let display = breakdown.as_ref().map(BreakdownDisplay::from);
    Ok(warp::reply::json(&CalculateResponse {
        success: true,
        data: breakdown,
        display,
    }))
}
