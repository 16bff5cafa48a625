// src/handlers/rates.rs
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{ProxyResponse, RateQuote};
use crate::routes::AppState;

#[derive(Serialize)]
struct CurrentRatesResponse {
    success: bool,
    data: RateQuote,
    fallback: bool,
    fetched_at: DateTime<Utc>,
}

/// Pass-through to the rates provider. Upstream failures become a 500.
pub async fn get_mortgage_rates(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to proxy mortgage rates");

    match state.rates.fetch_upstream().await {
        Ok(data) => Ok(warp::reply::json(&ProxyResponse::ok(data))),
        Err(e) => {
            error!("Error fetching mortgage rates: {}", e);
            Err(warp::reject::custom(ApiError::upstream(
                "Failed to fetch mortgage rates",
            )))
        }
    }
}

/// Rates for the suggestion widget. Never fails; falls back to default rates.
pub async fn get_current_rates(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to get current rate suggestion");

    let suggestion = state.rates.fetch_suggestion().await;
    Ok(warp::reply::json(&CurrentRatesResponse {
        success: true,
        data: suggestion.quote,
        fallback: suggestion.fallback,
        fetched_at: suggestion.fetched_at,
    }))
}
