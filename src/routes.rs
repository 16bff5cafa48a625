// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::{
    calculate::calculate,
    identity::get_identity_config,
    rates::{get_current_rates, get_mortgage_rates},
};
use crate::services::identity::IdentityConfig;
use crate::services::rates::RatesClient;
use log::{error, info};

use std::collections::HashMap;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub rates: RatesClient,
    pub identity: Option<IdentityConfig>,
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found";
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.as_str();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed";
    } else {
        error!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error";
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "success": false,
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let mortgage_rates_route = warp::path!("api" / "mortgage-rates")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_mortgage_rates);

    let current_rates_route = warp::path!("api" / "v1" / "rates" / "current")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_current_rates);

    let calculate_route = warp::path!("api" / "v1" / "calculate")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and_then(calculate);

    let identity_route = warp::path!("api" / "v1" / "identity" / "config")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_identity_config);

    info!("All routes configured successfully.");

    mortgage_rates_route
        .or(current_rates_route)
        .or(calculate_route)
        .or(identity_route)
        .recover(handle_rejection)
}
