// src/handlers/identity.rs
use log::info;
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::routes::AppState;
use crate::services::identity::IdentityConfig;

#[derive(Serialize)]
struct IdentityConfigResponse<'a> {
    enabled: bool,
    #[serde(flatten)]
    config: Option<&'a IdentityConfig>,
}

/// Client-side SDK settings. Auth stays disabled when no public key is configured.
pub async fn get_identity_config(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for identity config");

    Ok(warp::reply::json(&IdentityConfigResponse {
        enabled: state.identity.is_some(),
        config: state.identity.as_ref(),
    }))
}
