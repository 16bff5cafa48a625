use env_logger;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use mortgage_calc::config::Config;
use mortgage_calc::routes::{self, AppState};
use mortgage_calc::services::rates::RatesClient;

#[tokio::main]
async fn main() {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Bind to 0.0.0.0 so the service is reachable inside containers
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let state = Arc::new(AppState {
        rates: RatesClient::new(config.rates_api_url, config.rates_api_key),
        identity: config.identity,
    });

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;
}
