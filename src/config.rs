// src/config.rs
use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{info, warn};
use std::env;

use crate::services::identity::IdentityConfig;

pub const DEFAULT_RATES_API_URL: &str = "https://api.api-ninjas.com/v1/mortgagerate";
const DEFAULT_PORT: u16 = 3030;
const DEFAULT_SESSION_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rates_api_url: String,
    pub rates_api_key: String,
    pub identity: Option<IdentityConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().context("PORT must be a number")?,
            Err(_) => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let rates_api_url =
            env::var("RATES_API_URL").unwrap_or_else(|_| DEFAULT_RATES_API_URL.to_string());
        let rates_api_key = env::var("RATES_API_KEY").unwrap_or_else(|_| {
            warn!("RATES_API_KEY not set, upstream calls will fall back to default rates");
            String::new()
        });

        let session_duration_days = match env::var("IDENTITY_SESSION_DAYS") {
            Ok(raw) => raw
                .parse::<u32>()
                .context("IDENTITY_SESSION_DAYS must be a number")?,
            Err(_) => DEFAULT_SESSION_DAYS,
        };

        let identity = match env::var("IDENTITY_PUBLIC_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(IdentityConfig {
                public_key: key,
                use_cookies: true,
                session_duration_days,
            }),
            _ => {
                warn!("IDENTITY_PUBLIC_KEY not set, auth features are disabled");
                None
            }
        };

        info!("Configuration loaded (port {}, rates url {})", port, rates_api_url);

        Ok(Config {
            port,
            rates_api_url,
            rates_api_key,
            identity,
        })
    }
}
