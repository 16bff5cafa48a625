// src/services/rates.rs
use chrono::Utc;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{RateQuote, RateSuggestion};

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("request to rates provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rates provider returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed rates payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct UpstreamRecord {
    #[serde(default)]
    data: Option<RateQuote>,
}

#[derive(Debug, Clone)]
pub struct RatesClient {
    client: Client,
    url: String,
    api_key: String,
}

impl RatesClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        RatesClient {
            client: Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// One call to the provider. `Ok(None)` means it answered with no records.
    pub async fn fetch_upstream(&self) -> Result<Option<RateQuote>, RatesError> {
        info!("Fetching mortgage rates from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::Status(status));
        }

        let body = response.bytes().await?;
        let records: Vec<UpstreamRecord> = serde_json::from_slice(&body)?;
        debug!("Rates provider returned {} records", records.len());

        Ok(records.into_iter().next().and_then(|r| r.data))
    }

    /// Best-effort quote. Any failure yields [`RateQuote::fallback`].
    pub async fn fetch_current_rates(&self) -> RateQuote {
        self.fetch_suggestion().await.quote
    }

    pub async fn fetch_suggestion(&self) -> RateSuggestion {
        let (quote, fallback) = match self.fetch_upstream().await {
            Ok(Some(quote)) if !quote.is_empty() => (quote, false),
            Ok(Some(_)) => {
                warn!("Rates provider record carried no rates, using default rates");
                (RateQuote::fallback(), true)
            }
            Ok(None) => {
                warn!("Rates provider returned no records, using default rates");
                (RateQuote::fallback(), true)
            }
            Err(e) => {
                warn!("Failed to fetch mortgage rates, using default rates: {}", e);
                (RateQuote::fallback(), true)
            }
        };

        RateSuggestion {
            quote,
            fetched_at: Utc::now(),
            fallback,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_upstream {
    use std::net::SocketAddr;
    use warp::http::StatusCode;
    use warp::Filter;

    /// Serves `body` with `status` on an ephemeral local port, checking the API key header.
    pub async fn serve(status: StatusCode, body: &'static str) -> SocketAddr {
        let route = warp::path!("v1" / "mortgagerate")
            .and(warp::header::<String>("x-api-key"))
            .map(move |key: String| {
                let code = if key == "test-key" { status } else { StatusCode::UNAUTHORIZED };
                warp::reply::with_status(
                    warp::reply::with_header(body, "content-type", "application/json"),
                    code,
                )
            });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    pub fn url(addr: SocketAddr) -> String {
        format!("http://{}/v1/mortgagerate", addr)
    }

    /// A port nothing is listening on.
    pub fn dead_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        url(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::test_upstream::{dead_url, serve, url};
    use super::*;
    use pretty_assertions::assert_eq;
    use warp::http::StatusCode;

    #[tokio::test]
    async fn takes_first_record() {
        let addr = serve(
            StatusCode::OK,
            r#"[{"data":{"frm_30":"6.1","frm_15":"5.4","week":"2024-05-02"}},{"data":{"frm_30":"7.0"}}]"#,
        )
        .await;
        let client = RatesClient::new(url(addr), "test-key");

        let quote = client.fetch_upstream().await.unwrap();
        assert_eq!(
            quote,
            Some(RateQuote {
                frm_30: Some("6.1".to_string()),
                frm_15: Some("5.4".to_string()),
            })
        );

        let suggestion = client.fetch_suggestion().await;
        assert!(!suggestion.fallback);
        assert_eq!(suggestion.quote.frm_30.as_deref(), Some("6.1"));
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let addr = serve(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"down"}"#).await;
        let client = RatesClient::new(url(addr), "test-key");

        assert!(matches!(
            client.fetch_upstream().await,
            Err(RatesError::Status(code)) if code == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert_eq!(client.fetch_current_rates().await, RateQuote::fallback());
    }

    #[tokio::test]
    async fn empty_array_falls_back() {
        let addr = serve(StatusCode::OK, "[]").await;
        let client = RatesClient::new(url(addr), "test-key");

        assert_eq!(client.fetch_upstream().await.unwrap(), None);
        let suggestion = client.fetch_suggestion().await;
        assert!(suggestion.fallback);
        assert_eq!(
            suggestion.quote,
            RateQuote {
                frm_30: Some("6.95".to_string()),
                frm_15: Some("6.12".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn record_without_rates_falls_back() {
        for body in [r#"[{"data":{}}]"#, r#"[{"data":{"frm_30":null,"frm_15":null}}]"#] {
            let addr = serve(StatusCode::OK, body).await;
            let client = RatesClient::new(url(addr), "test-key");

            assert_eq!(client.fetch_upstream().await.unwrap(), Some(RateQuote::default()));
            let suggestion = client.fetch_suggestion().await;
            assert!(suggestion.fallback, "{}", body);
            assert_eq!(suggestion.quote, RateQuote::fallback(), "{}", body);
        }
    }

    #[tokio::test]
    async fn single_rate_is_kept() {
        let addr = serve(StatusCode::OK, r#"[{"data":{"frm_30":"6.1"}}]"#).await;
        let client = RatesClient::new(url(addr), "test-key");

        let suggestion = client.fetch_suggestion().await;
        assert!(!suggestion.fallback);
        assert_eq!(
            suggestion.quote,
            RateQuote { frm_30: Some("6.1".to_string()), frm_15: None }
        );
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let addr = serve(StatusCode::OK, r#"{"not":"an array"}"#).await;
        let client = RatesClient::new(url(addr), "test-key");

        assert!(matches!(client.fetch_upstream().await, Err(RatesError::Payload(_))));
        assert_eq!(client.fetch_current_rates().await, RateQuote::fallback());
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back() {
        let client = RatesClient::new(dead_url(), "test-key");

        assert!(matches!(client.fetch_upstream().await, Err(RatesError::Request(_))));
        assert_eq!(client.fetch_current_rates().await, RateQuote::fallback());
    }

    #[tokio::test]
    async fn wrong_key_is_a_failure() {
        let addr = serve(StatusCode::OK, r#"[{"data":{"frm_30":"6.1"}}]"#).await;
        let client = RatesClient::new(url(addr), "wrong");

        assert!(matches!(
            client.fetch_upstream().await,
            Err(RatesError::Status(code)) if code == StatusCode::UNAUTHORIZED
        ));
    }
}
