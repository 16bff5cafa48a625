// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};

pub const PRINCIPAL_COLOR: &str = "#3245ff";
pub const INTEREST_COLOR: &str = "#bc52ee";

/// Loan terms as entered on the calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_years: f64,
}

impl LoanInputs {
    /// Parses raw form fields. Blank or non-numeric text counts as missing.
    pub fn from_fields(principal: &str, rate: &str, term: &str) -> Option<Self> {
        Some(LoanInputs {
            principal: parse_field(principal)?,
            annual_rate_percent: parse_field(rate)?,
            term_years: parse_field(term)?,
        })
    }
}

fn parse_field(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCategory {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub principal: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_cost: f64,
    pub categories: [CostCategory; 2],
}

/// Current 30 and 15 year fixed rates, as percentages encoded in strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateQuote {
    #[serde(default, deserialize_with = "rate_as_string", skip_serializing_if = "Option::is_none")]
    pub frm_30: Option<String>,
    #[serde(default, deserialize_with = "rate_as_string", skip_serializing_if = "Option::is_none")]
    pub frm_15: Option<String>,
}

impl RateQuote {
    /// True when neither rate is present, e.g. a `{"data":{}}` record.
    pub fn is_empty(&self) -> bool {
        self.frm_30.is_none() && self.frm_15.is_none()
    }

    pub fn fallback() -> Self {
        RateQuote {
            frm_30: Some("6.95".to_string()),
            frm_15: Some("6.12".to_string()),
        }
    }
}

// The provider has shipped rates both as "6.1" and 6.1.
fn rate_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(serde::de::Error::custom(format!(
            "unexpected rate value: {}",
            other
        ))),
    }
}

/// One adapter call's result, held in memory until the next refetch.
#[derive(Debug, Clone, Serialize)]
pub struct RateSuggestion {
    pub quote: RateQuote,
    pub fetched_at: DateTime<Utc>,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct ProxyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Option<RateQuote>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProxyResponse {
    pub fn ok(data: Option<RateQuote>) -> Self {
        ProxyResponse { success: true, data: Some(data), error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ProxyResponse { success: false, data: None, error: Some(message.into()) }
    }
}
