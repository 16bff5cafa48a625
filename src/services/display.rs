// src/services/display.rs
use serde::Serialize;

use crate::models::CostBreakdown;

/// Two decimals with comma thousands separators, e.g. `796,405.71`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // -0.001 rounds to 0.00, which should not print as negative
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BreakdownDisplay {
    pub monthly_payment: String,
    pub principal: String,
    pub total_interest: String,
    pub total_cost: String,
}

impl From<&CostBreakdown> for BreakdownDisplay {
    fn from(b: &CostBreakdown) -> Self {
        BreakdownDisplay {
            monthly_payment: format_currency(b.monthly_payment),
            principal: format_currency(b.principal),
            total_interest: format_currency(b.total_interest),
            total_cost: format_currency(b.total_cost),
        }
    }
}
