// src/services/calculator.rs
use log::{debug, info};

use crate::models::{CostBreakdown, LoanInputs, RateSuggestion};
use crate::services::amortization::breakdown_for;
use crate::services::rates::RatesClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTerm {
    ThirtyYear,
    FifteenYear,
}

/// Form state behind the calculator page.
///
/// Editing a field never clears the last breakdown. It stays on screen until the next
/// successful [`CalculatorSession::calculate`], and [`CalculatorSession::is_stale`]
/// reports when it no longer matches the fields.
#[derive(Debug, Default)]
pub struct CalculatorSession {
    principal: String,
    rate: String,
    term: String,
    breakdown: Option<CostBreakdown>,
    calculated_from: Option<LoanInputs>,
    suggestion: Option<RateSuggestion>,
}

impl CalculatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_principal(&mut self, value: impl Into<String>) {
        self.principal = value.into();
    }

    pub fn set_rate(&mut self, value: impl Into<String>) {
        self.rate = value.into();
    }

    pub fn set_term(&mut self, value: impl Into<String>) {
        self.term = value.into();
    }

    pub fn rate(&self) -> &str {
        &self.rate
    }

    pub fn inputs(&self) -> Option<LoanInputs> {
        LoanInputs::from_fields(&self.principal, &self.rate, &self.term)
    }

    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        self.breakdown.as_ref()
    }

    pub fn suggestion(&self) -> Option<&RateSuggestion> {
        self.suggestion.as_ref()
    }

    /// Recomputes from the current fields. Invalid fields leave the previous
    /// breakdown in place and return `None`.
    pub fn calculate(&mut self) -> Option<&CostBreakdown> {
        let inputs = self.inputs()?;
        let breakdown = breakdown_for(&inputs)?;
        info!(
            "Calculated monthly payment {:.2} for {:?}",
            breakdown.monthly_payment, inputs
        );
        self.calculated_from = Some(inputs);
        self.breakdown = Some(breakdown);
        self.breakdown.as_ref()
    }

    pub fn is_stale(&self) -> bool {
        match (&self.breakdown, self.calculated_from) {
            (Some(_), Some(from)) => self.inputs() != Some(from),
            _ => false,
        }
    }

    pub async fn load_rates(&mut self, client: &RatesClient) -> &RateSuggestion {
        let suggestion = client.fetch_suggestion().await;
        debug!("Loaded rate suggestion: {:?}", suggestion);
        self.suggestion.insert(suggestion)
    }

    /// Copies the suggested rate for `term` into the rate field.
    pub fn apply_suggested_rate(&mut self, term: RateTerm) -> bool {
        let rate = self.suggestion.as_ref().and_then(|s| match term {
            RateTerm::ThirtyYear => s.quote.frm_30.clone(),
            RateTerm::FifteenYear => s.quote.frm_15.clone(),
        });

        match rate {
            Some(rate) => {
                self.rate = rate;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rates::test_upstream::{dead_url, serve, url};
    use warp::http::StatusCode;

    fn filled(principal: &str, rate: &str, term: &str) -> CalculatorSession {
        let mut session = CalculatorSession::new();
        session.set_principal(principal);
        session.set_rate(rate);
        session.set_term(term);
        session
    }

    #[test]
    fn calculate_stores_breakdown() {
        let mut session = filled("350000", "6.5", "30");
        let payment = session.calculate().map(|b| b.monthly_payment).unwrap();
        assert!((payment - 2212.24).abs() < 0.01);
        assert!(session.breakdown().is_some());
        assert!(!session.is_stale());
    }

    #[test]
    fn nothing_to_show_before_valid_input() {
        let mut session = filled("0", "6.5", "30");
        assert!(session.calculate().is_none());
        assert!(session.breakdown().is_none());
    }

    #[test]
    fn invalid_input_keeps_previous_breakdown() {
        let mut session = filled("350000", "6.5", "30");
        let first = session.calculate().cloned().unwrap();

        session.set_rate("six");
        assert!(session.calculate().is_none());
        assert_eq!(session.breakdown(), Some(&first));

        session.set_rate("6.5");
        session.set_term("0");
        assert!(session.calculate().is_none());
        assert_eq!(session.breakdown(), Some(&first));
    }

    #[test]
    fn editing_marks_breakdown_stale_without_clearing() {
        let mut session = filled("350000", "6.5", "30");
        session.calculate();

        session.set_principal("400000");
        assert!(session.is_stale());
        assert_eq!(session.breakdown().map(|b| b.principal), Some(350_000.0));

        session.calculate();
        assert!(!session.is_stale());
        assert_eq!(session.breakdown().map(|b| b.principal), Some(400_000.0));
    }

    #[test]
    fn apply_without_suggestion_does_nothing() {
        let mut session = filled("350000", "6.5", "30");
        assert!(!session.apply_suggested_rate(RateTerm::ThirtyYear));
        assert_eq!(session.rate(), "6.5");
    }

    #[tokio::test]
    async fn suggested_rate_fills_rate_field() {
        let addr = serve(StatusCode::OK, r#"[{"data":{"frm_30":"6.1","frm_15":"5.4"}}]"#).await;
        let client = RatesClient::new(url(addr), "test-key");
        let mut session = filled("350000", "", "15");

        assert!(!session.load_rates(&client).await.fallback);
        assert!(session.apply_suggested_rate(RateTerm::FifteenYear));
        assert_eq!(session.rate(), "5.4");
        assert!(session.calculate().is_some());
    }

    #[tokio::test]
    async fn empty_record_still_fills_rate_field() {
        let addr = serve(StatusCode::OK, r#"[{"data":{}}]"#).await;
        let client = RatesClient::new(url(addr), "test-key");
        let mut session = CalculatorSession::new();

        assert!(session.load_rates(&client).await.fallback);
        assert!(session.apply_suggested_rate(RateTerm::FifteenYear));
        assert_eq!(session.rate(), "6.12");
    }

    #[tokio::test]
    async fn failed_fetch_suggests_default_rates() {
        let client = RatesClient::new(dead_url(), "test-key");
        let mut session = CalculatorSession::new();

        let suggestion = session.load_rates(&client).await;
        assert!(suggestion.fallback);

        assert!(session.apply_suggested_rate(RateTerm::ThirtyYear));
        assert_eq!(session.rate(), "6.95");
    }
}
