// src/services/amortization.rs
use log::debug;

use crate::models::{CostBreakdown, CostCategory, LoanInputs, INTEREST_COLOR, PRINCIPAL_COLOR};

fn valid_terms(principal: f64, annual_rate_percent: f64, term_years: f64) -> bool {
    principal.is_finite()
        && annual_rate_percent.is_finite()
        && term_years.is_finite()
        && principal > 0.0
        && annual_rate_percent >= 0.0
        && term_years > 0.0
}

/// Fixed-rate monthly payment. `None` when the terms cannot describe a loan.
pub fn compute_monthly_payment(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
) -> Option<f64> {
    if !valid_terms(principal, annual_rate_percent, term_years) {
        debug!(
            "Skipping payment calculation for invalid terms ({}, {}, {})",
            principal, annual_rate_percent, term_years
        );
        return None;
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let num_payments = term_years * 12.0;

    // (1 + 0)^n - 1 is zero, so the general formula cannot handle interest-free loans
    if monthly_rate == 0.0 {
        return Some(principal / num_payments);
    }

    // (1 + r)^n - 1 without cancellation; rates too small to register are interest-free
    let growth_minus_one = (num_payments * monthly_rate.ln_1p()).exp_m1();
    let payment = if growth_minus_one == 0.0 {
        principal / num_payments
    } else {
        principal * monthly_rate * (growth_minus_one + 1.0) / growth_minus_one
    };

    if !payment.is_finite() {
        debug!(
            "Payment overflowed for terms ({}, {}, {})",
            principal, annual_rate_percent, term_years
        );
        return None;
    }
    Some(payment)
}

pub fn compute_cost_breakdown(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
) -> Option<CostBreakdown> {
    let monthly_payment = compute_monthly_payment(principal, annual_rate_percent, term_years)?;
    let total_payments = monthly_payment * term_years * 12.0;
    let total_interest = total_payments - principal;
    if !total_payments.is_finite() || !total_interest.is_finite() {
        return None;
    }

    Some(CostBreakdown {
        principal,
        monthly_payment,
        total_interest,
        total_cost: total_payments,
        categories: [
            CostCategory { name: "Principal", value: principal, color: PRINCIPAL_COLOR },
            CostCategory { name: "Interest", value: total_interest, color: INTEREST_COLOR },
        ],
    })
}

pub fn breakdown_for(inputs: &LoanInputs) -> Option<CostBreakdown> {
    compute_cost_breakdown(inputs.principal, inputs.annual_rate_percent, inputs.term_years)
}
