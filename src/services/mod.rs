// src/services/mod.rs
pub mod amortization;
pub mod calculator;
pub mod display;
pub mod identity;
pub mod rates;
