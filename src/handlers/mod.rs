// src/handlers/mod.rs
pub mod calculate;
pub mod error;
pub mod identity;
pub mod rates;
