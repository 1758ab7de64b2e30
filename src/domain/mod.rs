//! Core domain types and the rule engine.

pub mod account;
pub mod config_validation;
pub mod error;
pub mod firm;
pub mod payout;
pub mod pnl;
pub mod program;
pub mod rules;
