//! Port traits between the engine and the outside world.

pub mod config_port;
pub mod ledger_port;
