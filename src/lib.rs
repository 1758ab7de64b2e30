//! propfirm: rule engine for funded-trading ("prop firm") accounts.
//!
//! Hexagonal architecture: the engine and its types in [`domain`], port traits
//! in [`ports`], file-backed implementations in [`adapters`], and the command
//! line front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
