//! Account configuration validation.
//!
//! Validates the `[account]` and `[ledger]` sections before any ledger is read.

use crate::domain::account::AccountType;
use crate::domain::error::PropfirmError;
use crate::domain::firm::FirmId;
use crate::domain::program::Program;
use crate::ports::config_port::ConfigPort;
use tracing::warn;

pub fn validate_account_config(config: &dyn ConfigPort) -> Result<(), PropfirmError> {
    let firm = validate_firm(config)?;
    validate_size(config)?;
    validate_account_type(config)?;
    validate_program(config, firm)?;
    validate_ledger(config)?;
    Ok(())
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_firm(config: &dyn ConfigPort) -> Result<FirmId, PropfirmError> {
    let value = non_empty(config, "account", "firm")
        .ok_or_else(|| PropfirmError::missing("account", "firm"))?;
    let firm = FirmId::resolve(&value);
    if firm == FirmId::Default && !value.eq_ignore_ascii_case("default") {
        warn!(firm = %value, "unknown firm, default rules apply");
    }
    Ok(firm)
}

fn validate_size(config: &dyn ConfigPort) -> Result<(), PropfirmError> {
    let value = non_empty(config, "account", "size")
        .ok_or_else(|| PropfirmError::missing("account", "size"))?;
    match value.parse::<f64>() {
        Ok(size) if size.is_finite() && size > 0.0 => Ok(()),
        Ok(_) => Err(PropfirmError::invalid("account", "size", "size must be positive")),
        Err(_) => Err(PropfirmError::invalid(
            "account",
            "size",
            format!("'{}' is not a number", value),
        )),
    }
}

fn validate_account_type(config: &dyn ConfigPort) -> Result<(), PropfirmError> {
    match non_empty(config, "account", "type") {
        None => Ok(()),
        Some(value) => value
            .parse::<AccountType>()
            .map(|_| ())
            .map_err(|reason| PropfirmError::invalid("account", "type", reason)),
    }
}

fn validate_program(config: &dyn ConfigPort, firm: FirmId) -> Result<(), PropfirmError> {
    let Some(value) = non_empty(config, "account", "program") else {
        return Ok(());
    };
    if Program::parse(firm, &value).is_none() {
        return Err(PropfirmError::invalid(
            "account",
            "program",
            format!("'{}' is not a {} program", value, firm),
        ));
    }
    Ok(())
}

fn validate_ledger(config: &dyn ConfigPort) -> Result<(), PropfirmError> {
    if non_empty(config, "ledger", "path").is_some() && non_empty(config, "ledger", "stem").is_none() {
        return Err(PropfirmError::missing("ledger", "stem"));
    }
    Ok(())
}
