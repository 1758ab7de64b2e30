#![allow(dead_code)]

use chrono::NaiveDate;
use propfirm::domain::account::{Account, AccountType, Withdrawal};
use propfirm::domain::error::PropfirmError;
use propfirm::domain::firm::FirmId;
use propfirm::domain::pnl::PnlEntry;
use propfirm::ports::ledger_port::LedgerPort;
use std::collections::HashMap;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// One entry per consecutive calendar day starting at `start`.
pub fn daily_entries(start: &str, amounts: &[f64]) -> Vec<PnlEntry> {
    let first = date(start);
    amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| PnlEntry::new(first + chrono::Duration::days(i as i64), amount))
        .collect()
}

pub fn make_account(
    firm: FirmId,
    size: f64,
    account_type: AccountType,
    name: &str,
    notes: &str,
    amounts: &[f64],
) -> Account {
    let mut account = Account::new(firm, size, account_type, name, notes);
    for entry in daily_entries("2024-03-04", amounts) {
        account.record_pnl(entry.date, entry.amount);
    }
    account
}

pub struct MockLedgerPort {
    pub pnl: HashMap<String, Vec<PnlEntry>>,
    pub withdrawals: HashMap<String, Vec<Withdrawal>>,
    pub errors: HashMap<String, String>,
}

impl MockLedgerPort {
    pub fn new() -> Self {
        Self {
            pnl: HashMap::new(),
            withdrawals: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_pnl(mut self, stem: &str, entries: Vec<PnlEntry>) -> Self {
        self.pnl.insert(stem.to_string(), entries);
        self
    }

    pub fn with_withdrawal(mut self, stem: &str, on: &str, amount: f64) -> Self {
        self.withdrawals
            .entry(stem.to_string())
            .or_default()
            .push(Withdrawal {
                date: date(on),
                amount,
            });
        self
    }

    pub fn with_error(mut self, stem: &str, reason: &str) -> Self {
        self.errors.insert(stem.to_string(), reason.to_string());
        self
    }
}

impl LedgerPort for MockLedgerPort {
    fn load_pnl(&self, stem: &str) -> Result<Vec<PnlEntry>, PropfirmError> {
        if let Some(reason) = self.errors.get(stem) {
            return Err(PropfirmError::Ledger {
                reason: reason.clone(),
            });
        }
        Ok(self.pnl.get(stem).cloned().unwrap_or_default())
    }

    fn load_withdrawals(&self, stem: &str) -> Result<Vec<Withdrawal>, PropfirmError> {
        Ok(self.withdrawals.get(stem).cloned().unwrap_or_default())
    }
}
