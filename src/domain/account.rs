//! Account profile and the account aggregate.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::firm::{self, FirmId, FirmStrategy};
use super::payout::PayoutOutcome;
use super::pnl::{self, BalancePoint, DailyPnl, PnlEntry};
use super::program::{Keywords, Program};
use super::rules::{AccountRules, WithdrawalRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccountType {
    #[default]
    Eval,
    Funded,
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eval" | "evaluation" => Ok(AccountType::Eval),
            "funded" | "pa" => Ok(AccountType::Funded),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Eval => f.write_str("EVAL"),
            AccountType::Funded => f.write_str("FUNDED"),
        }
    }
}

/// The inputs every rule lookup is a pure function of.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountProfile {
    /// Initial balance; selects the rule tier.
    pub size: f64,
    pub account_type: AccountType,
    /// Explicit program; when absent the firm falls back to keyword detection.
    pub program: Option<Program>,
    pub name: String,
    pub notes: String,
}

impl AccountProfile {
    pub fn new(size: f64, account_type: AccountType) -> Self {
        AccountProfile {
            size,
            account_type,
            ..AccountProfile::default()
        }
    }

    pub fn eval(size: f64) -> Self {
        AccountProfile::new(size, AccountType::Eval)
    }

    pub fn funded(size: f64) -> Self {
        AccountProfile::new(size, AccountType::Funded)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_program(mut self, program: Program) -> Self {
        self.program = Some(program);
        self
    }

    pub fn is_funded(&self) -> bool {
        self.account_type == AccountType::Funded
    }

    pub fn keywords(&self) -> Keywords {
        Keywords::new(&self.name, &self.notes)
    }

    /// Current balance for the given lifetime totals.
    pub fn balance(&self, total_pnl: f64, total_withdrawals: f64) -> f64 {
        self.size + total_pnl - total_withdrawals
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Withdrawal {
    pub date: NaiveDate,
    pub amount: f64,
}

/// One tracked account with its ledger.
///
/// The program is resolved once here; rule lookups never re-read free text
/// when it is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub name: String,
    pub notes: String,
    pub firm: FirmId,
    pub size: f64,
    pub account_type: AccountType,
    pub program: Option<Program>,
    pub pnl_entries: Vec<PnlEntry>,
    pub withdrawals: Vec<Withdrawal>,
}

impl Account {
    pub fn new(
        firm: FirmId,
        size: f64,
        account_type: AccountType,
        name: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let notes = notes.into();
        let program = Program::detect(firm, account_type, &name, &notes);
        Account {
            name,
            notes,
            firm,
            size,
            account_type,
            program,
            pnl_entries: Vec::new(),
            withdrawals: Vec::new(),
        }
    }

    /// Overrides the detected program.
    pub fn with_program(mut self, program: Program) -> Self {
        self.program = Some(program);
        self
    }

    pub fn record_pnl(&mut self, date: NaiveDate, amount: f64) {
        self.pnl_entries.push(PnlEntry { date, amount });
    }

    pub fn record_withdrawal(&mut self, date: NaiveDate, amount: f64) {
        self.withdrawals.push(Withdrawal { date, amount });
    }

    pub fn total_pnl(&self) -> f64 {
        pnl::total(&self.pnl_entries)
    }

    pub fn total_withdrawals(&self) -> f64 {
        self.withdrawals.iter().map(|w| w.amount).sum()
    }

    pub fn balance(&self) -> f64 {
        self.size + self.total_pnl() - self.total_withdrawals()
    }

    pub fn daily_pnl(&self) -> DailyPnl {
        DailyPnl::from_entries(&self.pnl_entries)
    }

    /// Running balance over PnL entries and withdrawals, in date order.
    pub fn running_balance(&self) -> Vec<BalancePoint> {
        let mut steps = self.pnl_entries.clone();
        steps.extend(
            self.withdrawals
                .iter()
                .map(|w| PnlEntry::new(w.date, -w.amount)),
        );
        pnl::balance_curve(self.size, &steps)
    }

    /// Highest balance ever reached, the initial balance included.
    pub fn peak_balance(&self) -> f64 {
        self.running_balance()
            .last()
            .map(|p| p.peak)
            .unwrap_or(self.size)
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            size: self.size,
            account_type: self.account_type,
            program: self.program,
            name: self.name.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn strategy(&self) -> &'static dyn FirmStrategy {
        firm::strategy_for(self.firm)
    }

    pub fn account_rules(&self) -> Option<AccountRules> {
        self.strategy().account_rules(&self.profile())
    }

    pub fn withdrawal_rules(&self) -> WithdrawalRules {
        self.strategy().withdrawal_rules(&self.profile())
    }

    pub fn buffer(&self) -> f64 {
        self.strategy().buffer(self.size)
    }

    pub fn withdrawal_outcome(&self) -> PayoutOutcome {
        self.strategy().withdrawal_outcome(
            &self.profile(),
            self.total_pnl(),
            self.total_withdrawals(),
            &self.pnl_entries,
        )
    }

    pub fn available_for_withdrawal(&self) -> f64 {
        self.withdrawal_outcome().amount()
    }

    pub fn is_eligible_for_validation(&self) -> bool {
        self.strategy()
            .is_eligible_for_validation(&self.profile(), &self.pnl_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::program::PhidiasPlan;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn account_type_parses() {
        assert_eq!("EVAL".parse::<AccountType>(), Ok(AccountType::Eval));
        assert_eq!(" funded ".parse::<AccountType>(), Ok(AccountType::Funded));
        assert!("demo".parse::<AccountType>().is_err());
    }

    #[test]
    fn account_type_default_is_eval() {
        assert_eq!(AccountType::default(), AccountType::Eval);
        assert!(!AccountProfile::default().is_funded());
    }

    #[test]
    fn program_resolved_at_creation() {
        let account = Account::new(
            FirmId::Phidias,
            25_000.0,
            AccountType::Funded,
            "Phidias #3",
            "live since June",
        );
        assert_eq!(account.program, Some(Program::Phidias(PhidiasPlan::Live)));
    }

    #[test]
    fn explicit_program_overrides_detection() {
        let account = Account::new(FirmId::Phidias, 25_000.0, AccountType::Funded, "live", "")
            .with_program(Program::Phidias(PhidiasPlan::Cash));
        assert_eq!(account.profile().program, Some(Program::Phidias(PhidiasPlan::Cash)));
    }

    #[test]
    fn totals_and_balance() {
        let mut account = Account::new(FirmId::TopStep, 50_000.0, AccountType::Funded, "", "");
        account.record_pnl(day(1), 800.0);
        account.record_pnl(day(2), -200.0);
        account.record_withdrawal(day(3), 250.0);
        assert!((account.total_pnl() - 600.0).abs() < 1e-9);
        assert!((account.total_withdrawals() - 250.0).abs() < 1e-9);
        assert!((account.balance() - 50_350.0).abs() < 1e-9);
    }

    #[test]
    fn running_balance_includes_withdrawals() {
        let mut account = Account::new(FirmId::Apex, 50_000.0, AccountType::Funded, "", "");
        account.record_pnl(day(2), 1_000.0);
        account.record_withdrawal(day(3), 500.0);
        account.record_pnl(day(1), 200.0);
        let curve = account.running_balance();
        assert_eq!(curve.len(), 3);
        assert!((curve[2].balance - 50_700.0).abs() < 1e-9);
        assert!((account.peak_balance() - 51_200.0).abs() < 1e-9);
    }

    #[test]
    fn peak_of_empty_account_is_size() {
        let account = Account::new(FirmId::Lucid, 25_000.0, AccountType::Eval, "", "");
        assert!((account.peak_balance() - 25_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn profile_balance() {
        let profile = AccountProfile::funded(100_000.0);
        assert!((profile.balance(2_500.0, 1_000.0) - 101_500.0).abs() < 1e-9);
    }

    #[test]
    fn account_delegates_to_firm() {
        let mut account = Account::new(FirmId::Phidias, 25_000.0, AccountType::Funded, "", "cash");
        account.record_pnl(day(1), 1_000.0);
        assert!((account.available_for_withdrawal() - 1_000.0).abs() < 1e-9);
        assert!(!account.is_eligible_for_validation());
        assert!(account.account_rules().is_some());
    }
}
