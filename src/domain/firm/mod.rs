//! Firm strategies and the firm selector.
//!
//! The firm set is closed. Each firm is a stateless unit struct held in a
//! `static`; [`strategy_for`] is a lookup over those statics, so the selector
//! hands out the same instance for the life of the process without locking.

mod apex;
mod bulenox;
mod default;
mod lucid;
mod phidias;
mod take_profit_trader;
mod tier;
mod topstep;
mod tradeify;

pub use apex::Apex;
pub use bulenox::Bulenox;
pub use default::DefaultFirm;
pub use lucid::Lucid;
pub use phidias::Phidias;
pub use take_profit_trader::TakeProfitTrader;
pub use topstep::TopStep;
pub use tradeify::Tradeify;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::account::AccountProfile;
use super::payout::PayoutOutcome;
use super::pnl::PnlEntry;
use super::rules::{AccountRules, WithdrawalRules};

/// The operation set every firm implements.
///
/// All methods are pure: identical arguments give identical answers, and
/// inputs that do not apply produce `None`, `0.0` or `false` rather than an
/// error.
pub trait FirmStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the firm offers no account of `profile.size`.
    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules>;

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules;

    /// Equity that must stay in the account above its initial balance.
    fn buffer(&self, size: f64) -> f64;

    /// The firm's own payout computation; callers use [`withdrawal_outcome`].
    ///
    /// [`withdrawal_outcome`]: FirmStrategy::withdrawal_outcome
    fn payout_outcome(
        &self,
        profile: &AccountProfile,
        total_pnl: f64,
        total_withdrawals: f64,
        entries: &[PnlEntry],
    ) -> PayoutOutcome;

    /// Why the available amount is what it is.
    ///
    /// An account with no trading history has nothing to withdraw, whatever
    /// totals it reports.
    fn withdrawal_outcome(
        &self,
        profile: &AccountProfile,
        total_pnl: f64,
        total_withdrawals: f64,
        entries: &[PnlEntry],
    ) -> PayoutOutcome {
        match self.payout_outcome(profile, total_pnl, total_withdrawals, entries) {
            PayoutOutcome::NotApplicable => PayoutOutcome::NotApplicable,
            _ if entries.is_empty() => PayoutOutcome::Blocked {
                gate: "trading history",
            },
            outcome => outcome,
        }
    }

    fn available_for_withdrawal(
        &self,
        profile: &AccountProfile,
        total_pnl: f64,
        total_withdrawals: f64,
        entries: &[PnlEntry],
    ) -> f64 {
        self.withdrawal_outcome(profile, total_pnl, total_withdrawals, entries)
            .amount()
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FirmId {
    TopStep,
    Apex,
    Bulenox,
    TakeProfitTrader,
    Phidias,
    Lucid,
    Tradeify,
    Default,
}

impl FirmId {
    pub const ALL: [FirmId; 8] = [
        FirmId::TopStep,
        FirmId::Apex,
        FirmId::Bulenox,
        FirmId::TakeProfitTrader,
        FirmId::Phidias,
        FirmId::Lucid,
        FirmId::Tradeify,
        FirmId::Default,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FirmId::TopStep => "topstep",
            FirmId::Apex => "apex",
            FirmId::Bulenox => "bulenox",
            FirmId::TakeProfitTrader => "takeprofittrader",
            FirmId::Phidias => "phidias",
            FirmId::Lucid => "lucid",
            FirmId::Tradeify => "tradeify",
            FirmId::Default => "default",
        }
    }

    /// Resolves an identifier, falling back to [`FirmId::Default`].
    pub fn resolve(identifier: &str) -> FirmId {
        identifier.parse().unwrap_or_else(|_| {
            debug!(identifier, "unknown firm identifier, using default rules");
            FirmId::Default
        })
    }
}

impl FromStr for FirmId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match key.as_str() {
            "topstep" => Ok(FirmId::TopStep),
            "apex" | "apextraderfunding" => Ok(FirmId::Apex),
            "bulenox" => Ok(FirmId::Bulenox),
            "takeprofittrader" | "takeprofit" | "tpt" => Ok(FirmId::TakeProfitTrader),
            "phidias" => Ok(FirmId::Phidias),
            "lucid" | "lucidtrading" => Ok(FirmId::Lucid),
            "tradeify" => Ok(FirmId::Tradeify),
            "default" => Ok(FirmId::Default),
            _ => Err(format!("unknown firm '{}'", s)),
        }
    }
}

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(strategy_for(*self).name())
    }
}

static TOPSTEP: TopStep = TopStep;
static APEX: Apex = Apex;
static BULENOX: Bulenox = Bulenox;
static TAKE_PROFIT_TRADER: TakeProfitTrader = TakeProfitTrader;
static PHIDIAS: Phidias = Phidias;
static LUCID: Lucid = Lucid;
static TRADEIFY: Tradeify = Tradeify;
static DEFAULT: DefaultFirm = DefaultFirm;

pub fn strategy_for(firm: FirmId) -> &'static dyn FirmStrategy {
    match firm {
        FirmId::TopStep => &TOPSTEP,
        FirmId::Apex => &APEX,
        FirmId::Bulenox => &BULENOX,
        FirmId::TakeProfitTrader => &TAKE_PROFIT_TRADER,
        FirmId::Phidias => &PHIDIAS,
        FirmId::Lucid => &LUCID,
        FirmId::Tradeify => &TRADEIFY,
        FirmId::Default => &DEFAULT,
    }
}

/// Strategy for a free-form firm identifier; unknown names get the default.
pub fn resolve(identifier: &str) -> &'static dyn FirmStrategy {
    strategy_for(FirmId::resolve(identifier))
}

/// Sizes are matched to tiers by whole dollars.
pub(crate) fn tier_key(size: f64) -> Option<u32> {
    if !size.is_finite() || size <= 0.0 {
        return None;
    }
    Some(size.round() as u32)
}
