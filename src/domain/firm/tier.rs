//! Size-tier tables and the evaluation check they feed.

use tracing::trace;

use super::tier_key;
use crate::domain::account::AccountProfile;
use crate::domain::pnl::{self, DailyPnl, DrawdownKind, PnlEntry};
use crate::domain::rules::{AccountRules, MaxContracts};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Tier {
    pub size: u32,
    pub rules: AccountRules,
}

pub(crate) const fn tier(size: u32, rules: AccountRules) -> Tier {
    Tier { size, rules }
}

pub(crate) const fn rules(
    profit_target: f64,
    max_drawdown: f64,
    daily_loss_limit: f64,
    consistency_rule: f64,
    min_trading_days: u32,
    max_contracts: MaxContracts,
) -> AccountRules {
    AccountRules {
        profit_target,
        max_drawdown,
        daily_loss_limit,
        consistency_rule,
        min_trading_days,
        max_contracts,
    }
}

pub(crate) fn lookup(table: &[Tier], size: f64) -> Option<&Tier> {
    let key = tier_key(size)?;
    table.iter().find(|t| t.size == key)
}

/// Tier rules, with evaluation-only fields cleared for funded accounts.
pub(crate) fn account_rules(table: &[Tier], profile: &AccountProfile) -> Option<AccountRules> {
    let rules = lookup(table, profile.size)?.rules;
    if profile.is_funded() {
        Some(rules.funded())
    } else {
        Some(rules)
    }
}

/// How an evaluation walks the ledger.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluation {
    pub drawdown: DrawdownKind,
    /// Fold one step per calendar day instead of one per raw entry.
    pub end_of_day: bool,
}

impl Evaluation {
    pub const TRAILING_PER_ENTRY: Evaluation = Evaluation {
        drawdown: DrawdownKind::Trailing,
        end_of_day: false,
    };
    pub const TRAILING_END_OF_DAY: Evaluation = Evaluation {
        drawdown: DrawdownKind::Trailing,
        end_of_day: true,
    };
    pub const STATIC_PER_ENTRY: Evaluation = Evaluation {
        drawdown: DrawdownKind::Static,
        end_of_day: false,
    };

    /// Profit target, trading days, consistency and a never-breached drawdown.
    pub fn passes(&self, size: f64, rules: &AccountRules, entries: &[PnlEntry]) -> bool {
        if entries.is_empty() {
            return false;
        }

        let daily = DailyPnl::from_entries(entries);
        let total = daily.total();
        if total < rules.profit_target {
            trace!(total, target = rules.profit_target, "profit target not met");
            return false;
        }
        if daily.trading_days() < rules.min_trading_days as usize {
            trace!(days = daily.trading_days(), "not enough trading days");
            return false;
        }
        if !daily.within_consistency(total, rules.consistency_rule) {
            trace!(best = ?daily.best_day(), total, "consistency rule failed");
            return false;
        }

        let curve = if self.end_of_day {
            pnl::daily_balance_curve(size, &daily)
        } else {
            pnl::balance_curve(size, entries)
        };
        if let Some(breach) = pnl::first_breach(size, &curve, self.drawdown, rules.max_drawdown) {
            trace!(date = %breach.date, balance = breach.balance, "drawdown breached");
            return false;
        }
        true
    }
}
