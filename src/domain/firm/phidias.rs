//! Phidias: static-drawdown evaluation, CASH and LIVE funded plans.
//!
//! EVAL and CASH share one tier table whose drawdown is measured from the
//! fixed starting balance. LIVE accounts skip evaluation and may only pay out
//! what sits above a running floor of starting balance plus $100.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{PayoutCalc, PayoutOutcome};
use crate::domain::pnl::PnlEntry;
use crate::domain::program::{PhidiasPlan, Program};
use crate::domain::rules::{AccountRules, MaxContracts, PayoutFrequency, WithdrawalRules};

const TIERS: [Tier; 4] = [
    tier(25_000, rules(1_500.0, 500.0, 0.0, 0.0, 1, MaxContracts::new(3, 30))),
    tier(50_000, rules(4_000.0, 2_500.0, 0.0, 0.0, 1, MaxContracts::new(10, 100))),
    tier(100_000, rules(6_000.0, 3_000.0, 0.0, 0.0, 1, MaxContracts::new(14, 140))),
    tier(150_000, rules(9_000.0, 4_500.0, 0.0, 0.0, 1, MaxContracts::new(17, 170))),
];

const CASH_TAX_RATE: f64 = 0.20;
const LIVE_TAX_RATE: f64 = 0.10;
const LIVE_FLOOR_MARGIN: f64 = 100.0;
const LIVE_MIN_WITHDRAWAL: f64 = 500.0;
const CASH_MIN_WITHDRAWAL: f64 = 500.0;
const VALIDATION_BONUS: f64 = 1_000.0;
const LIVE_CREDIT: f64 = 500.0;

/// Balance limits for the larger CASH accounts.
#[derive(Debug, Clone, Copy)]
struct CashLimits {
    /// Balance needed before a payout may be requested.
    request_min: f64,
    /// Balance that must remain after the payout.
    after_min: f64,
    /// Per-period ceiling.
    period_cap: f64,
}

fn cash_limits(size: u32) -> Option<CashLimits> {
    let (request_min, after_min, period_cap) = match size {
        50_000 => (52_600.0, 52_100.0, 2_000.0),
        100_000 => (103_700.0, 103_100.0, 2_500.0),
        150_000 => (154_500.0, 153_600.0, 2_750.0),
        _ => return None,
    };
    Some(CashLimits {
        request_min,
        after_min,
        period_cap,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Phidias;

impl Phidias {
    pub fn plan(profile: &AccountProfile) -> PhidiasPlan {
        match profile.program {
            Some(Program::Phidias(plan)) => plan,
            _ => PhidiasPlan::detect(&profile.keywords(), profile.account_type),
        }
    }

    /// Validated 25k CASH account. Evaluation accounts have not validated yet.
    fn is_cash_25k(profile: &AccountProfile) -> bool {
        profile.is_funded()
            && Self::plan(profile) == PhidiasPlan::Cash
            && tier::lookup(&TIERS, profile.size).is_some_and(|t| t.size == 25_000)
    }

    /// One-time credit paid when a 25k CASH account is validated.
    pub fn validation_bonus(&self, profile: &AccountProfile) -> f64 {
        if Self::is_cash_25k(profile) {
            VALIDATION_BONUS
        } else {
            0.0
        }
    }

    /// Credit owed to the sibling LIVE account once a 25k CASH account validates.
    pub fn live_credit(&self, profile: &AccountProfile) -> f64 {
        if Self::is_cash_25k(profile) {
            LIVE_CREDIT
        } else {
            0.0
        }
    }

    fn live_outcome(profile: &AccountProfile, total_pnl: f64, total_withdrawals: f64) -> PayoutOutcome {
        let balance = profile.balance(total_pnl, total_withdrawals);
        PayoutCalc::new()
            .capacity("balance above floor", balance - (profile.size + LIVE_FLOOR_MARGIN))
            .minimum(LIVE_MIN_WITHDRAWAL)
            .outcome()
    }

    fn cash_outcome(
        profile: &AccountProfile,
        size: u32,
        total_pnl: f64,
        total_withdrawals: f64,
    ) -> PayoutOutcome {
        let remaining = total_pnl - total_withdrawals;
        let Some(limits) = cash_limits(size) else {
            // 25k: unwithdrawn profit is free to leave the next day.
            return PayoutCalc::new()
                .capacity("remaining profit", remaining)
                .outcome();
        };

        let balance = profile.balance(total_pnl, total_withdrawals);
        PayoutCalc::new()
            .gate("request balance", balance >= limits.request_min)
            .capacity("remaining profit", remaining)
            .capacity("balance above minimum", balance - limits.after_min)
            .capacity("period cap", limits.period_cap)
            .minimum(CASH_MIN_WITHDRAWAL)
            .outcome()
    }
}

impl FirmStrategy for Phidias {
    fn name(&self) -> &'static str {
        "Phidias"
    }

    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules> {
        let rules = tier::lookup(&TIERS, profile.size)?.rules;
        match Self::plan(profile) {
            PhidiasPlan::Live => Some(AccountRules::instant(0.0, rules.max_contracts)),
            PhidiasPlan::Cash if profile.is_funded() => Some(rules.funded()),
            PhidiasPlan::Cash | PhidiasPlan::Eval => Some(rules),
        }
    }

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules {
        let plan = Self::plan(profile);
        if plan == PhidiasPlan::Eval || (plan == PhidiasPlan::Cash && !profile.is_funded()) {
            return WithdrawalRules::evaluation(CASH_TAX_RATE);
        }
        match plan {
            PhidiasPlan::Live => WithdrawalRules {
                tax_rate: LIVE_TAX_RATE,
                has_buffer: true,
                min_withdrawal: LIVE_MIN_WITHDRAWAL,
                frequency: PayoutFrequency::Daily,
                ..WithdrawalRules::default()
            },
            _ => {
                let limits = tier::lookup(&TIERS, profile.size).and_then(|t| cash_limits(t.size));
                WithdrawalRules {
                    tax_rate: CASH_TAX_RATE,
                    has_buffer: limits.is_some(),
                    min_withdrawal: if limits.is_some() { CASH_MIN_WITHDRAWAL } else { 0.0 },
                    max_withdrawal: limits.map(|l| l.period_cap),
                    frequency: if limits.is_some() {
                        PayoutFrequency::BiWeekly
                    } else {
                        PayoutFrequency::Daily
                    },
                    ..WithdrawalRules::default()
                }
            }
        }
    }

    fn buffer(&self, size: f64) -> f64 {
        if tier::lookup(&TIERS, size).is_some() {
            LIVE_FLOOR_MARGIN
        } else {
            0.0
        }
    }

    fn payout_outcome(
        &self,
        profile: &AccountProfile,
        total_pnl: f64,
        total_withdrawals: f64,
        _entries: &[PnlEntry],
    ) -> PayoutOutcome {
        let Some(t) = tier::lookup(&TIERS, profile.size) else {
            return PayoutOutcome::NotApplicable;
        };
        match Self::plan(profile) {
            PhidiasPlan::Live => Self::live_outcome(profile, total_pnl, total_withdrawals),
            PhidiasPlan::Cash if profile.is_funded() => {
                Self::cash_outcome(profile, t.size, total_pnl, total_withdrawals)
            }
            PhidiasPlan::Cash | PhidiasPlan::Eval => PayoutOutcome::NotApplicable,
        }
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool {
        if profile.is_funded() || Self::plan(profile) == PhidiasPlan::Live {
            return false;
        }
        tier::lookup(&TIERS, profile.size)
            .is_some_and(|t| Evaluation::STATIC_PER_ENTRY.passes(profile.size, &t.rules, entries))
    }
}
