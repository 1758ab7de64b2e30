//! TakeProfitTrader: end-of-day trailing evaluation and two funded plans.
//!
//! PRO accounts keep a buffer of one max drawdown above the starting balance
//! and withhold 20%. PRO+ accounts have no buffer and withhold 10%.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{PayoutCalc, PayoutOutcome};
use crate::domain::pnl::PnlEntry;
use crate::domain::program::{Program, TptPlan};
use crate::domain::rules::{AccountRules, MaxContracts, PayoutFrequency, WithdrawalRules};

const TIERS: [Tier; 5] = [
    tier(25_000, rules(1_500.0, 1_500.0, 0.0, 50.0, 5, MaxContracts::new(3, 30))),
    tier(50_000, rules(3_000.0, 2_000.0, 0.0, 50.0, 5, MaxContracts::new(6, 60))),
    tier(75_000, rules(4_500.0, 2_500.0, 0.0, 50.0, 5, MaxContracts::new(9, 90))),
    tier(100_000, rules(6_000.0, 3_000.0, 0.0, 50.0, 5, MaxContracts::new(12, 120))),
    tier(150_000, rules(9_000.0, 4_500.0, 0.0, 50.0, 5, MaxContracts::new(15, 150))),
];

const PRO_TAX_RATE: f64 = 0.20;
const PRO_PLUS_TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, Default)]
pub struct TakeProfitTrader;

impl TakeProfitTrader {
    pub fn plan(profile: &AccountProfile) -> TptPlan {
        match profile.program {
            Some(Program::TakeProfitTrader(plan)) => plan,
            _ => TptPlan::detect(&profile.keywords()),
        }
    }
}

impl FirmStrategy for TakeProfitTrader {
    fn name(&self) -> &'static str {
        "TakeProfitTrader"
    }

    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules> {
        let rules = tier::lookup(&TIERS, profile.size)?.rules;
        if !profile.is_funded() {
            return Some(rules);
        }
        Some(AccountRules {
            daily_loss_limit: 0.0,
            ..rules.funded()
        })
    }

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules {
        if !profile.is_funded() {
            return WithdrawalRules::evaluation(PRO_TAX_RATE);
        }
        match Self::plan(profile) {
            TptPlan::Pro => WithdrawalRules {
                tax_rate: PRO_TAX_RATE,
                has_buffer: true,
                frequency: PayoutFrequency::Daily,
                ..WithdrawalRules::default()
            },
            TptPlan::ProPlus => WithdrawalRules {
                tax_rate: PRO_PLUS_TAX_RATE,
                has_buffer: false,
                frequency: PayoutFrequency::Daily,
                ..WithdrawalRules::default()
            },
        }
    }

    fn buffer(&self, size: f64) -> f64 {
        tier::lookup(&TIERS, size)
            .map(|t| t.rules.max_drawdown)
            .unwrap_or(0.0)
    }

    fn payout_outcome(
        &self,
        profile: &AccountProfile,
        total_pnl: f64,
        total_withdrawals: f64,
        _entries: &[PnlEntry],
    ) -> PayoutOutcome {
        if !profile.is_funded() || tier::lookup(&TIERS, profile.size).is_none() {
            return PayoutOutcome::NotApplicable;
        }

        let balance = profile.balance(total_pnl, total_withdrawals);
        let floor = match Self::plan(profile) {
            TptPlan::Pro => profile.size + self.buffer(profile.size),
            TptPlan::ProPlus => profile.size,
        };

        PayoutCalc::new()
            .capacity("balance above floor", balance - floor)
            .outcome()
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool {
        if profile.is_funded() {
            return false;
        }
        tier::lookup(&TIERS, profile.size).is_some_and(|t| {
            Evaluation::TRAILING_END_OF_DAY.passes(profile.size, &t.rules, entries)
        })
    }
}
