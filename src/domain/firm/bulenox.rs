//! Bulenox: tier table, trailing evaluation, weekly capped payouts.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{PayoutCalc, PayoutOutcome};
use crate::domain::pnl::{DailyPnl, PnlEntry};
use crate::domain::rules::{
    AccountRules, CycleRequirements, MaxContracts, PayoutFrequency, WithdrawalRules,
};

const TIERS: [Tier; 5] = [
    tier(25_000, rules(1_500.0, 1_500.0, 500.0, 0.0, 1, MaxContracts::new(3, 30))),
    tier(50_000, rules(3_000.0, 2_500.0, 1_100.0, 0.0, 1, MaxContracts::new(7, 70))),
    tier(100_000, rules(6_000.0, 3_000.0, 2_200.0, 0.0, 1, MaxContracts::new(12, 120))),
    tier(150_000, rules(9_000.0, 4_500.0, 3_300.0, 0.0, 1, MaxContracts::new(15, 150))),
    tier(250_000, rules(15_000.0, 5_500.0, 4_500.0, 0.0, 1, MaxContracts::new(25, 250))),
];

const TAX_RATE: f64 = 0.10;
const SAFETY_MARGIN: f64 = 100.0;
const MIN_TRADING_DAYS: usize = 10;
const MIN_PAYOUT: f64 = 1_000.0;

fn payout_cap(size: u32) -> Option<f64> {
    match size {
        25_000 => Some(1_000.0),
        50_000 => Some(1_500.0),
        100_000 => Some(1_750.0),
        150_000 => Some(2_000.0),
        250_000 => Some(2_500.0),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bulenox;

impl FirmStrategy for Bulenox {
    fn name(&self) -> &'static str {
        "Bulenox"
    }

    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules> {
        tier::account_rules(&TIERS, profile)
    }

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules {
        if !profile.is_funded() {
            return WithdrawalRules::evaluation(TAX_RATE);
        }
        WithdrawalRules {
            tax_rate: TAX_RATE,
            requires_cycles: true,
            cycle_requirements: CycleRequirements {
                days_per_cycle: MIN_TRADING_DAYS as u32,
                min_daily_profit: 0.0,
                withdrawal_percentage: 100.0,
            },
            has_buffer: true,
            min_withdrawal: MIN_PAYOUT,
            max_withdrawal: tier::lookup(&TIERS, profile.size).and_then(|t| payout_cap(t.size)),
            frequency: PayoutFrequency::Weekly,
        }
    }

    fn buffer(&self, size: f64) -> f64 {
        tier::lookup(&TIERS, size)
            .map(|t| t.rules.max_drawdown + SAFETY_MARGIN)
            .unwrap_or(0.0)
    }

    fn payout_outcome(
        &self,
        profile: &AccountProfile,
        total_pnl: f64,
        total_withdrawals: f64,
        entries: &[PnlEntry],
    ) -> PayoutOutcome {
        let Some(t) = tier::lookup(&TIERS, profile.size) else {
            return PayoutOutcome::NotApplicable;
        };
        if !profile.is_funded() {
            return PayoutOutcome::NotApplicable;
        }

        let trading_days = DailyPnl::from_entries(entries).trading_days();
        let balance = profile.balance(total_pnl, total_withdrawals);

        PayoutCalc::new()
            .gate("trading days", trading_days >= MIN_TRADING_DAYS)
            .capacity("remaining profit", total_pnl - total_withdrawals)
            .capacity(
                "balance above buffer",
                balance - (profile.size + self.buffer(profile.size)),
            )
            .capacity_opt("payout cap", payout_cap(t.size))
            .minimum(MIN_PAYOUT)
            .outcome()
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool {
        if profile.is_funded() {
            return false;
        }
        tier::lookup(&TIERS, profile.size)
            .is_some_and(|t| Evaluation::TRAILING_PER_ENTRY.passes(profile.size, &t.rules, entries))
    }
}
