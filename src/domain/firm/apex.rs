//! Apex: tier table, trailing evaluation, buffered payouts for funded accounts.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{PayoutCalc, PayoutOutcome};
use crate::domain::pnl::{DailyPnl, PnlEntry};
use crate::domain::rules::{
    AccountRules, CycleRequirements, MaxContracts, PayoutFrequency, WithdrawalRules,
};

const TIERS: [Tier; 7] = [
    tier(25_000, rules(1_500.0, 1_500.0, 0.0, 0.0, 7, MaxContracts::new(4, 40))),
    tier(50_000, rules(3_000.0, 2_500.0, 0.0, 0.0, 7, MaxContracts::new(10, 100))),
    tier(75_000, rules(4_250.0, 2_750.0, 0.0, 0.0, 7, MaxContracts::new(12, 120))),
    tier(100_000, rules(6_000.0, 3_000.0, 0.0, 0.0, 7, MaxContracts::new(14, 140))),
    tier(150_000, rules(9_000.0, 5_000.0, 0.0, 0.0, 7, MaxContracts::new(17, 170))),
    tier(250_000, rules(15_000.0, 6_500.0, 0.0, 0.0, 7, MaxContracts::new(27, 270))),
    tier(300_000, rules(20_000.0, 7_500.0, 0.0, 0.0, 7, MaxContracts::new(35, 350))),
];

const TAX_RATE: f64 = 0.10;
const SAFETY_MARGIN: f64 = 100.0;
const CYCLE_DAYS: usize = 8;
const QUALIFYING_DAY_PROFIT: f64 = 50.0;
const FUNDED_CONSISTENCY_PCT: f64 = 30.0;
const MIN_PAYOUT: f64 = 500.0;

fn payout_cap(size: u32) -> Option<f64> {
    match size {
        25_000 => Some(1_500.0),
        50_000 => Some(2_000.0),
        75_000 => Some(2_250.0),
        100_000 => Some(2_500.0),
        150_000 => Some(2_750.0),
        250_000 => Some(3_000.0),
        300_000 => Some(3_500.0),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Apex;

impl FirmStrategy for Apex {
    fn name(&self) -> &'static str {
        "Apex"
    }

    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules> {
        tier::account_rules(&TIERS, profile)
    }

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules {
        let cap = tier::lookup(&TIERS, profile.size).and_then(|t| payout_cap(t.size));
        if !profile.is_funded() {
            return WithdrawalRules::evaluation(TAX_RATE);
        }
        WithdrawalRules {
            tax_rate: TAX_RATE,
            requires_cycles: true,
            cycle_requirements: CycleRequirements {
                days_per_cycle: CYCLE_DAYS as u32,
                min_daily_profit: QUALIFYING_DAY_PROFIT,
                withdrawal_percentage: 100.0,
            },
            has_buffer: true,
            min_withdrawal: MIN_PAYOUT,
            max_withdrawal: cap,
            frequency: PayoutFrequency::PerCycle,
        }
    }

    /// Drawdown plus a $100 margin must stay above the starting balance.
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

        let daily = DailyPnl::from_entries(entries);
        let balance = profile.balance(total_pnl, total_withdrawals);
        let floor = profile.size + self.buffer(profile.size);

        PayoutCalc::new()
            .gate(
                "qualifying days",
                daily.days_at_least(QUALIFYING_DAY_PROFIT) >= CYCLE_DAYS,
            )
            .gate(
                "consistency",
                daily.within_consistency(total_pnl, FUNDED_CONSISTENCY_PCT),
            )
            .capacity("remaining profit", total_pnl - total_withdrawals)
            .capacity("balance above buffer", balance - floor)
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
