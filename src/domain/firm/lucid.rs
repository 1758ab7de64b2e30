//! Lucid: FLEX, PRO, DIRECT and LIVE plans.
//!
//! Profit split is tiered over lifetime profit rather than per payout: the
//! first $10,000 pays in full, the rest at 90%. FLEX and PRO payouts follow a
//! six-step cap schedule; DIRECT and LIVE are uncapped once the day-count and
//! consistency gates pass.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{self, PayoutCalc, PayoutOutcome};
use crate::domain::pnl::{DailyPnl, PnlEntry};
use crate::domain::program::{LucidPlan, Program};
use crate::domain::rules::{
    AccountRules, CycleRequirements, MaxContracts, PayoutFrequency, WithdrawalRules,
};

const TIERS: [Tier; 4] = [
    tier(25_000, rules(1_250.0, 1_000.0, 0.0, 50.0, 2, MaxContracts::new(2, 20))),
    tier(50_000, rules(3_000.0, 2_000.0, 0.0, 50.0, 2, MaxContracts::new(4, 40))),
    tier(100_000, rules(6_000.0, 3_000.0, 0.0, 50.0, 2, MaxContracts::new(8, 80))),
    tier(150_000, rules(9_000.0, 4_500.0, 0.0, 50.0, 2, MaxContracts::new(12, 120))),
];

const FULL_SPLIT_LIMIT: f64 = 10_000.0;
const REDUCED_SPLIT: f64 = 0.90;
const MIN_PAYOUT: f64 = 500.0;
const FLEX_QUALIFYING_DAYS: usize = 5;
const DIRECT_PROFITABLE_DAYS: usize = 8;
const DIRECT_CONSISTENCY_PCT: f64 = 20.0;

/// Minimum net for a FLEX/PRO day to count.
fn min_daily_profit(size: u32) -> f64 {
    match size {
        25_000 => 100.0,
        50_000 => 150.0,
        100_000 => 200.0,
        _ => 250.0,
    }
}

fn payout_schedule(size: u32) -> &'static [f64] {
    match size {
        25_000 => &[1_000.0, 1_000.0, 1_250.0, 1_250.0, 1_500.0, 1_500.0],
        50_000 => &[1_500.0, 1_500.0, 2_000.0, 2_000.0, 2_500.0, 2_500.0],
        100_000 => &[2_000.0, 2_500.0, 2_500.0, 3_000.0, 3_000.0, 3_500.0],
        _ => &[2_500.0, 3_000.0, 3_000.0, 3_500.0, 3_500.0, 4_000.0],
    }
}

fn pro_consistency_pct(size: u32) -> f64 {
    if size <= 50_000 { 35.0 } else { 40.0 }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lucid;

impl Lucid {
    pub fn plan(profile: &AccountProfile) -> LucidPlan {
        match profile.program {
            Some(Program::Lucid(plan)) => plan,
            _ => LucidPlan::detect(&profile.keywords()),
        }
    }

    /// Trader's share of `profit` under the lifetime split.
    pub fn trader_share(profit: f64) -> f64 {
        if profit <= 0.0 {
            return 0.0;
        }
        let full = profit.min(FULL_SPLIT_LIMIT);
        let reduced = (profit - FULL_SPLIT_LIMIT).max(0.0) * REDUCED_SPLIT;
        full + reduced
    }

    /// Cap for the next payout; `None` once all six payouts are used.
    pub fn flex_cap(size: u32, total_withdrawals: f64) -> Option<f64> {
        let index = payout::approximate_payout_index(total_withdrawals);
        payout_schedule(size).get(index).copied()
    }
}

impl FirmStrategy for Lucid {
    fn name(&self) -> &'static str {
        "Lucid"
    }

    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules> {
        let rules = tier::lookup(&TIERS, profile.size)?.rules;
        if Self::plan(profile).skips_evaluation() {
            return Some(AccountRules::instant(rules.max_drawdown, rules.max_contracts));
        }
        if profile.is_funded() {
            Some(rules.funded())
        } else {
            Some(rules)
        }
    }

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules {
        let plan = Self::plan(profile);
        if !plan.skips_evaluation() && !profile.is_funded() {
            return WithdrawalRules::evaluation(1.0 - REDUCED_SPLIT);
        }
        let Some(t) = tier::lookup(&TIERS, profile.size) else {
            return WithdrawalRules::evaluation(1.0 - REDUCED_SPLIT);
        };
        let cycle_requirements = if plan.skips_evaluation() {
            CycleRequirements {
                days_per_cycle: DIRECT_PROFITABLE_DAYS as u32,
                min_daily_profit: 0.0,
                withdrawal_percentage: 100.0,
            }
        } else {
            CycleRequirements {
                days_per_cycle: FLEX_QUALIFYING_DAYS as u32,
                min_daily_profit: min_daily_profit(t.size),
                withdrawal_percentage: 100.0,
            }
        };
        WithdrawalRules {
            tax_rate: 1.0 - REDUCED_SPLIT,
            requires_cycles: true,
            cycle_requirements,
            has_buffer: false,
            min_withdrawal: MIN_PAYOUT,
            max_withdrawal: if plan.skips_evaluation() {
                None
            } else {
                payout_schedule(t.size).last().copied()
            },
            frequency: PayoutFrequency::PerCycle,
        }
    }

    fn buffer(&self, _size: f64) -> f64 {
        0.0
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
        let plan = Self::plan(profile);
        if !plan.skips_evaluation() && !profile.is_funded() {
            return PayoutOutcome::NotApplicable;
        }

        let daily = DailyPnl::from_entries(entries);
        let share = Self::trader_share(total_pnl - total_withdrawals);

        let calc = match plan {
            LucidPlan::Direct | LucidPlan::Live => PayoutCalc::new()
                .gate(
                    "profitable days",
                    daily.profitable_days() >= DIRECT_PROFITABLE_DAYS,
                )
                .gate(
                    "consistency",
                    daily.within_consistency(total_pnl, DIRECT_CONSISTENCY_PCT),
                ),
            LucidPlan::Flex | LucidPlan::Pro => {
                let mut calc = PayoutCalc::new().gate(
                    "qualifying days",
                    daily.days_at_least(min_daily_profit(t.size)) >= FLEX_QUALIFYING_DAYS,
                );
                if plan == LucidPlan::Pro {
                    calc = calc.gate(
                        "consistency",
                        daily.within_consistency(total_pnl, pro_consistency_pct(t.size)),
                    );
                }
                let cap = Self::flex_cap(t.size, total_withdrawals);
                calc.gate("payouts remaining", cap.is_some())
                    .capacity_opt("payout cap", cap)
            }
        };

        calc.capacity("profit split", share)
            .minimum(MIN_PAYOUT)
            .outcome()
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool {
        if profile.is_funded() || Self::plan(profile).skips_evaluation() {
            return false;
        }
        tier::lookup(&TIERS, profile.size)
            .is_some_and(|t| Evaluation::TRAILING_PER_ENTRY.passes(profile.size, &t.rules, entries))
    }
}
