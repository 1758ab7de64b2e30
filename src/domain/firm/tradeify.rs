//! Tradeify: GROWTH, SELECT (Flex or Daily payouts) and LIGHTNING.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{self, PayoutCalc, PayoutOutcome};
use crate::domain::pnl::{DailyPnl, PnlEntry};
use crate::domain::program::{Program, SelectOption, TradeifyPlan};
use crate::domain::rules::{
    AccountRules, CycleRequirements, MaxContracts, PayoutFrequency, WithdrawalRules,
};

const GROWTH: [Tier; 3] = [
    tier(50_000, rules(3_000.0, 2_000.0, 1_250.0, 0.0, 1, MaxContracts::new(4, 40))),
    tier(100_000, rules(6_000.0, 3_500.0, 2_500.0, 0.0, 1, MaxContracts::new(8, 80))),
    tier(150_000, rules(9_000.0, 5_000.0, 3_750.0, 0.0, 1, MaxContracts::new(12, 120))),
];

const SELECT: [Tier; 3] = [
    tier(50_000, rules(2_500.0, 2_000.0, 0.0, 40.0, 3, MaxContracts::new(4, 40))),
    tier(100_000, rules(6_000.0, 3_000.0, 0.0, 40.0, 3, MaxContracts::new(8, 80))),
    tier(150_000, rules(9_000.0, 4_500.0, 0.0, 40.0, 3, MaxContracts::new(12, 120))),
];

const LIGHTNING_DRAWDOWN: [(u32, f64); 3] = [(50_000, 2_000.0), (100_000, 3_500.0), (150_000, 5_250.0)];

const TAX_RATE: f64 = 0.10;
const SAFETY_MARGIN: f64 = 100.0;
const CYCLE_DAYS: usize = 5;
const GROWTH_CONSISTENCY_PCT: f64 = 35.0;
const SELECT_MIN_PAYOUT: f64 = 250.0;
const LIGHTNING_MIN_PAYOUT: f64 = 1_000.0;

fn qualifying_day_profit(size: u32) -> f64 {
    match size {
        50_000 => 150.0,
        100_000 => 200.0,
        _ => 250.0,
    }
}

fn payout_schedule(size: u32) -> &'static [f64] {
    match size {
        50_000 => &[1_500.0, 2_000.0, 2_500.0, 3_000.0],
        100_000 => &[2_000.0, 2_500.0, 3_000.0, 3_500.0],
        _ => &[2_500.0, 3_000.0, 3_500.0, 4_000.0],
    }
}

/// Smallest GROWTH payout accepted at each payout index.
fn growth_min_schedule(size: u32) -> &'static [f64] {
    match size {
        50_000 => &[1_000.0, 1_500.0, 2_000.0, 2_500.0],
        100_000 => &[1_500.0, 2_000.0, 2_500.0, 3_000.0],
        _ => &[2_000.0, 2_500.0, 3_000.0, 3_500.0],
    }
}

fn select_flex_cap(size: u32) -> f64 {
    match size {
        50_000 => 2_000.0,
        100_000 => 2_500.0,
        _ => 3_000.0,
    }
}

fn select_daily_cap(size: u32) -> f64 {
    match size {
        50_000 => 1_000.0,
        100_000 => 1_500.0,
        _ => 2_000.0,
    }
}

/// Profit goal and consistency percent for a LIGHTNING payout.
fn lightning_goal(size: u32, payout_index: usize) -> (f64, f64) {
    let first = payout_index == 0;
    match (size, first) {
        (50_000, true) => (3_000.0, 20.0),
        (50_000, false) => (1_500.0, 25.0),
        (100_000, true) => (6_000.0, 20.0),
        (100_000, false) => (3_000.0, 25.0),
        (_, true) => (9_000.0, 20.0),
        (_, false) => (4_500.0, 25.0),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tradeify;

impl Tradeify {
    pub fn plan(profile: &AccountProfile) -> TradeifyPlan {
        match profile.program {
            Some(Program::Tradeify(plan)) => plan,
            _ => TradeifyPlan::detect(&profile.keywords()),
        }
    }

    fn table(plan: TradeifyPlan) -> &'static [Tier] {
        match plan {
            TradeifyPlan::Select(_) => &SELECT,
            TradeifyPlan::Growth | TradeifyPlan::Lightning => &GROWTH,
        }
    }

    fn lightning_drawdown(size: u32) -> f64 {
        LIGHTNING_DRAWDOWN
            .iter()
            .find(|(s, _)| *s == size)
            .map_or(0.0, |(_, dd)| *dd)
    }

    fn growth_outcome(
        size: u32,
        floor: f64,
        balance: f64,
        remaining: f64,
        total_pnl: f64,
        total_withdrawals: f64,
        daily: &DailyPnl,
    ) -> PayoutCalc {
        let index = payout::approximate_payout_index(total_withdrawals);
        PayoutCalc::new()
            .gate("balance above buffer", balance >= floor)
            .gate(
                "consistency",
                daily.within_consistency(total_pnl, GROWTH_CONSISTENCY_PCT),
            )
            .gate(
                "qualifying days",
                daily.days_at_least(qualifying_day_profit(size)) >= CYCLE_DAYS,
            )
            .capacity("remaining profit", remaining)
            .capacity_opt(
                "payout cap",
                payout::schedule_value(payout_schedule(size), index),
            )
            .minimum(
                payout::schedule_value(growth_min_schedule(size), index).unwrap_or_default(),
            )
    }

    fn lightning_outcome(
        size: u32,
        remaining: f64,
        total_withdrawals: f64,
        daily: &DailyPnl,
    ) -> PayoutCalc {
        let index = payout::approximate_payout_index(total_withdrawals);
        let (goal, pct) = lightning_goal(size, index);
        PayoutCalc::new()
            .gate("profit goal", remaining >= goal)
            .gate("consistency", daily.within_consistency(remaining, pct))
            .capacity("remaining profit", remaining)
            .capacity_opt(
                "payout cap",
                payout::schedule_value(payout_schedule(size), index),
            )
            .minimum(LIGHTNING_MIN_PAYOUT)
    }
}

impl FirmStrategy for Tradeify {
    fn name(&self) -> &'static str {
        "Tradeify"
    }

    fn account_rules(&self, profile: &AccountProfile) -> Option<AccountRules> {
        let plan = Self::plan(profile);
        let t = tier::lookup(Self::table(plan), profile.size)?;
        match plan {
            TradeifyPlan::Lightning => Some(AccountRules::instant(
                Self::lightning_drawdown(t.size),
                t.rules.max_contracts,
            )),
            _ if profile.is_funded() => Some(t.rules.funded()),
            _ => Some(t.rules),
        }
    }

    fn withdrawal_rules(&self, profile: &AccountProfile) -> WithdrawalRules {
        let plan = Self::plan(profile);
        let found = tier::lookup(Self::table(plan), profile.size);
        let (Some(t), true) = (found, profile.is_funded() || plan == TradeifyPlan::Lightning) else {
            return WithdrawalRules::evaluation(TAX_RATE);
        };

        let per_cycle = |min_daily_profit: f64| CycleRequirements {
            days_per_cycle: CYCLE_DAYS as u32,
            min_daily_profit,
            withdrawal_percentage: 100.0,
        };
        match plan {
            TradeifyPlan::Growth => WithdrawalRules {
                tax_rate: TAX_RATE,
                requires_cycles: true,
                cycle_requirements: per_cycle(qualifying_day_profit(t.size)),
                has_buffer: true,
                min_withdrawal: growth_min_schedule(t.size).first().copied().unwrap_or_default(),
                max_withdrawal: payout_schedule(t.size).last().copied(),
                frequency: PayoutFrequency::PerCycle,
            },
            TradeifyPlan::Select(SelectOption::Flex) => WithdrawalRules {
                tax_rate: TAX_RATE,
                requires_cycles: true,
                cycle_requirements: CycleRequirements {
                    withdrawal_percentage: 50.0,
                    ..per_cycle(0.0)
                },
                has_buffer: false,
                min_withdrawal: SELECT_MIN_PAYOUT,
                max_withdrawal: Some(select_flex_cap(t.size)),
                frequency: PayoutFrequency::PerCycle,
            },
            TradeifyPlan::Select(SelectOption::Daily) => WithdrawalRules {
                tax_rate: TAX_RATE,
                requires_cycles: false,
                cycle_requirements: CycleRequirements::default(),
                has_buffer: true,
                min_withdrawal: SELECT_MIN_PAYOUT,
                max_withdrawal: Some(select_daily_cap(t.size)),
                frequency: PayoutFrequency::Daily,
            },
            TradeifyPlan::Lightning => WithdrawalRules {
                tax_rate: TAX_RATE,
                requires_cycles: false,
                cycle_requirements: CycleRequirements::default(),
                has_buffer: false,
                min_withdrawal: LIGHTNING_MIN_PAYOUT,
                max_withdrawal: payout_schedule(t.size).last().copied(),
                frequency: PayoutFrequency::PerCycle,
            },
        }
    }

    /// Growth drawdown plus a $100 margin, whatever the plan.
    fn buffer(&self, size: f64) -> f64 {
        tier::lookup(&GROWTH, size)
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
        let plan = Self::plan(profile);
        let Some(t) = tier::lookup(Self::table(plan), profile.size) else {
            return PayoutOutcome::NotApplicable;
        };
        if plan != TradeifyPlan::Lightning && !profile.is_funded() {
            return PayoutOutcome::NotApplicable;
        }

        let daily = DailyPnl::from_entries(entries);
        let balance = profile.balance(total_pnl, total_withdrawals);
        let remaining = total_pnl - total_withdrawals;
        let floor = profile.size + self.buffer(profile.size);

        let calc = match plan {
            TradeifyPlan::Growth => Self::growth_outcome(
                t.size,
                floor,
                balance,
                remaining,
                total_pnl,
                total_withdrawals,
                &daily,
            ),
            TradeifyPlan::Select(SelectOption::Flex) => {
                let profitable = daily.profitable_days();
                PayoutCalc::new()
                    .gate(
                        "completed cycle",
                        profitable >= CYCLE_DAYS && profitable % CYCLE_DAYS == 0,
                    )
                    .capacity("half of remaining profit", remaining * 0.5)
                    .capacity("payout cap", select_flex_cap(t.size))
                    .minimum(SELECT_MIN_PAYOUT)
            }
            TradeifyPlan::Select(SelectOption::Daily) => PayoutCalc::new()
                .gate("remaining profit", remaining > 0.0)
                .gate("balance above buffer", balance >= floor)
                .capacity("double remaining profit", remaining * 2.0)
                .capacity("balance above buffer", balance - floor)
                .capacity("payout cap", select_daily_cap(t.size))
                .minimum(SELECT_MIN_PAYOUT),
            TradeifyPlan::Lightning => {
                Self::lightning_outcome(t.size, remaining, total_withdrawals, &daily)
            }
        };
        calc.outcome()
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool {
        let plan = Self::plan(profile);
        if profile.is_funded() || plan == TradeifyPlan::Lightning {
            return false;
        }
        tier::lookup(Self::table(plan), profile.size)
            .is_some_and(|t| Evaluation::TRAILING_PER_ENTRY.passes(profile.size, &t.rules, entries))
    }
}
