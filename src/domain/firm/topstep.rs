//! TopStep: tier table, consistency-checked evaluation, cycle-based payouts.

use super::tier::{self, Evaluation, Tier, rules, tier};
use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::{PayoutCalc, PayoutOutcome};
use crate::domain::pnl::{DailyPnl, PnlEntry};
use crate::domain::rules::{
    AccountRules, CycleRequirements, MaxContracts, PayoutFrequency, WithdrawalRules,
};

const TIERS: [Tier; 3] = [
    tier(50_000, rules(3_000.0, 2_000.0, 1_000.0, 50.0, 2, MaxContracts::new(5, 50))),
    tier(100_000, rules(6_000.0, 3_000.0, 2_000.0, 50.0, 2, MaxContracts::new(10, 100))),
    tier(150_000, rules(9_000.0, 4_500.0, 3_000.0, 50.0, 2, MaxContracts::new(15, 150))),
];

const TAX_RATE: f64 = 0.10;
const CYCLE_DAYS: usize = 5;
const QUALIFYING_DAY_PROFIT: f64 = 150.0;
const BASE_PAYOUT_PCT: f64 = 50.0;
const RAISED_PAYOUT_PCT: f64 = 90.0;
/// Lifetime withdrawals after which the payout share rises for good.
const RAISE_THRESHOLD: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct TopStep;

impl TopStep {
    /// Completed five-day cycles of qualifying days.
    pub fn completed_cycles(entries: &[PnlEntry]) -> usize {
        DailyPnl::from_entries(entries).days_at_least(QUALIFYING_DAY_PROFIT) / CYCLE_DAYS
    }

    /// Share of profit released, in percent; only ever moves up.
    pub fn payout_percentage(total_withdrawals: f64) -> f64 {
        if total_withdrawals >= RAISE_THRESHOLD {
            RAISED_PAYOUT_PCT
        } else {
            BASE_PAYOUT_PCT
        }
    }
}

impl FirmStrategy for TopStep {
    fn name(&self) -> &'static str {
        "TopStep"
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
                days_per_cycle: CYCLE_DAYS as u32,
                min_daily_profit: QUALIFYING_DAY_PROFIT,
                withdrawal_percentage: BASE_PAYOUT_PCT,
            },
            has_buffer: false,
            min_withdrawal: 0.0,
            max_withdrawal: None,
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
        if !profile.is_funded() || tier::lookup(&TIERS, profile.size).is_none() {
            return PayoutOutcome::NotApplicable;
        }

        let remaining = total_pnl - total_withdrawals;
        let pct = Self::payout_percentage(total_withdrawals);

        PayoutCalc::new()
            .gate("completed cycle", Self::completed_cycles(entries) > 0)
            .capacity("profit share", remaining * pct / 100.0)
            .outcome()
    }

    fn is_eligible_for_validation(&self, profile: &AccountProfile, entries: &[PnlEntry]) -> bool {
        if profile.is_funded() {
            return false;
        }
        match tier::lookup(&TIERS, profile.size) {
            Some(t) => Evaluation::TRAILING_PER_ENTRY.passes(profile.size, &t.rules, entries),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ledger(amounts: &[f64]) -> Vec<PnlEntry> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| PnlEntry {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                amount,
            })
            .collect()
    }

    #[test]
    fn rules_for_supported_sizes() {
        let rules = TopStep.account_rules(&AccountProfile::eval(50_000.0)).unwrap();
        assert!((rules.profit_target - 3_000.0).abs() < f64::EPSILON);
        assert!((rules.max_drawdown - 2_000.0).abs() < f64::EPSILON);
        assert!((rules.consistency_rule - 50.0).abs() < f64::EPSILON);
        assert!(TopStep.account_rules(&AccountProfile::eval(25_000.0)).is_none());
    }

    #[test]
    fn eval_50k_passes() {
        let entries = ledger(&[1_500.0, 1_200.0, 500.0]);
        assert!(TopStep.is_eligible_for_validation(&AccountProfile::eval(50_000.0), &entries));
    }

    #[test]
    fn eval_single_big_day_fails_consistency() {
        let entries = ledger(&[3_200.0]);
        assert!(!TopStep.is_eligible_for_validation(&AccountProfile::eval(50_000.0), &entries));
    }

    #[test]
    fn eval_breach_is_sticky() {
        let entries = ledger(&[1_000.0, -2_100.0, 2_500.0, 2_000.0]);
        assert!(!TopStep.is_eligible_for_validation(&AccountProfile::eval(50_000.0), &entries));
    }

    #[test]
    fn funded_account_not_eligible() {
        let entries = ledger(&[1_500.0, 1_200.0, 500.0]);
        assert!(!TopStep.is_eligible_for_validation(&AccountProfile::funded(50_000.0), &entries));
    }

    #[test]
    fn no_cycle_no_payout() {
        let entries = ledger(&[200.0, 200.0, 200.0, 200.0]);
        let profile = AccountProfile::funded(50_000.0);
        let outcome = TopStep.withdrawal_outcome(&profile, 800.0, 0.0, &entries);
        assert_eq!(outcome, PayoutOutcome::Blocked { gate: "completed cycle" });
    }

    #[test]
    fn one_cycle_unlocks_half() {
        let entries = ledger(&[150.0, 150.0, 200.0, 300.0, 200.0]);
        let profile = AccountProfile::funded(50_000.0);
        let available = TopStep.available_for_withdrawal(&profile, 1_000.0, 0.0, &entries);
        assert!((available - 500.0).abs() < 1e-9);
    }

    #[test]
    fn sub_threshold_days_do_not_qualify() {
        let entries = ledger(&[149.0, 150.0, 200.0, 300.0, 200.0]);
        assert_eq!(TopStep::completed_cycles(&entries), 0);
    }

    #[test]
    fn ratchet_to_ninety_percent() {
        assert!((TopStep::payout_percentage(9_999.0) - 50.0).abs() < f64::EPSILON);
        assert!((TopStep::payout_percentage(10_000.0) - 90.0).abs() < f64::EPSILON);
        assert!((TopStep::payout_percentage(25_000.0) - 90.0).abs() < f64::EPSILON);

        let entries = ledger(&[3_000.0; 10]);
        let profile = AccountProfile::funded(150_000.0);
        let available = TopStep.available_for_withdrawal(&profile, 30_000.0, 10_000.0, &entries);
        assert!((available - 18_000.0).abs() < 1e-9);
    }

    #[test]
    fn eval_account_gets_not_applicable() {
        let entries = ledger(&[200.0; 5]);
        let profile = AccountProfile::eval(50_000.0);
        let outcome = TopStep.withdrawal_outcome(&profile, 1_000.0, 0.0, &entries);
        assert_eq!(outcome, PayoutOutcome::NotApplicable);
        let rules = TopStep.withdrawal_rules(&profile);
        assert!(!rules.requires_cycles);
        assert!(!rules.has_buffer);
    }

    #[test]
    fn funded_withdrawal_rules() {
        let rules = TopStep.withdrawal_rules(&AccountProfile::funded(100_000.0));
        assert!(rules.requires_cycles);
        assert_eq!(rules.cycle_requirements.days_per_cycle, 5);
        assert!((rules.cycle_requirements.min_daily_profit - 150.0).abs() < f64::EPSILON);
        assert!((TopStep.buffer(100_000.0) - 0.0).abs() < f64::EPSILON);
    }
}
