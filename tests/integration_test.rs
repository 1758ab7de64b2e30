//! Integration tests for the rule engine.
//!
//! Tests cover:
//! - Worked examples for each firm family
//! - Firm selector resolution and the default fallback
//! - Account aggregate: running balance, explicit programs, ledger loading
//! - Ledger fold semantics shared by every firm

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use propfirm::cli;
use propfirm::domain::account::{Account, AccountProfile, AccountType};
use propfirm::domain::error::PropfirmError;
use propfirm::domain::firm::{self, FirmId};
use propfirm::domain::payout::PayoutOutcome;
use propfirm::domain::program::{PhidiasPlan, Program, TptPlan};

mod worked_examples {
    use super::*;

    #[test]
    fn topstep_50k_eval_graduates() {
        let account = make_account(
            FirmId::TopStep,
            50_000.0,
            AccountType::Eval,
            "",
            "",
            &[800.0, -300.0, 900.0, 1_000.0, 800.0],
        );
        assert_abs_diff_eq!(account.total_pnl(), 3_200.0);
        assert!(account.is_eligible_for_validation());
    }

    #[test]
    fn topstep_eval_fails_consistency() {
        let account = make_account(
            FirmId::TopStep,
            50_000.0,
            AccountType::Eval,
            "",
            "",
            &[2_000.0, 600.0, 600.0],
        );
        assert!(!account.is_eligible_for_validation());
    }

    #[test]
    fn phidias_eval_single_loss_is_final() {
        let account = make_account(
            FirmId::Phidias,
            25_000.0,
            AccountType::Eval,
            "",
            "",
            &[-600.0, 3_000.0, 500.0],
        );
        assert!(!account.is_eligible_for_validation());
    }

    #[test]
    fn phidias_cash_25k_releases_all_profit() {
        let account = make_account(
            FirmId::Phidias,
            25_000.0,
            AccountType::Funded,
            "Phidias 25k",
            "cash",
            &[400.0, 600.0],
        );
        assert_eq!(account.program, Some(Program::Phidias(PhidiasPlan::Cash)));
        assert_abs_diff_eq!(account.available_for_withdrawal(), 1_000.0);
    }

    #[test]
    fn phidias_live_minimum_payout() {
        let small = make_account(FirmId::Phidias, 25_000.0, AccountType::Funded, "", "live", &[400.0]);
        assert_abs_diff_eq!(small.available_for_withdrawal(), 0.0);
        assert!(matches!(small.withdrawal_outcome(), PayoutOutcome::BelowMinimum { .. }));

        let enough = make_account(FirmId::Phidias, 25_000.0, AccountType::Funded, "", "live", &[600.0]);
        assert_abs_diff_eq!(enough.available_for_withdrawal(), 500.0);
    }

    #[test]
    fn topstep_cycle_unlocks_half() {
        let account = make_account(
            FirmId::TopStep,
            50_000.0,
            AccountType::Funded,
            "",
            "",
            &[200.0; 5],
        );
        assert_abs_diff_eq!(account.available_for_withdrawal(), 500.0);

        let short = make_account(
            FirmId::TopStep,
            50_000.0,
            AccountType::Funded,
            "",
            "",
            &[200.0; 4],
        );
        assert_eq!(
            short.withdrawal_outcome(),
            PayoutOutcome::Blocked {
                gate: "completed cycle"
            }
        );
    }

    #[test]
    fn topstep_share_rises_after_ten_thousand() {
        let mut account = make_account(
            FirmId::TopStep,
            50_000.0,
            AccountType::Funded,
            "",
            "",
            &[3_000.0; 5],
        );
        account.record_withdrawal(date("2024-04-01"), 10_000.0);
        assert_abs_diff_eq!(account.available_for_withdrawal(), 4_500.0, epsilon = 1e-9);
    }

    #[test]
    fn apex_breach_exactly_at_limit_is_not_a_breach() {
        let account = make_account(
            FirmId::Apex,
            25_000.0,
            AccountType::Eval,
            "",
            "",
            &[-1_500.0, 600.0, 600.0, 600.0, 600.0, 600.0, 600.0],
        );
        assert!(account.is_eligible_for_validation());
    }

    #[test]
    fn per_entry_and_end_of_day_firms_disagree_on_intraday_dip() {
        let mut entries = daily_entries("2024-03-04", &[-2_100.0, 700.0, 700.0, 600.0, 600.0]);
        entries.push(propfirm::domain::pnl::PnlEntry::new(date("2024-03-04"), 2_600.0));

        let profile = AccountProfile::eval(50_000.0);
        assert!(firm::strategy_for(FirmId::TakeProfitTrader).is_eligible_for_validation(&profile, &entries));
        assert!(!firm::strategy_for(FirmId::TopStep).is_eligible_for_validation(&profile, &entries));
    }
}

mod selector {
    use super::*;

    #[test]
    fn resolves_by_lenient_key() {
        assert_eq!(firm::resolve("Take Profit Trader").name(), "TakeProfitTrader");
        assert_eq!(firm::resolve("TPT").name(), "TakeProfitTrader");
        assert_eq!(firm::resolve("lucid_trading").name(), "Lucid");
        assert_eq!(firm::resolve("BULENOX").name(), "Bulenox");
    }

    #[test]
    fn unknown_firm_gets_inert_default() {
        let strategy = firm::resolve("some new firm");
        assert_eq!(strategy.name(), "Default");
        let profile = AccountProfile::funded(50_000.0);
        assert!(strategy.account_rules(&profile).is_none());
        assert_abs_diff_eq!(strategy.available_for_withdrawal(&profile, 9_000.0, 0.0, &[]), 0.0);
    }

    #[test]
    fn every_firm_has_a_distinct_name() {
        let mut names: Vec<_> = FirmId::ALL.iter().map(|id| firm::strategy_for(*id).name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FirmId::ALL.len());
    }

    #[test]
    fn evaluation_accounts_never_withdraw_from_tier_firms() {
        let entries = daily_entries("2024-03-04", &[1_000.0; 10]);
        for id in [FirmId::TopStep, FirmId::Apex, FirmId::Bulenox, FirmId::TakeProfitTrader] {
            let strategy = firm::strategy_for(id);
            let outcome = strategy.withdrawal_outcome(&AccountProfile::eval(50_000.0), 10_000.0, 0.0, &entries);
            assert_eq!(outcome, PayoutOutcome::NotApplicable, "{}", strategy.name());
        }
    }

    #[test]
    fn funded_accounts_are_never_eligible_for_validation() {
        let entries = daily_entries("2024-03-04", &[1_500.0; 10]);
        for id in FirmId::ALL {
            let strategy = firm::strategy_for(id);
            assert!(
                !strategy.is_eligible_for_validation(&AccountProfile::funded(50_000.0), &entries),
                "{}",
                strategy.name()
            );
        }
    }
}

mod account_aggregate {
    use super::*;

    #[test]
    fn running_balance_includes_withdrawals() {
        let mut account = make_account(
            FirmId::Apex,
            50_000.0,
            AccountType::Funded,
            "",
            "",
            &[1_000.0, 500.0],
        );
        account.record_withdrawal(date("2024-03-10"), 600.0);
        assert_abs_diff_eq!(account.balance(), 50_900.0);
        assert_abs_diff_eq!(account.peak_balance(), 51_500.0);
        let curve = account.running_balance();
        assert_eq!(curve.len(), 3);
        assert_abs_diff_eq!(curve[2].drawdown(), 600.0);
    }

    #[test]
    fn explicit_program_beats_keywords() {
        let detected = make_account(
            FirmId::TakeProfitTrader,
            50_000.0,
            AccountType::Funded,
            "TPT PRO+",
            "",
            &[1_900.0],
        );
        assert_abs_diff_eq!(detected.available_for_withdrawal(), 1_900.0);

        let pinned = detected
            .clone()
            .with_program(Program::TakeProfitTrader(TptPlan::Pro));
        assert_abs_diff_eq!(pinned.available_for_withdrawal(), 0.0);
    }

    #[test]
    fn ledger_port_fills_account() {
        let port = MockLedgerPort::new()
            .with_pnl("lucid50", daily_entries("2024-05-01", &[600.0; 5]))
            .with_withdrawal("lucid50", "2024-05-10", 1_000.0);
        let mut account = Account::new(FirmId::Lucid, 50_000.0, AccountType::Funded, "Lucid Flex", "");
        cli::load_ledger(&mut account, &port, "lucid50").unwrap();

        assert_eq!(account.pnl_entries.len(), 5);
        assert_abs_diff_eq!(account.total_withdrawals(), 1_000.0);
        // second payout: cap 1,500; split on 2,000 remaining
        assert_abs_diff_eq!(account.available_for_withdrawal(), 1_500.0);
    }

    #[test]
    fn ledger_errors_propagate() {
        let port = MockLedgerPort::new().with_error("bad", "corrupt file");
        let mut account = Account::new(FirmId::Apex, 50_000.0, AccountType::Eval, "", "");
        let err = cli::load_ledger(&mut account, &port, "bad").unwrap_err();
        assert!(matches!(err, PropfirmError::Ledger { .. }));
    }
}

mod fold_semantics {
    use super::*;
    use propfirm::domain::pnl::PnlEntry;

    #[test]
    fn same_day_losses_fold_first() {
        let gain_first = vec![
            PnlEntry::new(date("2024-03-04"), 2_600.0),
            PnlEntry::new(date("2024-03-04"), -2_100.0),
        ];
        let loss_first: Vec<_> = gain_first.iter().rev().copied().collect();
        let topstep = firm::strategy_for(FirmId::TopStep);
        let profile = AccountProfile::eval(50_000.0);
        assert_eq!(
            topstep.is_eligible_for_validation(&profile, &gain_first),
            topstep.is_eligible_for_validation(&profile, &loss_first)
        );
        assert!(!topstep.is_eligible_for_validation(&profile, &gain_first));
    }

    #[test]
    fn empty_ledger_is_never_eligible() {
        for id in FirmId::ALL {
            let strategy = firm::strategy_for(id);
            assert!(!strategy.is_eligible_for_validation(&AccountProfile::eval(50_000.0), &[]));
        }
    }

    #[test]
    fn unsupported_size_answers_with_none_and_zero() {
        let profile = AccountProfile::funded(12_345.0);
        let entries = daily_entries("2024-03-04", &[1_000.0; 10]);
        for id in FirmId::ALL {
            let strategy = firm::strategy_for(id);
            assert!(strategy.account_rules(&profile).is_none(), "{}", strategy.name());
            assert_abs_diff_eq!(
                strategy.available_for_withdrawal(&profile, 10_000.0, 0.0, &entries),
                0.0
            );
        }
    }
}
