//! Fallback for firms the engine does not know.

use super::FirmStrategy;
use crate::domain::account::AccountProfile;
use crate::domain::payout::PayoutOutcome;
use crate::domain::pnl::PnlEntry;
use crate::domain::rules::{AccountRules, WithdrawalRules};

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFirm;

impl FirmStrategy for DefaultFirm {
    fn name(&self) -> &'static str {
        "Default"
    }

    fn account_rules(&self, _profile: &AccountProfile) -> Option<AccountRules> {
        None
    }

    fn withdrawal_rules(&self, _profile: &AccountProfile) -> WithdrawalRules {
        WithdrawalRules::default()
    }

    fn buffer(&self, _size: f64) -> f64 {
        0.0
    }

    fn payout_outcome(
        &self,
        _profile: &AccountProfile,
        _total_pnl: f64,
        _total_withdrawals: f64,
        _entries: &[PnlEntry],
    ) -> PayoutOutcome {
        PayoutOutcome::NotApplicable
    }

    fn is_eligible_for_validation(&self, _profile: &AccountProfile, _entries: &[PnlEntry]) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::PayoutFrequency;
    use chrono::NaiveDate;

    #[test]
    fn everything_is_inert() {
        let profile = AccountProfile::funded(50_000.0);
        let entries = [PnlEntry::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 5_000.0)];
        assert!(DefaultFirm.account_rules(&profile).is_none());
        assert_eq!(
            DefaultFirm.withdrawal_rules(&profile).frequency,
            PayoutFrequency::NotApplicable
        );
        assert!((DefaultFirm.buffer(50_000.0) - 0.0).abs() < f64::EPSILON);
        assert!((DefaultFirm.available_for_withdrawal(&profile, 5_000.0, 0.0, &entries) - 0.0).abs() < f64::EPSILON);
        assert!(!DefaultFirm.is_eligible_for_validation(&AccountProfile::eval(50_000.0), &entries));
    }
}
