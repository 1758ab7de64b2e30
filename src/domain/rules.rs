//! Rule contracts: the thresholds one firm applies to one account tier.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxContracts {
    pub mini: u32,
    pub micro: u32,
}

impl MaxContracts {
    pub const fn new(mini: u32, micro: u32) -> Self {
        MaxContracts { mini, micro }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountRules {
    pub profit_target: f64,
    pub max_drawdown: f64,
    pub daily_loss_limit: f64,
    /// Percent of total profit a single day may represent; 0 disables the rule.
    pub consistency_rule: f64,
    pub min_trading_days: u32,
    pub max_contracts: MaxContracts,
}

impl AccountRules {
    /// Clears the fields that only matter before graduation.
    pub fn funded(self) -> Self {
        AccountRules {
            profit_target: 0.0,
            consistency_rule: 0.0,
            min_trading_days: 0,
            ..self
        }
    }

    /// Rules for a program with no evaluation phase: only the risk limits remain.
    pub fn instant(max_drawdown: f64, max_contracts: MaxContracts) -> Self {
        AccountRules {
            max_drawdown,
            max_contracts,
            ..AccountRules::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PayoutFrequency {
    Daily,
    Weekly,
    BiWeekly,
    PerCycle,
    #[default]
    NotApplicable,
}

impl fmt::Display for PayoutFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayoutFrequency::Daily => "daily",
            PayoutFrequency::Weekly => "weekly",
            PayoutFrequency::BiWeekly => "bi-weekly",
            PayoutFrequency::PerCycle => "per cycle",
            PayoutFrequency::NotApplicable => "n/a",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleRequirements {
    pub days_per_cycle: u32,
    /// Minimum net for a day to count toward a cycle; 0 means any green day.
    pub min_daily_profit: f64,
    /// Share of profit released per cycle, in percent.
    pub withdrawal_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawalRules {
    /// Fraction withheld from each payout, in [0, 1].
    pub tax_rate: f64,
    pub requires_cycles: bool,
    pub cycle_requirements: CycleRequirements,
    pub has_buffer: bool,
    pub min_withdrawal: f64,
    /// `None` when the firm sets no per-payout ceiling.
    pub max_withdrawal: Option<f64>,
    pub frequency: PayoutFrequency,
}

impl WithdrawalRules {
    /// The "not applicable" rule set handed to evaluation accounts.
    pub fn evaluation(tax_rate: f64) -> Self {
        WithdrawalRules {
            tax_rate,
            ..WithdrawalRules::default()
        }
    }

    pub fn net_of_tax(&self, gross: f64) -> f64 {
        gross * (1.0 - self.tax_rate)
    }
}
