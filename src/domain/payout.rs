//! Shared withdrawal template.
//!
//! Every firm answers "how much can be withdrawn now" the same way: a set of
//! gate predicates that must all pass, one or more capacity figures of which
//! the smallest wins, and a minimum payout below which nothing is released.
//! [`PayoutCalc`] is that template; the firm modules only supply the numbers.

use tracing::debug;

/// Why a withdrawal computation produced the amount it did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayoutOutcome {
    /// Withdrawals do not apply to this account (e.g. an evaluation).
    NotApplicable,
    /// A gate failed; `gate` names it.
    Blocked { gate: &'static str },
    /// The computed amount is under the firm's minimum payout.
    BelowMinimum { amount: f64, minimum: f64 },
    Available(f64),
}

impl PayoutOutcome {
    /// The withdrawable amount; every non-`Available` outcome is 0.
    pub fn amount(&self) -> f64 {
        match self {
            PayoutOutcome::Available(amount) => *amount,
            _ => 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.amount() > 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PayoutCalc {
    blocked: Option<&'static str>,
    capacities: Vec<(&'static str, f64)>,
    minimum: f64,
}

impl PayoutCalc {
    pub fn new() -> Self {
        PayoutCalc::default()
    }

    /// Adds a gate; the first failing gate is the one reported.
    pub fn gate(mut self, label: &'static str, passed: bool) -> Self {
        if !passed && self.blocked.is_none() {
            self.blocked = Some(label);
        }
        self
    }

    pub fn capacity(mut self, label: &'static str, amount: f64) -> Self {
        self.capacities.push((label, amount));
        self
    }

    /// Adds a capacity only when `amount` is `Some`.
    pub fn capacity_opt(self, label: &'static str, amount: Option<f64>) -> Self {
        match amount {
            Some(amount) => self.capacity(label, amount),
            None => self,
        }
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = minimum;
        self
    }

    pub fn outcome(self) -> PayoutOutcome {
        if let Some(gate) = self.blocked {
            debug!(gate, "payout blocked");
            return PayoutOutcome::Blocked { gate };
        }

        let binding = self
            .capacities
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let amount = match binding {
            Some((label, amount)) => {
                debug!(capacity = label, amount, "binding payout capacity");
                amount.max(0.0)
            }
            None => 0.0,
        };

        if amount <= 0.0 {
            return PayoutOutcome::BelowMinimum {
                amount: 0.0,
                minimum: self.minimum,
            };
        }
        if amount < self.minimum {
            return PayoutOutcome::BelowMinimum {
                amount,
                minimum: self.minimum,
            };
        }
        PayoutOutcome::Available(amount)
    }
}

/// Approximate count of payouts already taken, assuming $1,000 per payout.
///
/// Ledgers only carry the withdrawal total, not the payout sequence.
pub fn approximate_payout_index(total_withdrawals: f64) -> usize {
    if total_withdrawals <= 0.0 {
        return 0;
    }
    (total_withdrawals / 1_000.0).floor() as usize
}

/// Looks up a payout schedule, repeating the last tier once it runs out.
pub fn schedule_value(schedule: &[f64], index: usize) -> Option<f64> {
    schedule.get(index).or_else(|| schedule.last()).copied()
}
