//! Realized PnL entries and the folds the rule engine runs over them.
//!
//! Every fold starts from [`chronological`], so callers may pass entries in
//! any order. Entries sharing a date are folded losses-first, which makes each
//! result a function of the `(date, amount)` multiset alone.

use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PnlEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

impl PnlEntry {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        PnlEntry { date, amount }
    }
}

/// Entries sorted by date, then by amount within a date.
pub fn chronological(entries: &[PnlEntry]) -> Vec<PnlEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.amount.total_cmp(&b.amount)));
    sorted
}

pub fn total(entries: &[PnlEntry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

/// Net PnL per calendar day, in date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyPnl {
    days: BTreeMap<NaiveDate, f64>,
}

impl DailyPnl {
    pub fn from_entries(entries: &[PnlEntry]) -> Self {
        let mut days = BTreeMap::new();
        for entry in chronological(entries) {
            *days.entry(entry.date).or_insert(0.0) += entry.amount;
        }
        DailyPnl { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of distinct days with at least one entry.
    pub fn trading_days(&self) -> usize {
        self.days.len()
    }

    pub fn total(&self) -> f64 {
        self.days.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.days.iter().map(|(d, v)| (*d, *v))
    }

    pub fn net(&self, date: NaiveDate) -> Option<f64> {
        self.days.get(&date).copied()
    }

    /// Days whose net is strictly positive.
    pub fn profitable_days(&self) -> usize {
        self.days.values().filter(|&&v| v > 0.0).count()
    }

    /// Days whose net meets or exceeds `threshold`.
    pub fn days_at_least(&self, threshold: f64) -> usize {
        self.days.values().filter(|&&v| v >= threshold).count()
    }

    /// Largest positive day, or `None` when no day closed green.
    pub fn best_day(&self) -> Option<f64> {
        self.days
            .values()
            .copied()
            .filter(|&v| v > 0.0)
            .max_by(f64::total_cmp)
    }

    /// True when the best day is at most `pct` percent of `profit`.
    ///
    /// A `pct` of zero disables the check. A missing best day counts as 0.
    pub fn within_consistency(&self, profit: f64, pct: f64) -> bool {
        if pct <= 0.0 {
            return true;
        }
        let best = self.best_day().unwrap_or(0.0);
        best <= profit * pct / 100.0
    }
}

/// Running balance after each step, with the highest balance seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub balance: f64,
    pub peak: f64,
}

impl BalancePoint {
    pub fn drawdown(&self) -> f64 {
        self.peak - self.balance
    }
}

/// Running balance per raw entry, starting from `initial`.
pub fn balance_curve(initial: f64, entries: &[PnlEntry]) -> Vec<BalancePoint> {
    fold_curve(
        initial,
        chronological(entries)
            .into_iter()
            .map(|e| (e.date, e.amount)),
    )
}

/// Running balance per calendar day, starting from `initial`.
pub fn daily_balance_curve(initial: f64, daily: &DailyPnl) -> Vec<BalancePoint> {
    fold_curve(initial, daily.iter())
}

fn fold_curve(initial: f64, steps: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<BalancePoint> {
    let mut balance = initial;
    let mut peak = initial;
    steps
        .map(|(date, amount)| {
            balance += amount;
            if balance > peak {
                peak = balance;
            }
            BalancePoint {
                date,
                balance,
                peak,
            }
        })
        .collect()
}

/// How the drawdown floor is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawdownKind {
    /// Loss from the highest balance reached so far.
    Trailing,
    /// Loss from the fixed starting balance.
    Static,
}

/// First point at which the drawdown exceeds `max_drawdown`, if any.
///
/// A breach is permanent: later recovery does not clear it.
pub fn first_breach(
    initial: f64,
    curve: &[BalancePoint],
    kind: DrawdownKind,
    max_drawdown: f64,
) -> Option<BalancePoint> {
    curve
        .iter()
        .find(|point| {
            let loss = match kind {
                DrawdownKind::Trailing => point.drawdown(),
                DrawdownKind::Static => initial - point.balance,
            };
            loss > max_drawdown
        })
        .copied()
}

/// Largest trailing drawdown along the curve, 0 for an empty curve.
pub fn max_drawdown(curve: &[BalancePoint]) -> f64 {
    curve
        .iter()
        .map(BalancePoint::drawdown)
        .fold(0.0, f64::max)
}
