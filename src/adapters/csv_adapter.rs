//! CSV ledger adapter.
//!
//! Reads `<stem>_pnl.csv` and `<stem>_withdrawals.csv` from one directory.
//! Both files have a `date,amount` header and ISO dates.

use crate::domain::account::Withdrawal;
use crate::domain::error::PropfirmError;
use crate::domain::pnl::PnlEntry;
use crate::ports::ledger_port::LedgerPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvLedgerAdapter {
    base_path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, stem: &str, series: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", stem, series))
    }

    fn read_rows(&self, stem: &str, series: &str) -> Result<Option<Vec<(NaiveDate, f64)>>, PropfirmError> {
        let path = self.csv_path(stem, series);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PropfirmError::Ledger {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut rows = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| PropfirmError::Ledger {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;
            // header is line 1
            let row = line + 2;

            let date_str = record.get(0).ok_or_else(|| PropfirmError::Ledger {
                reason: format!("{} line {}: missing date column", path.display(), row),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                PropfirmError::Ledger {
                    reason: format!("{} line {}: invalid date '{}': {}", path.display(), row, date_str, e),
                }
            })?;

            let amount: f64 = record
                .get(1)
                .ok_or_else(|| PropfirmError::Ledger {
                    reason: format!("{} line {}: missing amount column", path.display(), row),
                })?
                .parse()
                .map_err(|e| PropfirmError::Ledger {
                    reason: format!("{} line {}: invalid amount: {}", path.display(), row, e),
                })?;
            if !amount.is_finite() {
                return Err(PropfirmError::Ledger {
                    reason: format!("{} line {}: amount must be finite", path.display(), row),
                });
            }

            rows.push((date, amount));
        }

        debug!(path = %path.display(), rows = rows.len(), "ledger series loaded");
        Ok(Some(rows))
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn load_pnl(&self, stem: &str) -> Result<Vec<PnlEntry>, PropfirmError> {
        let rows = self.read_rows(stem, "pnl")?.ok_or_else(|| PropfirmError::Ledger {
            reason: format!("{} not found", self.csv_path(stem, "pnl").display()),
        })?;
        Ok(rows
            .into_iter()
            .map(|(date, amount)| PnlEntry { date, amount })
            .collect())
    }

    fn load_withdrawals(&self, stem: &str) -> Result<Vec<Withdrawal>, PropfirmError> {
        let rows = self.read_rows(stem, "withdrawals")?.unwrap_or_default();
        let mut withdrawals = Vec::with_capacity(rows.len());
        for (date, amount) in rows {
            if amount < 0.0 {
                return Err(PropfirmError::Ledger {
                    reason: format!("withdrawal on {} is negative", date),
                });
            }
            withdrawals.push(Withdrawal { date, amount });
        }
        Ok(withdrawals)
    }
}
