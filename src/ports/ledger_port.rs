//! Ledger access port trait.
//!
//! A ledger is identified by a stem; one stem names a PnL series and a
//! withdrawal series for the same account.

use crate::domain::account::Withdrawal;
use crate::domain::error::PropfirmError;
use crate::domain::pnl::PnlEntry;

pub trait LedgerPort {
    fn load_pnl(&self, stem: &str) -> Result<Vec<PnlEntry>, PropfirmError>;

    /// An account that never withdrew may have no withdrawal series at all.
    fn load_withdrawals(&self, stem: &str) -> Result<Vec<Withdrawal>, PropfirmError>;
}
