//! Stock ledger: the single counter that gates every sale.

mod ledger;

pub use ledger::*;
