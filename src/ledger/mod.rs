//! Call ledgers
//!
//! A [`MethodLedger`] tracks one method of one mocked entity; a
//! [`MockLedger`] groups every method ledger of that entity.

mod method;
mod mock;

pub use method::{Behavior, MethodLedger, PendingCheck};
pub use mock::MockLedger;
