//! Verification API
//!
//! The entry points used by generated glue and by test authors. Everything
//! here routes through a [`SharedRegistry`]; the free functions use the
//! process-wide [`SharedRegistry::global`] instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use seamcheck::prelude::*;
//!
//! struct Repository {
//!     pool: u32,
//! }
//!
//! impl Mocked for Repository {
//!     const CLASS_NAME: &'static str = "Repository";
//! }
//!
//! // Generated glue for `fn update(&self, value: i32) -> bool`
//! impl Repository {
//!     fn update(&self, value: i32) -> bool {
//!         let mut args = dispatch(self, "update", CallArgs::new().arg("value", value))
//!             .unwrap_or_else(|e| panic!("{e}"));
//!         args.take_return().ok().flatten().unwrap_or_default()
//!     }
//! }
//!
//! let repo = Repository { pool: 4 };
//! let mock = mock_of(&repo);
//! mock.dupe_return("update", true);
//! mock.expect("update", vec![eq(1_i32)], CallCount::Exactly(2));
//!
//! repo.update(1);
//! repo.update(2);
//! repo.update(1);
//!
//! assert!(mock.verify("update", 3_u32));
//! reset_all();
//! ```

mod handle;
mod report;

pub use handle::MockHandle;
pub use report::VerificationReport;

use crate::call::CallArgs;
use crate::error::Result;
use crate::registry::{EntityId, SharedRegistry};

/// Types that have mocked glue; gives the class name ledgers are keyed by
pub trait Mocked {
    const CLASS_NAME: &'static str;
}

/// Handle on an instance's ledger set in the global registry, registering it
pub fn mock_of<T: Mocked>(instance: &T) -> MockHandle {
    SharedRegistry::global().mock(EntityId::of(instance), T::CLASS_NAME)
}

/// Handle on the default ledger set of `T` in the global registry
pub fn default_mock<T: Mocked>() -> MockHandle {
    SharedRegistry::global().default_mock(T::CLASS_NAME)
}

/// Ledger set a call on `instance` goes to: its own if registered, the
/// class default otherwise
pub fn resolve<T: Mocked>(instance: &T) -> MockHandle {
    SharedRegistry::global().resolve(EntityId::of(instance), T::CLASS_NAME)
}

/// Whether `instance` has its own ledger set in the global registry
pub fn is_registered<T>(instance: &T) -> bool {
    SharedRegistry::global().is_registered(EntityId::of(instance))
}

/// Record a call made on `instance`
pub fn record_call<T: Mocked>(instance: &T, method: &str, args: &CallArgs) -> Result<()> {
    resolve(instance).record_call(method, args)
}

/// Run the override of a call made on `instance`
pub fn invoke_override<T: Mocked>(instance: &T, method: &str, args: &mut CallArgs) -> bool {
    resolve(instance).invoke_override(method, args)
}

/// Override then record a call made on `instance`
pub fn dispatch<T: Mocked>(instance: &T, method: &str, args: CallArgs) -> Result<CallArgs> {
    resolve(instance).dispatch(method, args)
}

/// Discard every ledger set of the global registry
pub fn reset_all() {
    SharedRegistry::global().reset_all();
}
