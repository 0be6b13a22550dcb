pub mod call;
pub mod comparator;
pub mod config;
pub mod error;
pub mod expectation;
pub mod ledger;
pub mod registry;
pub mod verify;

pub use call::{CallArgs, CallRecord};
pub use comparator::{ArgMatcher, ArgValue, CallCount};
pub use config::VerifierConfig;
pub use error::{Result, SeamError};
pub use expectation::Expectation;
pub use registry::{EntityId, EntityKey, MockRegistry, SharedRegistry};
pub use verify::{MockHandle, Mocked, VerificationReport};

/// Prelude for easy imports
pub mod prelude {
    pub use crate::call::CallArgs;
    pub use crate::comparator::{any, custom, eq, ne, CallCount};
    pub use crate::verify::{
        default_mock, dispatch, invoke_override, mock_of, record_call, reset_all, resolve,
        MockHandle, Mocked,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
