//! Captured call data: argument bundles and recorded history

mod args;
mod history;

pub use args::CallArgs;
pub use history::{CallHistory, CallRecord, Timestamp};
