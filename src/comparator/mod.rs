//! Comparators for call counts and captured arguments
//!
//! - [`CallCount`]: "called exactly / at least / at most / not N times, or never"
//! - [`ArgMatcher`]: "argument is anything / equal to / not equal to / satisfies P"
//!
//! The free functions below are shorthands for building argument matchers:
//!
//! ```rust,ignore
//! use seamcheck::comparator::{any, eq, ne, custom};
//!
//! handle.expect("update", vec![eq(1_i32), any(), ne("root")], CallCount::Exactly(2));
//! ```

mod argument;
mod count;

pub use argument::{ArgMatcher, ArgValue, CustomPredicate, ExpectedValue};
pub use count::CallCount;

/// Matcher accepting any argument
pub fn any() -> ArgMatcher {
    ArgMatcher::any()
}

/// Matcher accepting arguments equal to `expected`
pub fn eq<T>(expected: T) -> ArgMatcher
where
    T: std::any::Any + PartialEq + std::fmt::Debug + Send + Sync,
{
    ArgMatcher::eq(expected)
}

/// Matcher accepting arguments not equal to `expected`
pub fn ne<T>(expected: T) -> ArgMatcher
where
    T: std::any::Any + PartialEq + std::fmt::Debug + Send + Sync,
{
    ArgMatcher::ne(expected)
}

/// Matcher accepting arguments the typed predicate holds for
pub fn custom<T, F>(predicate: F) -> ArgMatcher
where
    T: std::any::Any,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    ArgMatcher::custom(predicate)
}
