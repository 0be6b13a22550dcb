//! Call-count comparators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparator over the number of times a method was called
///
/// The variant set is closed; `compare` and `explain` match exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallCount {
    /// Called exactly `n` times
    Exactly(u32),
    /// Never called; same as `Exactly(0)`
    Never,
    /// Called `n` times or more
    AtLeast(u32),
    /// Called `n` times or fewer
    AtMost(u32),
    /// Called any number of times other than `n`
    NotEqual(u32),
}

impl CallCount {
    /// Check an observed call count against this comparator
    pub fn compare(&self, observed: u32) -> bool {
        match *self {
            CallCount::Exactly(n) => observed == n,
            CallCount::Never => observed == 0,
            CallCount::AtLeast(n) => observed >= n,
            CallCount::AtMost(n) => observed <= n,
            CallCount::NotEqual(n) => observed != n,
        }
    }

    /// Render a human-readable description of a mismatch
    pub fn explain(&self, observed: u32) -> String {
        match *self {
            CallCount::Exactly(n) => format!(
                "expected exactly {} {} but received {}",
                n,
                calls(n),
                observed
            ),
            CallCount::Never => format!(
                "expected the method to never be called but received {} {}",
                observed,
                calls(observed)
            ),
            CallCount::AtLeast(n) => format!(
                "expected at least {} {} but received {}",
                n,
                calls(n),
                observed
            ),
            CallCount::AtMost(n) => format!(
                "expected at most {} {} but received {}",
                n,
                calls(n),
                observed
            ),
            CallCount::NotEqual(n) => format!(
                "expected any call count other than {} but received {}",
                n, observed
            ),
        }
    }

    /// The literal parameter of the comparator
    pub fn threshold(&self) -> u32 {
        match *self {
            CallCount::Exactly(n)
            | CallCount::AtLeast(n)
            | CallCount::AtMost(n)
            | CallCount::NotEqual(n) => n,
            CallCount::Never => 0,
        }
    }

    /// Whether a method that was never called satisfies this comparator
    pub fn accepts_zero(&self) -> bool {
        self.compare(0)
    }
}

fn calls(n: u32) -> &'static str {
    if n == 1 {
        "call"
    } else {
        "calls"
    }
}

impl Default for CallCount {
    /// "Called at least once", the default of `verify`
    fn default() -> Self {
        CallCount::AtLeast(1)
    }
}

impl From<u32> for CallCount {
    fn from(n: u32) -> Self {
        CallCount::Exactly(n)
    }
}

impl fmt::Display for CallCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallCount::Exactly(n) => write!(f, "exactly {}", n),
            CallCount::Never => write!(f, "never"),
            CallCount::AtLeast(n) => write!(f, "at least {}", n),
            CallCount::AtMost(n) => write!(f, "at most {}", n),
            CallCount::NotEqual(n) => write!(f, "not {}", n),
        }
    }
}
