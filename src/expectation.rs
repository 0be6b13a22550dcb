//! Argument expectations attached to a mocked method
//!
//! An expectation is evaluated against every call recorded for its method,
//! counting the calls whose arguments it accepts. The count is only checked
//! against the expectation's [`CallCount`] when verification is requested.

use crate::call::CallArgs;
use crate::comparator::{ArgMatcher, CallCount};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Predicate over a whole argument bundle
pub type BundlePredicate = Arc<dyn Fn(&CallArgs) -> Result<bool> + Send + Sync>;

/// How an expectation decides whether a call matches
#[derive(Clone)]
pub enum ArgPredicate {
    /// One matcher per leading argument, combined with AND
    Positional(Vec<ArgMatcher>),
    /// Free-form predicate over the bundle
    Bundle(BundlePredicate),
}

impl ArgPredicate {
    /// Evaluate against one call's arguments
    pub fn evaluate(&self, args: &CallArgs) -> Result<bool> {
        match self {
            ArgPredicate::Positional(matchers) => {
                // No short-circuit: a type mismatch on any argument must surface
                let mut accepted = true;
                for (index, matcher) in matchers.iter().enumerate() {
                    accepted &= matcher.matches(args.get(index)?)?;
                }
                Ok(accepted)
            }
            ArgPredicate::Bundle(predicate) => predicate(args),
        }
    }
}

impl fmt::Display for ArgPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPredicate::Positional(matchers) => {
                let parts: Vec<String> = matchers.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
            ArgPredicate::Bundle(_) => write!(f, "(<predicate>)"),
        }
    }
}

impl fmt::Debug for ArgPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgPredicate{}", self)
    }
}

/// Expected arguments together with how many calls should carry them
#[derive(Clone, Debug)]
pub struct Expectation {
    predicate: ArgPredicate,
    times: CallCount,
    matched: u32,
}

impl Expectation {
    /// Expect calls whose leading arguments satisfy `matchers`.
    ///
    /// Matcher `i` is applied to argument `i`, and a call matches only when
    /// every matcher accepts its argument (AND, not OR). Arguments beyond
    /// the last matcher are ignored; more matchers than arguments is
    /// [`SeamError::ArgumentOutOfRange`](crate::SeamError::ArgumentOutOfRange)
    /// when a call is recorded.
    pub fn new(matchers: Vec<ArgMatcher>, times: CallCount) -> Self {
        Self {
            predicate: ArgPredicate::Positional(matchers),
            times,
            matched: 0,
        }
    }

    /// Expect calls accepted by a predicate over the whole bundle
    pub fn with_predicate<F>(predicate: F, times: CallCount) -> Self
    where
        F: Fn(&CallArgs) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            predicate: ArgPredicate::Bundle(Arc::new(predicate)),
            times,
            matched: 0,
        }
    }

    /// Observe one call; returns whether it matched.
    ///
    /// A non-matching call is not an error. Only a broken argument
    /// contract (type mismatch, missing argument) is.
    pub fn record(&mut self, args: &CallArgs) -> Result<bool> {
        let matched = self.predicate.evaluate(args)?;
        if matched {
            self.credit();
        }
        Ok(matched)
    }

    /// Count one matching call
    pub(crate) fn credit(&mut self) {
        self.matched = self.matched.saturating_add(1);
    }

    /// Check the match counter against the expected count
    pub fn is_satisfied(&self) -> bool {
        self.times.compare(self.matched)
    }

    /// Number of recorded calls that matched
    pub fn matched(&self) -> u32 {
        self.matched
    }

    pub fn times(&self) -> CallCount {
        self.times
    }

    pub fn predicate(&self) -> &ArgPredicate {
        &self.predicate
    }

    /// Snapshot for reporting
    pub fn outcome(&self) -> ExpectationOutcome {
        ExpectationOutcome {
            arguments: self.predicate.to_string(),
            times: self.times,
            matched: self.matched,
            satisfied: self.is_satisfied(),
        }
    }
}

/// Result of checking one expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationOutcome {
    pub arguments: String,
    pub times: CallCount,
    pub matched: u32,
    pub satisfied: bool,
}

impl fmt::Display for ExpectationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.satisfied {
            write!(f, "arguments {} matched {} times", self.arguments, self.matched)
        } else {
            write!(
                f,
                "arguments {}: {}",
                self.arguments,
                self.times.explain(self.matched)
            )
        }
    }
}
