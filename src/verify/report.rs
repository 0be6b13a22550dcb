//! Verification reports

use crate::comparator::CallCount;
use crate::error::Result;
use crate::expectation::ExpectationOutcome;
use crate::ledger::MethodLedger;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Outcome of verifying one method of one mocked entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub class_name: String,
    pub method: String,
    /// Whether the method had a ledger at all
    pub registered: bool,
    /// Total calls recorded
    pub calls: u32,
    /// Comparator applied to `calls`
    pub expected: CallCount,
    pub count_satisfied: bool,
    pub expectations: Vec<ExpectationOutcome>,
    /// Count satisfied and every expectation satisfied
    pub passed: bool,
}

impl VerificationReport {
    /// Evaluate a method ledger (or its absence) against `expected`
    pub fn build(
        class_name: &str,
        method: &str,
        ledger: Option<&MethodLedger>,
        expected: CallCount,
    ) -> Self {
        let (calls, expectations) = match ledger {
            Some(ledger) => (ledger.call_count(), ledger.outcomes()),
            None => (0, Vec::new()),
        };
        let count_satisfied = expected.compare(calls);
        let passed = count_satisfied && expectations.iter().all(|e| e.satisfied);

        Self {
            class_name: class_name.to_string(),
            method: method.to_string(),
            registered: ledger.is_some(),
            calls,
            expected,
            count_satisfied,
            expectations,
            passed,
        }
    }

    /// Human-readable reasons for a failure, empty when the report passed
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        if !self.count_satisfied {
            failures.push(self.expected.explain(self.calls));
        }
        failures.extend(
            self.expectations
                .iter()
                .filter(|e| !e.satisfied)
                .map(ToString::to_string),
        );
        failures
    }

    /// Emit the failure diagnostic for this report
    pub fn log_failure(&self) {
        if self.registered {
            warn!(class = %self.class_name, method = %self.method, "{}", self);
        } else {
            warn!(
                "Verify error for method {}::{}, method was never called while {}",
                self.class_name,
                self.method,
                self.expected.explain(0)
            );
        }
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "PASSED" } else { "FAILED" };
        write!(
            f,
            "verify {}::{} {}: {} observed {}",
            self.class_name,
            self.method,
            verdict,
            self.calls,
            if self.calls == 1 { "call" } else { "calls" }
        )?;
        for failure in self.failures() {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}
