//! Per-method call record

use crate::call::{CallArgs, CallHistory, CallRecord, Timestamp};
use crate::comparator::CallCount;
use crate::config::VerifierConfig;
use crate::error::Result;
use crate::expectation::{ArgPredicate, Expectation, ExpectationOutcome};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Process-wide, so ids stay unique across ledgers recreated by a reset
static NEXT_EXPECTATION_ID: AtomicU64 = AtomicU64::new(0);

/// Expectation predicate detached from its ledger, keyed by expectation id
pub type PendingCheck = (u64, ArgPredicate);

/// Substitute behavior run in place of (or alongside) a mocked method
pub type Behavior = Arc<dyn Fn(&mut CallArgs) + Send + Sync>;

/// Call count, override chain and expectations of one method on one entity
pub struct MethodLedger {
    method: String,
    calls: u32,
    behaviors: Vec<Behavior>,
    expectations: Vec<(u64, Expectation)>,
    history: CallHistory,
    capture_history: bool,
}

impl MethodLedger {
    pub fn new(method: impl Into<String>, config: &VerifierConfig) -> Self {
        Self {
            method: method.into(),
            calls: 0,
            behaviors: Vec::new(),
            expectations: Vec::new(),
            history: CallHistory::new(config.history_limit),
            capture_history: config.capture_history,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Record one invocation.
    ///
    /// The call count is bumped before any expectation sees the call, and
    /// stays bumped if an expectation reports a broken argument contract.
    pub fn record_call(&mut self, args: &CallArgs) -> Result<()> {
        self.begin_call(args);
        for (_, expectation) in &mut self.expectations {
            expectation.record(args)?;
        }
        Ok(())
    }

    /// Count one invocation and append it to the history, without running
    /// expectations. Returns the new call count.
    pub fn begin_call(&mut self, args: &CallArgs) -> u32 {
        self.calls = self.calls.saturating_add(1);
        trace!(method = %self.method, call = self.calls, "recorded call");

        if self.capture_history {
            self.history.push(CallRecord {
                sequence: u64::from(self.calls),
                at: Timestamp::now(),
                arguments: args.render(),
            });
        }
        self.calls
    }

    /// Predicates of the attached expectations, in declaration order
    pub fn pending_checks(&self) -> Vec<PendingCheck> {
        self.expectations
            .iter()
            .map(|(id, expectation)| (*id, expectation.predicate().clone()))
            .collect()
    }

    /// Count one matching call for each listed expectation.
    ///
    /// Ids of expectations cleared in the meantime are skipped.
    pub fn credit(&mut self, matched: &[u64]) {
        for (id, expectation) in &mut self.expectations {
            if matched.contains(id) {
                expectation.credit();
            }
        }
    }

    /// Run the override chain, if any; returns whether one ran
    pub fn invoke_override(&self, args: &mut CallArgs) -> bool {
        for behavior in &self.behaviors {
            behavior(&mut *args);
        }
        self.has_override()
    }

    /// Install an override.
    ///
    /// With `compose` set and an override already present, the new behavior
    /// runs after the existing ones. Otherwise it replaces them and starts a
    /// fresh stubbing session: the call count and history are reset.
    pub fn set_override(&mut self, behavior: Behavior, compose: bool) {
        if compose && !self.behaviors.is_empty() {
            self.behaviors.push(behavior);
        } else {
            self.behaviors = vec![behavior];
            self.calls = 0;
            self.history.clear();
        }
    }

    /// Cloned override chain, for running without holding a registry lock
    pub fn behaviors(&self) -> Vec<Behavior> {
        self.behaviors.clone()
    }

    pub fn has_override(&self) -> bool {
        !self.behaviors.is_empty()
    }

    pub fn add_expectation(&mut self, expectation: Expectation) {
        let id = NEXT_EXPECTATION_ID.fetch_add(1, Ordering::Relaxed);
        self.expectations.push((id, expectation));
    }

    /// Drop every expectation; the call count is kept
    pub fn clear_expectations(&mut self) {
        self.expectations.clear();
    }

    pub fn expectations(&self) -> impl Iterator<Item = &Expectation> {
        self.expectations.iter().map(|(_, expectation)| expectation)
    }

    pub fn call_count(&self) -> u32 {
        self.calls
    }

    pub fn history(&self) -> &CallHistory {
        &self.history
    }

    /// Every expectation holds and the total count satisfies `times`
    pub fn is_satisfied(&self, times: CallCount) -> bool {
        self.expectations().all(Expectation::is_satisfied) && times.compare(self.calls)
    }

    pub fn outcomes(&self) -> Vec<ExpectationOutcome> {
        self.expectations().map(Expectation::outcome).collect()
    }
}

impl fmt::Debug for MethodLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodLedger")
            .field("method", &self.method)
            .field("calls", &self.calls)
            .field("overrides", &self.behaviors.len())
            .field("expectations", &self.expectations.len())
            .finish()
    }
}
