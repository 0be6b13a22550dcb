//! Handle on one entity's ledger set inside a shared registry

use super::report::VerificationReport;
use crate::call::{CallArgs, CallRecord};
use crate::comparator::{ArgMatcher, CallCount};
use crate::error::Result;
use crate::expectation::Expectation;
use crate::ledger::Behavior;
use crate::registry::{EntityKey, SharedRegistry};
use std::sync::Arc;

/// Recording, stubbing and verification entry points for one mocked entity
///
/// Every operation locks the registry for its own duration only. Handles
/// stay valid across [`SharedRegistry::reset_all`]: the next recording or
/// declaration recreates an empty ledger set, while read-only operations
/// see an unregistered entity.
#[derive(Clone, Debug)]
pub struct MockHandle {
    registry: SharedRegistry,
    key: EntityKey,
}

impl MockHandle {
    pub fn new(registry: SharedRegistry, key: EntityKey) -> Self {
        Self { registry, key }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Whether the entity currently has a ledger set
    pub fn is_registered(&self) -> bool {
        self.registry.with(|registry| registry.get(&self.key).is_some())
    }

    // ------------------------------------------------------------------
    // Glue-facing entry points
    // ------------------------------------------------------------------

    /// Record one invocation of `method`.
    ///
    /// The call is counted under the registry lock. Expectation predicates
    /// then run with the lock released, so they may query this handle and
    /// see the count that includes the current call. Evaluation stops at
    /// the first broken argument contract; matches found before it are
    /// still credited.
    pub fn record_call(&self, method: &str, args: &CallArgs) -> Result<()> {
        let checks = self
            .registry
            .with(|registry| registry.entry(&self.key).begin_call(method, args));

        let mut matched = Vec::new();
        let mut outcome = Ok(());
        for (id, predicate) in &checks {
            match predicate.evaluate(args) {
                Ok(true) => matched.push(*id),
                Ok(false) => {}
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        if !matched.is_empty() {
            self.registry.with(|registry| {
                if let Some(mock) = registry.get_mut(&self.key) {
                    mock.credit(method, &matched);
                }
            });
        }
        outcome
    }

    /// Run the override chain of `method` with the registry unlocked.
    ///
    /// Returns whether an override ran; a no-op when none is set.
    pub fn invoke_override(&self, method: &str, args: &mut CallArgs) -> bool {
        let behaviors = self.registry.with(|registry| {
            registry
                .get(&self.key)
                .map(|mock| mock.behaviors(method))
                .unwrap_or_default()
        });
        for behavior in &behaviors {
            behavior(&mut *args);
        }
        !behaviors.is_empty()
    }

    /// Full mocked-method sequence: run the override, then record the call.
    ///
    /// Returns the bundle so the caller can take the stubbed return value.
    pub fn dispatch(&self, method: &str, mut args: CallArgs) -> Result<CallArgs> {
        self.invoke_override(method, &mut args);
        self.record_call(method, &args)?;
        Ok(args)
    }

    // ------------------------------------------------------------------
    // Test-author entry points
    // ------------------------------------------------------------------

    /// Install an override, or combine it with the current one when
    /// `compose` is set. A non-composed override resets the call count.
    pub fn set_override(&self, method: &str, behavior: Behavior, compose: bool) {
        self.registry
            .with(|registry| registry.entry(&self.key).dupe(method, behavior, compose));
    }

    /// Replace the behavior of `method`, starting a fresh call count
    pub fn dupe<F>(&self, method: &str, behavior: F)
    where
        F: Fn(&mut CallArgs) + Send + Sync + 'static,
    {
        self.set_override(method, Arc::new(behavior), false);
    }

    /// Run `behavior` after the current override of `method`
    pub fn dupe_composed<F>(&self, method: &str, behavior: F)
    where
        F: Fn(&mut CallArgs) + Send + Sync + 'static,
    {
        self.set_override(method, Arc::new(behavior), true);
    }

    /// Make `method` return a clone of `value`.
    ///
    /// Composes with an existing override, so argument-inspecting dupes
    /// keep running.
    pub fn dupe_return<T>(&self, method: &str, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.dupe_composed(method, move |args| args.set_return(value.clone()));
    }

    /// Expect calls whose leading arguments satisfy `matchers`
    pub fn expect(&self, method: &str, matchers: Vec<ArgMatcher>, times: impl Into<CallCount>) {
        self.add_expectation(method, Expectation::new(matchers, times.into()));
    }

    /// Expect calls accepted by a predicate over the whole bundle
    pub fn expect_with<F>(&self, method: &str, predicate: F, times: impl Into<CallCount>)
    where
        F: Fn(&CallArgs) -> Result<bool> + Send + Sync + 'static,
    {
        self.add_expectation(method, Expectation::with_predicate(predicate, times.into()));
    }

    pub fn add_expectation(&self, method: &str, expectation: Expectation) {
        self.registry
            .with(|registry| registry.entry(&self.key).expect(method, expectation));
    }

    /// Drop the expectations of `method`; its call count is kept
    pub fn clear_expectations(&self, method: &str) {
        self.registry.with(|registry| {
            if registry.get(&self.key).is_some() {
                registry.entry(&self.key).clear_expectations(Some(method));
            }
        });
    }

    /// Drop the expectations of every method of the entity
    pub fn clear_all_expectations(&self) {
        self.registry.with(|registry| {
            if registry.get(&self.key).is_some() {
                registry.entry(&self.key).clear_expectations(None);
            }
        });
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Verification report of `method` against `times`
    pub fn report(&self, method: &str, times: impl Into<CallCount>) -> VerificationReport {
        let times = times.into();
        self.registry.with(|registry| match registry.get(&self.key) {
            Some(mock) => mock.report(method, times),
            None => VerificationReport::build(self.key.class_name(), method, None, times),
        })
    }

    /// Check `method` against `times` and its expectations, emitting a
    /// diagnostic on failure when the registry is configured verbose.
    ///
    /// A method that was never called passes for any comparator accepting
    /// zero calls, including `AtMost(n)`.
    pub fn verify(&self, method: &str, times: impl Into<CallCount>) -> bool {
        let verbose = self.registry.config().verbose;
        self.verify_with(method, times, verbose)
    }

    /// [`verify`](Self::verify) with explicit verbosity
    pub fn verify_with(&self, method: &str, times: impl Into<CallCount>, verbose: bool) -> bool {
        let report = self.report(method, times);
        if verbose && !report.passed {
            report.log_failure();
        }
        report.passed
    }

    /// Sugar for `verify(method, AtLeast(1))`
    pub fn verify_called(&self, method: &str) -> bool {
        self.verify(method, CallCount::AtLeast(1))
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn call_count(&self, method: &str) -> u32 {
        self.registry.with(|registry| {
            registry
                .get(&self.key)
                .map_or(0, |mock| mock.call_count(method))
        })
    }

    /// Recorded calls of `method`, oldest first
    pub fn history(&self, method: &str) -> Vec<CallRecord> {
        self.registry.with(|registry| {
            registry
                .get(&self.key)
                .and_then(|mock| mock.method(method))
                .map(|ledger| ledger.history().records().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Names of every method with a ledger
    pub fn methods(&self) -> Vec<String> {
        self.registry.with(|registry| {
            registry
                .get(&self.key)
                .map(|mock| mock.methods().map(str::to_string).collect())
                .unwrap_or_default()
        })
    }
}
