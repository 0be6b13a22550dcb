//! Ledger set of one mocked entity

use super::method::{Behavior, MethodLedger, PendingCheck};
use crate::call::CallArgs;
use crate::comparator::CallCount;
use crate::config::VerifierConfig;
use crate::error::Result;
use crate::expectation::Expectation;
use crate::verify::VerificationReport;
use std::collections::BTreeMap;
use tracing::debug;

/// Every method ledger of one mocked instance, or of a class default
#[derive(Debug)]
pub struct MockLedger {
    class_name: String,
    config: VerifierConfig,
    methods: BTreeMap<String, MethodLedger>,
}

impl MockLedger {
    pub fn new(class_name: impl Into<String>, config: VerifierConfig) -> Self {
        Self {
            class_name: class_name.into(),
            config,
            methods: BTreeMap::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    fn method_mut(&mut self, method: &str) -> &mut MethodLedger {
        let class_name = &self.class_name;
        let config = &self.config;
        self.methods.entry(method.to_string()).or_insert_with(|| {
            debug!(class = %class_name, method, "creating method ledger");
            MethodLedger::new(method, config)
        })
    }

    /// Ledger of a method, if it was ever touched
    pub fn method(&self, method: &str) -> Option<&MethodLedger> {
        self.methods.get(method)
    }

    /// Record one invocation of `method`
    pub fn record_call(&mut self, method: &str, args: &CallArgs) -> Result<()> {
        self.method_mut(method).record_call(args)
    }

    /// Count one invocation of `method` and detach its expectation checks,
    /// see [`MethodLedger::begin_call`]
    pub fn begin_call(&mut self, method: &str, args: &CallArgs) -> Vec<PendingCheck> {
        let ledger = self.method_mut(method);
        ledger.begin_call(args);
        ledger.pending_checks()
    }

    /// Credit matched calls to expectations of `method`, if it still exists
    pub fn credit(&mut self, method: &str, matched: &[u64]) {
        if let Some(ledger) = self.methods.get_mut(method) {
            ledger.credit(matched);
        }
    }

    /// Run the override chain of `method`; returns whether one ran
    pub fn invoke_override(&self, method: &str, args: &mut CallArgs) -> bool {
        self.methods
            .get(method)
            .is_some_and(|ledger| ledger.invoke_override(args))
    }

    /// Cloned override chain of `method` (empty when none is set)
    pub fn behaviors(&self, method: &str) -> Vec<Behavior> {
        self.methods
            .get(method)
            .map(MethodLedger::behaviors)
            .unwrap_or_default()
    }

    /// Install an override on `method`, see [`MethodLedger::set_override`]
    pub fn dupe(&mut self, method: &str, behavior: Behavior, compose: bool) {
        debug!(class = %self.class_name, method, compose, "installing override");
        self.method_mut(method).set_override(behavior, compose);
    }

    /// Attach an expectation to `method`
    pub fn expect(&mut self, method: &str, expectation: Expectation) {
        debug!(
            class = %self.class_name,
            method,
            arguments = %expectation.predicate(),
            times = %expectation.times(),
            "registering expectation"
        );
        self.method_mut(method).add_expectation(expectation);
    }

    /// Clear the expectations of one method, or of every method with `None`
    pub fn clear_expectations(&mut self, method: Option<&str>) {
        match method {
            Some(method) => {
                if let Some(ledger) = self.methods.get_mut(method) {
                    ledger.clear_expectations();
                }
            }
            None => {
                for ledger in self.methods.values_mut() {
                    ledger.clear_expectations();
                }
            }
        }
    }

    /// Total calls recorded for `method` (0 if never touched)
    pub fn call_count(&self, method: &str) -> u32 {
        self.methods.get(method).map_or(0, MethodLedger::call_count)
    }

    pub fn is_method_registered(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Names of every method with a ledger, sorted
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Build the verification report for `method`
    pub fn report(&self, method: &str, times: CallCount) -> VerificationReport {
        VerificationReport::build(&self.class_name, method, self.methods.get(method), times)
    }

    /// Check `method` against `times` and all of its expectations.
    ///
    /// A method that was never called passes whenever `times` accepts zero
    /// calls, so `AtMost(n)` holds for it just like `Never` does.
    pub fn verify(&self, method: &str, times: CallCount, verbose: bool) -> bool {
        let report = self.report(method, times);
        if verbose && !report.passed {
            report.log_failure();
        }
        report.passed
    }

    /// Sugar for `verify(method, AtLeast(1), verbose)`
    pub fn verify_called(&self, method: &str, verbose: bool) -> bool {
        self.verify(method, CallCount::AtLeast(1), verbose)
    }
}
