use serde::{Deserialize, Serialize};

/// Verifier configuration shared by every ledger of a registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Emit diagnostics when a verification fails
    pub verbose: bool,
    /// Keep a per-method history of recorded calls
    pub capture_history: bool,
    /// Maximum number of history entries kept per method (oldest dropped first)
    pub history_limit: Option<usize>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            capture_history: true,
            history_limit: Some(1024),
        }
    }
}

impl VerifierConfig {
    /// Configuration that records counts only, with no history and no diagnostics
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            capture_history: false,
            history_limit: None,
        }
    }

    /// Set the default verbosity of `verify`
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable or disable call history capture
    pub fn with_history(mut self, capture: bool) -> Self {
        self.capture_history = capture;
        self
    }

    /// Bound the history kept per method; `None` keeps everything
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}
