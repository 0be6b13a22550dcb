use thiserror::Error;

/// Main error type for seamcheck operations
#[derive(Error, Debug)]
pub enum SeamError {
    #[error("Argument type mismatch: comparator expects {expected}, captured value is {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Argument index {index} out of range for a call with {arity} captured arguments")]
    ArgumentOutOfRange { index: usize, arity: usize },

    #[error("No captured argument named '{0}'")]
    UnknownArgument(String),

    #[error("Return slot type mismatch: requested {expected}, slot holds {actual}")]
    ReturnTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for seamcheck operations
pub type Result<T> = std::result::Result<T, SeamError>;

impl SeamError {
    /// Check if this error is a broken contract between the glue and the
    /// comparators rather than an I/O style failure.
    ///
    /// Contract violations must fail the current test case; they are never
    /// a legitimate "did not match".
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SeamError::TypeMismatch { .. }
                | SeamError::ArgumentOutOfRange { .. }
                | SeamError::UnknownArgument(_)
                | SeamError::ReturnTypeMismatch { .. }
        )
    }
}
