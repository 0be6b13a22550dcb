//! Argument comparators over type-erased captured values
//!
//! Captured arguments are stored as `dyn ArgValue`, which any `'static`
//! type satisfies. A comparator re-checks the concrete type at the
//! comparison boundary: comparing against a value
//! of a different type is a [`SeamError::TypeMismatch`], never a plain
//! non-match.

use crate::error::{Result, SeamError};
use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

/// A captured argument value carrying its runtime type.
///
/// Implemented for every `'static` type: capturing an argument needs
/// neither `PartialEq` nor `Debug`. Those are only required by the matchers
/// that use them.
pub trait ArgValue: Any {
    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, used in diagnostics
    fn type_name(&self) -> &'static str;
}

impl<T: Any> ArgValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

type ErasedPredicate = Arc<dyn Fn(&dyn Any) -> Option<bool> + Send + Sync>;

/// User-supplied predicate bound to one argument type
#[derive(Clone)]
pub struct CustomPredicate {
    expected: &'static str,
    predicate: ErasedPredicate,
}

impl CustomPredicate {
    /// Wrap a typed predicate
    pub fn new<T, F>(predicate: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            expected: any::type_name::<T>(),
            predicate: Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&predicate)),
        }
    }

    /// Name of the type the predicate was declared over
    pub fn expected_type(&self) -> &'static str {
        self.expected
    }

    fn call(&self, captured: &dyn ArgValue) -> Result<bool> {
        (self.predicate)(captured.as_any()).ok_or(SeamError::TypeMismatch {
            expected: self.expected,
            actual: captured.type_name(),
        })
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Reference value of an equality matcher, compared through a downcast
#[derive(Clone)]
pub struct ExpectedValue {
    rendered: String,
    type_name: &'static str,
    equals: ErasedPredicate,
}

impl ExpectedValue {
    pub fn new<T>(expected: T) -> Self
    where
        T: Any + PartialEq + fmt::Debug + Send + Sync,
    {
        Self {
            rendered: format!("{:?}", expected),
            type_name: any::type_name::<T>(),
            equals: Arc::new(move |value: &dyn Any| {
                value.downcast_ref::<T>().map(|value| *value == expected)
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn equals(&self, captured: &dyn ArgValue) -> Result<bool> {
        (self.equals)(captured.as_any()).ok_or(SeamError::TypeMismatch {
            expected: self.type_name,
            actual: captured.type_name(),
        })
    }
}

impl fmt::Display for ExpectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl fmt::Debug for ExpectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedValue")
            .field("value", &self.rendered)
            .field("type", &self.type_name)
            .finish()
    }
}

/// Predicate over a single captured argument
#[derive(Clone, Debug)]
pub enum ArgMatcher {
    /// Accept any value of any type
    Any,
    /// Accept values equal to the expected one
    Equal(ExpectedValue),
    /// Accept values different from the expected one
    NotEqual(ExpectedValue),
    /// Accept values the predicate returns `true` for
    Custom(CustomPredicate),
}

impl ArgMatcher {
    /// Create a matcher accepting anything
    pub fn any() -> Self {
        ArgMatcher::Any
    }

    /// Create an equality matcher
    pub fn eq<T>(expected: T) -> Self
    where
        T: Any + PartialEq + fmt::Debug + Send + Sync,
    {
        ArgMatcher::Equal(ExpectedValue::new(expected))
    }

    /// Create an inequality matcher
    pub fn ne<T>(expected: T) -> Self
    where
        T: Any + PartialEq + fmt::Debug + Send + Sync,
    {
        ArgMatcher::NotEqual(ExpectedValue::new(expected))
    }

    /// Create a matcher from a typed predicate
    pub fn custom<T, F>(predicate: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        ArgMatcher::Custom(CustomPredicate::new(predicate))
    }

    /// Check a captured value against this matcher
    pub fn matches(&self, captured: &dyn ArgValue) -> Result<bool> {
        match self {
            ArgMatcher::Any => Ok(true),
            ArgMatcher::Equal(expected) => expected.equals(captured),
            ArgMatcher::NotEqual(expected) => expected.equals(captured).map(|equal| !equal),
            ArgMatcher::Custom(predicate) => predicate.call(captured),
        }
    }
}

impl fmt::Display for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgMatcher::Any => write!(f, "_"),
            ArgMatcher::Equal(expected) => write!(f, "== {}", expected),
            ArgMatcher::NotEqual(expected) => write!(f, "!= {}", expected),
            ArgMatcher::Custom(predicate) => write!(f, "custom<{}>", predicate.expected_type()),
        }
    }
}
