//! Argument bundle passed from generated glue into the verifier
//!
//! A bundle holds one invocation's captured arguments, named and ordered as
//! in the mocked method's signature, plus a typed slot that overrides use to
//! hand a stubbed return value back to the glue.
//!
//! Any `'static` value can be captured. Values captured with [`CallArgs::arg`]
//! render through `Debug` in history and diagnostics; values captured with
//! [`CallArgs::arg_opaque`] render as `<type name>`.

use crate::comparator::ArgValue;
use crate::error::{Result, SeamError};
use std::any::{self, Any};
use std::fmt;

struct ReturnSlot {
    value: Box<dyn Any>,
    type_name: &'static str,
}

type Render = fn(&dyn Any) -> String;

struct Captured {
    name: String,
    value: Box<dyn ArgValue>,
    render: Render,
}

fn render_debug<T: Any + fmt::Debug>(value: &dyn Any) -> String {
    value
        .downcast_ref::<T>()
        .map_or_else(|| render_opaque::<T>(value), |value| format!("{:?}", value))
}

fn render_opaque<T: Any>(_: &dyn Any) -> String {
    format!("<{}>", any::type_name::<T>())
}

/// Captured arguments of a single call
#[derive(Default)]
pub struct CallArgs {
    args: Vec<Captured>,
    ret: Option<ReturnSlot>,
}

impl CallArgs {
    /// Create an empty bundle (a method without parameters)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next positional argument
    pub fn arg<T: Any + fmt::Debug>(mut self, name: impl Into<String>, value: T) -> Self {
        self.push(name, value);
        self
    }

    /// Append an argument whose type has no `Debug` rendering
    pub fn arg_opaque<T: Any>(mut self, name: impl Into<String>, value: T) -> Self {
        self.push_opaque(name, value);
        self
    }

    /// Append the next positional argument in place
    pub fn push<T: Any + fmt::Debug>(&mut self, name: impl Into<String>, value: T) {
        self.capture(name.into(), Box::new(value), render_debug::<T>);
    }

    /// [`arg_opaque`](Self::arg_opaque) in place
    pub fn push_opaque<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.capture(name.into(), Box::new(value), render_opaque::<T>);
    }

    fn capture(&mut self, name: String, value: Box<dyn ArgValue>, render: Render) {
        self.args.push(Captured {
            name,
            value,
            render,
        });
    }

    /// Number of captured arguments
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if the bundle holds no arguments
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by position
    pub fn get(&self, index: usize) -> Result<&dyn ArgValue> {
        self.args
            .get(index)
            .map(|captured| captured.value.as_ref())
            .ok_or(SeamError::ArgumentOutOfRange {
                index,
                arity: self.args.len(),
            })
    }

    /// Get an argument by parameter name
    pub fn named(&self, name: &str) -> Result<&dyn ArgValue> {
        self.args
            .iter()
            .find(|captured| captured.name == name)
            .map(|captured| captured.value.as_ref())
            .ok_or_else(|| SeamError::UnknownArgument(name.to_string()))
    }

    /// Get an argument by position, downcast to its concrete type
    pub fn value<T: Any>(&self, index: usize) -> Result<&T> {
        let value = self.get(index)?;
        value
            .as_any()
            .downcast_ref::<T>()
            .ok_or(SeamError::TypeMismatch {
                expected: any::type_name::<T>(),
                actual: value.type_name(),
            })
    }

    /// Iterate over `(name, value)` pairs in signature order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ArgValue)> {
        self.args
            .iter()
            .map(|captured| (captured.name.as_str(), captured.value.as_ref()))
    }

    /// Store the return value for the glue to pick up
    pub fn set_return<T: Any>(&mut self, value: T) {
        self.ret = Some(ReturnSlot {
            value: Box::new(value),
            type_name: any::type_name::<T>(),
        });
    }

    /// Check if an override filled the return slot
    pub fn has_return(&self) -> bool {
        self.ret.is_some()
    }

    /// Take the return value out of the slot.
    ///
    /// Returns `Ok(None)` if no override set one. On a type mismatch the
    /// value stays in the slot.
    pub fn take_return<T: Any>(&mut self) -> Result<Option<T>> {
        let Some(slot) = self.ret.take() else {
            return Ok(None);
        };
        if !slot.value.is::<T>() {
            let actual = slot.type_name;
            self.ret = Some(slot);
            return Err(SeamError::ReturnTypeMismatch {
                expected: any::type_name::<T>(),
                actual,
            });
        }
        match slot.value.downcast::<T>() {
            Ok(value) => Ok(Some(*value)),
            Err(_) => Ok(None),
        }
    }

    /// Render each argument as `name=value` for history and diagnostics
    pub fn render(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|captured| format!("{}={}", captured.name, captured.rendered()))
            .collect()
    }
}

impl Captured {
    fn rendered(&self) -> String {
        let value: &dyn ArgValue = self.value.as_ref();
        (self.render)(value.as_any())
    }
}

impl fmt::Debug for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for captured in &self.args {
            map.entry(&captured.name, &format_args!("{}", captured.rendered()));
        }
        map.finish()
    }
}
