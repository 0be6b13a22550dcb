//! Registry of mocked entities
//!
//! [`MockRegistry`] owns every ledger set by value: instance ledgers keyed
//! by the instance's identity, class defaults keyed by class name. The two
//! maps are independent; choosing between an instance ledger and its class
//! default is left to the caller (see [`SharedRegistry::resolve`]).
//!
//! [`SharedRegistry`] is a cloneable handle around a registry that glue code
//! and tests can be given explicitly. [`SharedRegistry::global`] returns the
//! process-wide default instance.

use crate::config::VerifierConfig;
use crate::ledger::MockLedger;
use crate::verify::MockHandle;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Identity of a mocked instance (its address)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub usize);

impl EntityId {
    /// Identity of a live value.
    ///
    /// Zero-sized values may share an address and therefore an identity.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize)
    }

    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Lookup key of a ledger set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    /// A specific mocked instance
    Instance { id: EntityId, class_name: String },
    /// Instance-agnostic behavior of a class
    Default { class_name: String },
}

impl EntityKey {
    pub fn instance(id: EntityId, class_name: impl Into<String>) -> Self {
        EntityKey::Instance {
            id,
            class_name: class_name.into(),
        }
    }

    pub fn default_for(class_name: impl Into<String>) -> Self {
        EntityKey::Default {
            class_name: class_name.into(),
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            EntityKey::Instance { class_name, .. } | EntityKey::Default { class_name } => {
                class_name
            }
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Instance { id, class_name } => write!(f, "{}@{}", class_name, id),
            EntityKey::Default { class_name } => write!(f, "{}<default>", class_name),
        }
    }
}

/// Ledger sets removed from a registry by [`MockRegistry::take_all`]
#[derive(Debug, Default)]
pub struct Drained {
    pub instances: HashMap<EntityId, MockLedger>,
    pub defaults: HashMap<String, MockLedger>,
}

impl Drained {
    pub fn len(&self) -> usize {
        self.instances.len() + self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owner of every ledger set
#[derive(Debug, Default)]
pub struct MockRegistry {
    config: VerifierConfig,
    instances: HashMap<EntityId, MockLedger>,
    defaults: HashMap<String, MockLedger>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VerifierConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Ledger set of an instance, created empty on first access
    pub fn get_or_create(&mut self, id: EntityId, class_name: &str) -> &mut MockLedger {
        let config = &self.config;
        self.instances.entry(id).or_insert_with(|| {
            debug!(class = class_name, entity = %id, "registering mock instance");
            MockLedger::new(class_name, config.clone())
        })
    }

    /// Default ledger set of a class, created empty on first access
    pub fn get_or_create_default(&mut self, class_name: &str) -> &mut MockLedger {
        let config = &self.config;
        self.defaults
            .entry(class_name.to_string())
            .or_insert_with(|| {
                debug!(class = class_name, "registering class default");
                MockLedger::new(class_name, config.clone())
            })
    }

    /// Ledger set for a key, created on first access
    pub fn entry(&mut self, key: &EntityKey) -> &mut MockLedger {
        match key {
            EntityKey::Instance { id, class_name } => self.get_or_create(*id, class_name),
            EntityKey::Default { class_name } => self.get_or_create_default(class_name),
        }
    }

    /// Ledger set for a key, without creating it
    pub fn get(&self, key: &EntityKey) -> Option<&MockLedger> {
        match key {
            EntityKey::Instance { id, .. } => self.instances.get(id),
            EntityKey::Default { class_name } => self.defaults.get(class_name),
        }
    }

    /// Mutable ledger set for a key, without creating it
    pub fn get_mut(&mut self, key: &EntityKey) -> Option<&mut MockLedger> {
        match key {
            EntityKey::Instance { id, .. } => self.instances.get_mut(id),
            EntityKey::Default { class_name } => self.defaults.get_mut(class_name),
        }
    }

    /// Whether an instance has a ledger set; never creates one
    pub fn is_registered(&self, id: EntityId) -> bool {
        self.instances.contains_key(&id)
    }

    pub fn has_default(&self, class_name: &str) -> bool {
        self.defaults.contains_key(class_name)
    }

    /// Number of ledger sets (instances and class defaults)
    pub fn len(&self) -> usize {
        self.instances.len() + self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move every ledger set out, leaving the registry empty
    pub fn take_all(&mut self) -> Drained {
        Drained {
            instances: std::mem::take(&mut self.instances),
            defaults: std::mem::take(&mut self.defaults),
        }
    }

    /// Discard every instance ledger set and class default
    pub fn reset_all(&mut self) {
        let drained = self.take_all();
        debug!(discarded = drained.len(), "reset mock registry");
    }
}

static GLOBAL_REGISTRY: OnceLock<SharedRegistry> = OnceLock::new();

/// Cloneable, lockable handle to a [`MockRegistry`]
///
/// Overrides are always run with the lock released, so a behavior may call
/// back into the same registry.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<MockRegistry>>,
}

impl SharedRegistry {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockRegistry::with_config(config))),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static SharedRegistry {
        GLOBAL_REGISTRY.get_or_init(SharedRegistry::default)
    }

    /// Run `f` with exclusive access to the registry.
    ///
    /// `f` must not call back into this handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut MockRegistry) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn config(&self) -> VerifierConfig {
        self.inner.lock().config().clone()
    }

    /// Handle on an instance's ledger set, registering the instance
    pub fn mock(&self, id: EntityId, class_name: &str) -> MockHandle {
        self.inner.lock().get_or_create(id, class_name);
        MockHandle::new(self.clone(), EntityKey::instance(id, class_name))
    }

    /// Handle on a class's default ledger set, registering it
    pub fn default_mock(&self, class_name: &str) -> MockHandle {
        self.inner.lock().get_or_create_default(class_name);
        MockHandle::new(self.clone(), EntityKey::default_for(class_name))
    }

    /// Handle generated glue should record against: the instance's ledger
    /// set when the instance is registered, the class default otherwise.
    /// Registers nothing.
    pub fn resolve(&self, id: EntityId, class_name: &str) -> MockHandle {
        let key = if self.is_registered(id) {
            EntityKey::instance(id, class_name)
        } else {
            EntityKey::default_for(class_name)
        };
        MockHandle::new(self.clone(), key)
    }

    pub fn is_registered(&self, id: EntityId) -> bool {
        self.inner.lock().is_registered(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Discard every ledger set.
    ///
    /// The removed ledgers (and the user behaviors they own) are dropped
    /// after the lock is released.
    pub fn reset_all(&self) {
        let drained = self.inner.lock().take_all();
        debug!(discarded = drained.len(), "reset mock registry");
        drop(drained);
    }
}

impl fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("entities", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::CallArgs;
    use crate::comparator::CallCount;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = MockRegistry::new();
        let id = EntityId::from_raw(0x10);

        let first = registry.get_or_create(id, "Store") as *const MockLedger;
        registry
            .get_or_create(id, "Store")
            .record_call("save", &CallArgs::new())
            .unwrap();
        let second = registry.get_or_create(id, "Store");

        assert_eq!(second.call_count("save"), 1);
        assert!(std::ptr::eq(first, second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_instance_and_default_are_separate() {
        let mut registry = MockRegistry::new();
        let id = EntityId::from_raw(1);

        registry
            .get_or_create(id, "Store")
            .record_call("save", &CallArgs::new())
            .unwrap();
        registry.get_or_create_default("Store");

        assert!(registry.is_registered(id));
        assert!(registry.has_default("Store"));
        assert_eq!(
            registry
                .get(&EntityKey::default_for("Store"))
                .unwrap()
                .call_count("save"),
            0
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_is_registered_has_no_side_effect() {
        let registry = MockRegistry::new();
        assert!(!registry.is_registered(EntityId::from_raw(7)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reset_all() {
        let mut registry = MockRegistry::new();
        registry.reset_all();

        let ids: Vec<_> = (1..=3).map(EntityId::from_raw).collect();
        for id in &ids {
            registry.get_or_create(*id, "Store");
        }
        registry.get_or_create_default("Store");

        registry.reset_all();
        assert!(registry.is_empty());
        for id in &ids {
            assert!(!registry.is_registered(*id));
        }
    }

    #[test]
    fn test_entity_id_of_value() {
        let a = 1_u64;
        let b = 2_u64;
        assert_eq!(EntityId::of(&a), EntityId::of(&a));
        assert_ne!(EntityId::of(&a), EntityId::of(&b));
    }

    #[test]
    fn test_entity_key_display() {
        let key = EntityKey::instance(EntityId::from_raw(255), "Store");
        assert_eq!(key.to_string(), "Store@0xff");
        assert_eq!(EntityKey::default_for("Store").to_string(), "Store<default>");
        assert_eq!(key.class_name(), "Store");
    }

    #[test]
    fn test_shared_resolve_prefers_instance() {
        let shared = SharedRegistry::new(VerifierConfig::default());
        let id = EntityId::from_raw(42);

        let resolved = shared.resolve(id, "Store");
        assert_eq!(resolved.key(), &EntityKey::default_for("Store"));
        assert!(shared.is_empty());

        shared.mock(id, "Store");
        let resolved = shared.resolve(id, "Store");
        assert_eq!(resolved.key(), &EntityKey::instance(id, "Store"));
    }

    #[test]
    fn test_shared_reset_all() {
        let shared = SharedRegistry::new(VerifierConfig::quiet());
        let id = EntityId::from_raw(9);
        let handle = shared.mock(id, "Store");
        handle.record_call("save", &CallArgs::new()).unwrap();

        shared.reset_all();
        assert!(!shared.is_registered(id));
        assert!(handle.verify("save", CallCount::Never));
        assert!(!shared.is_registered(id));
    }
}
