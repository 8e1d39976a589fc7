//! Internal service registration storage.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::descriptors::Ownership;
use crate::facts::CtorFn;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// Type-erased Arc for instance storage.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// One registration: lifetime, disposal responsibility, and constructor.
pub(crate) struct ServiceRegistration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ownership: Ownership,
    pub(crate) ctor: CtorFn,
    /// Singleton cache, lock-free after first initialization.
    pub(crate) single: Option<OnceCell<AnyArc>>,
}

impl ServiceRegistration {
    pub(crate) fn new(lifetime: Lifetime, ownership: Ownership, ctor: CtorFn) -> Self {
        let single = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };
        Self {
            lifetime,
            ownership,
            ctor,
            single,
        }
    }
}

/// Registry holding manual registrations: single-bound services plus
/// append-only multi-bound trait implementations.
#[derive(Default)]
pub(crate) struct Registry {
    one: HashMap<Key, Arc<ServiceRegistration>>,
    many: HashMap<Key, Vec<Arc<ServiceRegistration>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: Key, registration: ServiceRegistration) {
        self.one.insert(key, Arc::new(registration));
    }

    pub(crate) fn append(&mut self, key: Key, registration: ServiceRegistration) {
        self.many
            .entry(key)
            .or_default()
            .push(Arc::new(registration));
    }

    pub(crate) fn get(&self, key: &Key) -> Option<&Arc<ServiceRegistration>> {
        self.one.get(key)
    }

    pub(crate) fn get_many(&self, key: &Key) -> &[Arc<ServiceRegistration>] {
        self.many.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.one.contains_key(key)
    }
}
