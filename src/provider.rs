//! Service provider, scopes, and the resolver context.
//!
//! Resolution is synchronous and runs entirely on the caller's stack. A
//! request is satisfied from the manual registry first; unregistered
//! services go to the registration sources, whose synthesized
//! registrations are memoized per provider while instances stay cached per
//! scope. Disposal hooks run LIFO when a scope is disposed, and only for
//! container-owned instances; externally-owned services (mocks in
//! particular) are never disposed here.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::descriptors::Ownership;
use crate::error::{DiError, DiResult};
use crate::facts::ServiceRequest;
use crate::internal::DisposeBag;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Registry, ServiceRegistration};
use crate::source::{RegistrationLookup, RegistrationSource};
use crate::traits::{Dispose, Resolver};

const MAX_RESOLUTION_DEPTH: usize = 100;

pub(crate) struct ScopeState {
    instances: Mutex<HashMap<Key, AnyArc>>,
    multi_instances: Mutex<HashMap<(Key, usize), AnyArc>>,
    disposers: Mutex<DisposeBag>,
}

impl ScopeState {
    fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            multi_instances: Mutex::new(HashMap::new()),
            disposers: Mutex::new(DisposeBag::default()),
        }
    }

    fn dispose(&self) {
        self.disposers.lock().unwrap().run_all_reverse();
    }
}

pub(crate) struct ProviderShared {
    registry: Registry,
    sources: Vec<Arc<dyn RegistrationSource>>,
    /// Fallback registrations are synthesized once per provider; instances
    /// still cache per scope.
    synthesized: RwLock<HashMap<Key, Arc<ServiceRegistration>>>,
    root: Arc<ScopeState>,
}

struct RegistryLookup<'a>(&'a Registry);

impl RegistrationLookup for RegistryLookup<'_> {
    fn has_registration(&self, key: &Key) -> bool {
        self.0.contains_key(key) || !self.0.get_many(key).is_empty()
    }
}

/// The built container: resolves services and owns the root scope.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{Resolver, ServiceCollection, ServiceFacts, TypeFacts};
/// use std::sync::Arc;
///
/// struct Config {
///     url: String,
/// }
///
/// impl ServiceFacts for Config {
///     fn facts() -> TypeFacts {
///         TypeFacts::concrete::<Config>().build()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { url: "localhost".to_string() });
///
/// let provider = services.build();
/// let scope = provider.create_scope();
///
/// // Singletons are shared across scopes.
/// let a = provider.get_required::<Config>();
/// let b = scope.get_required::<Config>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ServiceProvider {
    shared: Arc<ProviderShared>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry, sources: Vec<Arc<dyn RegistrationSource>>) -> Self {
        Self {
            shared: Arc::new(ProviderShared {
                registry,
                sources,
                synthesized: RwLock::new(HashMap::new()),
                root: Arc::new(ScopeState::new()),
            }),
        }
    }

    /// Creates a child scope with its own scoped-instance cache and
    /// disposal bag.
    pub fn create_scope(&self) -> Scope {
        Scope {
            shared: self.shared.clone(),
            state: Arc::new(ScopeState::new()),
        }
    }

    /// Runs root-scope disposal hooks in reverse creation order.
    /// Idempotent; also runs on drop.
    pub fn dispose(&self) {
        self.shared.root.dispose();
    }
}

impl Drop for ServiceProvider {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Resolver for ServiceProvider {
    fn resolve_request(&self, request: &ServiceRequest) -> DiResult<AnyArc> {
        ResolverContext::new(&self.shared, &self.shared.root).resolve_internal(request)
    }

    fn resolve_all(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        ResolverContext::new(&self.shared, &self.shared.root).resolve_all_internal(key)
    }
}

/// A resolution scope: scoped services cache here and are disposed with it.
pub struct Scope {
    shared: Arc<ProviderShared>,
    state: Arc<ScopeState>,
}

impl Scope {
    /// Runs this scope's disposal hooks in reverse creation order.
    /// Idempotent; also runs on drop.
    pub fn dispose(&self) {
        self.state.dispose();
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Resolver for Scope {
    fn resolve_request(&self, request: &ServiceRequest) -> DiResult<AnyArc> {
        ResolverContext::new(&self.shared, &self.state).resolve_internal(request)
    }

    fn resolve_all(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        ResolverContext::new(&self.shared, &self.state).resolve_all_internal(key)
    }
}

struct Activation {
    ownership: Ownership,
    state: Arc<ScopeState>,
}

/// Resolution context handed to factories and constructor hooks.
///
/// Resolving through the context keeps the whole nested construction on
/// one resolution stack, which is how circular dependencies are detected
/// and how unregistered nested dependencies reach the fallback sources.
pub struct ResolverContext<'a> {
    shared: &'a ProviderShared,
    scope: &'a Arc<ScopeState>,
    stack: RefCell<Vec<&'static str>>,
    activations: RefCell<Vec<Activation>>,
}

impl<'a> ResolverContext<'a> {
    fn new(shared: &'a Arc<ProviderShared>, scope: &'a Arc<ScopeState>) -> Self {
        Self {
            shared: shared.as_ref(),
            scope,
            stack: RefCell::new(Vec::new()),
            activations: RefCell::new(Vec::new()),
        }
    }

    /// Registers a cleanup hook for the service currently being built.
    ///
    /// The hook lands in the disposal bag of the scope that caches the
    /// instance. For externally-owned registrations the hook is discarded:
    /// the container must not dispose what it does not own.
    pub fn on_dispose(&self, f: impl FnOnce() + Send + 'static) {
        let target = {
            let activations = self.activations.borrow();
            match activations.last() {
                Some(activation) if activation.ownership == Ownership::ExternallyOwned => None,
                Some(activation) => Some(activation.state.clone()),
                None => Some(self.scope.clone()),
            }
        };
        if let Some(state) = target {
            state.disposers.lock().unwrap().push(Box::new(f));
        }
    }

    /// Convenience over [`on_dispose`](Self::on_dispose) for services
    /// implementing [`Dispose`].
    pub fn track_disposal<T: ?Sized + Dispose + 'static>(&self, service: &Arc<T>) {
        let service = service.clone();
        self.on_dispose(move || service.dispose());
    }

    fn lookup(&self, request: &ServiceRequest) -> Option<Arc<ServiceRegistration>> {
        if let Some(registration) = self.shared.registry.get(request.key()) {
            return Some(registration.clone());
        }
        if let Some(registration) = self.shared.synthesized.read().unwrap().get(request.key()) {
            return Some(registration.clone());
        }
        let lookup = RegistryLookup(&self.shared.registry);
        for source in &self.shared.sources {
            if let Some(fallback) = source.registrations_for(request, &lookup) {
                let registration = Arc::new(fallback.into_registration());
                let mut synthesized = self.shared.synthesized.write().unwrap();
                return Some(
                    synthesized
                        .entry(request.key().clone())
                        .or_insert(registration)
                        .clone(),
                );
            }
        }
        None
    }

    pub(crate) fn resolve_internal(&self, request: &ServiceRequest) -> DiResult<AnyArc> {
        let name = request.key().display_name();
        {
            let stack = self.stack.borrow();
            if stack.iter().any(|entry| *entry == name) {
                let mut path = stack.clone();
                path.push(name);
                return Err(DiError::Circular(path));
            }
            if stack.len() >= MAX_RESOLUTION_DEPTH {
                return Err(DiError::DepthExceeded(MAX_RESOLUTION_DEPTH));
            }
        }
        let registration = self.lookup(request).ok_or(DiError::NotFound(name))?;
        self.instantiate(request.key(), &registration, name)
    }

    fn instantiate(
        &self,
        key: &Key,
        registration: &Arc<ServiceRegistration>,
        name: &'static str,
    ) -> DiResult<AnyArc> {
        match registration.lifetime {
            Lifetime::Transient => self.activate(registration, name, self.scope),
            Lifetime::Scoped => {
                let cached = self.scope.instances.lock().unwrap().get(key).cloned();
                match cached {
                    Some(value) => Ok(value),
                    None => {
                        let value = self.activate(registration, name, self.scope)?;
                        let mut cache = self.scope.instances.lock().unwrap();
                        Ok(cache.entry(key.clone()).or_insert(value).clone())
                    }
                }
            }
            Lifetime::Singleton => match &registration.single {
                Some(cell) => cell
                    .get_or_try_init(|| self.activate(registration, name, &self.shared.root))
                    .map(|value| value.clone()),
                None => self.activate(registration, name, &self.shared.root),
            },
        }
    }

    fn activate(
        &self,
        registration: &Arc<ServiceRegistration>,
        name: &'static str,
        cache_state: &Arc<ScopeState>,
    ) -> DiResult<AnyArc> {
        self.stack.borrow_mut().push(name);
        self.activations.borrow_mut().push(Activation {
            ownership: registration.ownership,
            state: cache_state.clone(),
        });
        let result = (registration.ctor)(self);
        self.activations.borrow_mut().pop();
        self.stack.borrow_mut().pop();
        result
    }

    pub(crate) fn resolve_all_internal(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        let registrations: Vec<Arc<ServiceRegistration>> =
            self.shared.registry.get_many(key).to_vec();
        let name = key.display_name();
        let mut resolved = Vec::with_capacity(registrations.len());
        for (index, registration) in registrations.iter().enumerate() {
            let value = match registration.lifetime {
                Lifetime::Transient => self.activate(registration, name, self.scope)?,
                Lifetime::Singleton => match &registration.single {
                    Some(cell) => cell
                        .get_or_try_init(|| self.activate(registration, name, &self.shared.root))
                        .map(|value| value.clone())?,
                    None => self.activate(registration, name, &self.shared.root)?,
                },
                Lifetime::Scoped => {
                    let cache_key = (key.clone(), index);
                    let cached = self
                        .scope
                        .multi_instances
                        .lock()
                        .unwrap()
                        .get(&cache_key)
                        .cloned();
                    match cached {
                        Some(value) => value,
                        None => {
                            let value = self.activate(registration, name, self.scope)?;
                            let mut cache = self.scope.multi_instances.lock().unwrap();
                            cache.entry(cache_key).or_insert(value).clone()
                        }
                    }
                }
            };
            resolved.push(value);
        }
        Ok(resolved)
    }
}

impl Resolver for ResolverContext<'_> {
    fn resolve_request(&self, request: &ServiceRequest) -> DiResult<AnyArc> {
        self.resolve_internal(request)
    }

    fn resolve_all(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        self.resolve_all_internal(key)
    }
}
