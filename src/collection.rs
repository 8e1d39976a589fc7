//! Service collection: registration surface for building a provider.

use std::sync::Arc;

use crate::descriptors::Ownership;
use crate::error::DiResult;
use crate::facts::CtorFn;
use crate::key::{key_of_named_type, key_of_trait, key_of_type, Key};
use crate::lifetime::Lifetime;
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{AnyArc, Registry, ServiceRegistration};
use crate::source::RegistrationSource;

/// Collects registrations and registration sources, then builds a
/// [`ServiceProvider`].
///
/// Manual registrations always win over fallback sources, so providing a
/// real implementation (or a pre-built mock) here shadows auto-mocking for
/// that service.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{Resolver, ServiceCollection, ServiceFacts, TypeFacts};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct PlainGreeter;
/// impl Greeter for PlainGreeter {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// impl ServiceFacts for dyn Greeter {
///     fn facts() -> TypeFacts {
///         TypeFacts::interface::<dyn Greeter>().build()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_trait(Arc::new(PlainGreeter) as Arc<dyn Greeter>);
///
/// let provider = services.build();
/// let greeter = provider.get_required_trait::<dyn Greeter>();
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub struct ServiceCollection {
    registry: Registry,
    sources: Vec<Arc<dyn RegistrationSource>>,
}

impl ServiceCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            sources: Vec::new(),
        }
    }

    // ----- Instance registrations -----

    /// Registers a pre-built singleton instance, owned by the container.
    pub fn add_singleton<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add_instance(key_of_type::<T>(), Arc::new(value) as AnyArc, Ownership::ContainerOwned)
    }

    /// Registers a pre-built named singleton instance.
    pub fn add_named_singleton<T: Send + Sync + 'static>(
        &mut self,
        name: &'static str,
        value: T,
    ) -> &mut Self {
        self.add_instance(
            key_of_named_type::<T>(name),
            Arc::new(value) as AnyArc,
            Ownership::ContainerOwned,
        )
    }

    /// Registers a singleton trait-object instance.
    pub fn add_singleton_trait<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<T>,
    ) -> &mut Self {
        self.add_instance(
            key_of_trait::<T>(),
            Arc::new(instance) as AnyArc,
            Ownership::ContainerOwned,
        )
    }

    /// Registers a singleton instance the container must not dispose.
    pub fn add_external_instance<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add_instance(key_of_type::<T>(), Arc::new(value) as AnyArc, Ownership::ExternallyOwned)
    }

    /// Registers a trait-object instance the container must not dispose.
    pub fn add_external_trait_instance<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<T>,
    ) -> &mut Self {
        self.add_instance(
            key_of_trait::<T>(),
            Arc::new(instance) as AnyArc,
            Ownership::ExternallyOwned,
        )
    }

    /// Appends a multi-bound trait implementation. All appended
    /// implementations resolve together through
    /// [`Resolver::get_all_trait`](crate::Resolver::get_all_trait).
    pub fn add_trait_implementation<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<T>,
    ) -> &mut Self {
        let stored: AnyArc = Arc::new(instance);
        let ctor: CtorFn = Arc::new(move |_: &ResolverContext<'_>| Ok(stored.clone()));
        self.registry.append(
            key_of_trait::<T>(),
            ServiceRegistration::new(Lifetime::Singleton, Ownership::ContainerOwned, ctor),
        );
        self
    }

    // ----- Factory registrations -----

    /// Registers a singleton factory, run once on first request.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory: one instance per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory, run on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    // ----- Sources -----

    /// Appends a registration source consulted for unregistered services.
    /// Sources are queried in registration order; the first opinion wins.
    pub fn add_registration_source(&mut self, source: Arc<dyn RegistrationSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Whether a manual registration exists for the key.
    pub fn has_registration(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Builds the provider. Registrations are frozen from this point.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.registry, self.sources)
    }

    fn add_instance(&mut self, key: Key, stored: AnyArc, ownership: Ownership) -> &mut Self {
        let ctor: CtorFn = Arc::new(move |_: &ResolverContext<'_>| Ok(stored.clone()));
        self.registry
            .insert(key, ServiceRegistration::new(Lifetime::Singleton, ownership, ctor));
        self
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor: CtorFn =
            Arc::new(move |ctx: &ResolverContext<'_>| Ok(Arc::new(factory(ctx)?) as AnyArc));
        self.registry.insert(
            key_of_type::<T>(),
            ServiceRegistration::new(lifetime, Ownership::ContainerOwned, ctor),
        );
        self
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
