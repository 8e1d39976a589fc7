//! The resolver trait: type-safe service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::facts::{ServiceFacts, ServiceRequest};
use crate::key::{key_of_named_type, key_of_trait, Key};

/// Type-safe resolution interface.
///
/// Implemented by the service provider, by scopes, and by the resolver
/// context handed to factories, so nested dependencies resolve through the
/// same machinery. That is what routes an unregistered nested dependency
/// through the auto-mock fallback.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{Resolver, ServiceCollection, ServiceFacts, TypeFacts};
///
/// struct Settings {
///     retries: u32,
/// }
///
/// impl ServiceFacts for Settings {
///     fn facts() -> TypeFacts {
///         TypeFacts::concrete::<Settings>().build()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Settings { retries: 3 });
///
/// let provider = services.build();
/// let settings = provider.get_required::<Settings>();
/// assert_eq!(settings.retries, 3);
/// ```
pub trait Resolver {
    /// Resolves a request to a type-erased instance.
    fn resolve_request(&self, request: &ServiceRequest) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Resolves every multi-bound implementation registered under a key,
    /// in registration order. The enumerable aggregation path: fallback
    /// sources are never consulted here.
    fn resolve_all(&self, key: &Key) -> DiResult<Vec<Arc<dyn Any + Send + Sync>>>;

    /// Resolves a concrete service type.
    fn get<T>(&self) -> DiResult<Arc<T>>
    where
        T: ServiceFacts + Send + Sync + 'static,
    {
        let any = self.resolve_request(&ServiceRequest::typed::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait-object service type.
    fn get_trait<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + ServiceFacts + Send + Sync + 'static,
    {
        let any = self.resolve_request(&ServiceRequest::typed::<T>())?;
        any.downcast::<Arc<T>>()
            .map(|arc| (*arc).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a named (keyed) concrete service. Named services are never
    /// synthesized by fallback sources; only manual registrations apply.
    fn get_named<T>(&self, name: &'static str) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let request = ServiceRequest::keyed(key_of_named_type::<T>(name));
        let any = self.resolve_request(&request)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    fn get_required<T>(&self) -> Arc<T>
    where
        T: ServiceFacts + Send + Sync + 'static,
    {
        self.get::<T>().unwrap_or_else(|e| {
            panic!(
                "required service {} failed to resolve: {}",
                std::any::type_name::<T>(),
                e
            )
        })
    }

    /// Resolves a trait-object service type, panicking on failure.
    fn get_required_trait<T>(&self) -> Arc<T>
    where
        T: ?Sized + ServiceFacts + Send + Sync + 'static,
    {
        self.get_trait::<T>().unwrap_or_else(|e| {
            panic!(
                "required service {} failed to resolve: {}",
                std::any::type_name::<T>(),
                e
            )
        })
    }

    /// Resolves all registered implementations of a trait, in registration
    /// order. Unregistered traits yield an empty vector; the auto-mock
    /// fallback never fabricates sequence members.
    fn get_all_trait<T>(&self) -> DiResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all(&key_of_trait::<T>())?
            .into_iter()
            .map(|any| {
                any.downcast::<Arc<T>>()
                    .map(|arc| (*arc).clone())
                    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
            })
            .collect()
    }
}
