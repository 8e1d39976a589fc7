//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior.
///
/// Defines how service instances are created, cached, and shared within
/// the container. Registrations synthesized by the auto-mock fallback
/// source are always [`Lifetime::Scoped`]: one mock (or one directly
/// constructed instance) per scope, so an object graph resolved within a
/// single scope shares one mock per service type.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{Resolver, ServiceCollection, ServiceFacts, TypeFacts};
///
/// struct Counter(u32);
///
/// impl ServiceFacts for Counter {
///     fn facts() -> TypeFacts {
///         TypeFacts::concrete::<Counter>().build()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_transient_factory::<Counter, _>(|_| Ok(Counter(0)));
///
/// let provider = services.build();
/// let a = provider.get_required::<Counter>();
/// let b = provider.get_required::<Counter>();
/// // Transient: always different instances
/// assert!(!std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever.
    Singleton,
    /// Single instance per scope, cached for the scope lifetime.
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}
