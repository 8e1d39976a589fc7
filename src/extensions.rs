//! Registration shorthand for pre-built mocks.

use std::sync::Arc;

use crate::collection::ServiceCollection;

/// Shorthand for handing a pre-built mock to the container.
///
/// A mock registered this way is a manual registration: it shadows the
/// auto-mock fallback for its service and is externally owned, so the
/// container never disposes it.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{RegisterMockExt, Resolver, ServiceCollection, ServiceFacts, TypeFacts};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock(u64);
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 {
///         self.0
///     }
/// }
///
/// impl ServiceFacts for dyn Clock {
///     fn facts() -> TypeFacts {
///         TypeFacts::interface::<dyn Clock>().build()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.register_mock_trait(Arc::new(FixedClock(42)) as Arc<dyn Clock>);
///
/// let provider = services.build();
/// let clock = provider.get_required_trait::<dyn Clock>();
/// assert_eq!(clock.now(), 42);
/// ```
pub trait RegisterMockExt {
    /// Registers a pre-built concrete mock instance.
    fn register_mock<T: Send + Sync + 'static>(&mut self, instance: T) -> &mut Self;

    /// Registers a pre-built trait-object mock instance.
    fn register_mock_trait<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<T>,
    ) -> &mut Self;
}

impl RegisterMockExt for ServiceCollection {
    fn register_mock<T: Send + Sync + 'static>(&mut self, instance: T) -> &mut Self {
        self.add_external_instance(instance)
    }

    fn register_mock_trait<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<T>,
    ) -> &mut Self {
        self.add_external_trait_instance(instance)
    }
}
