//! Fallback registration descriptors.
//!
//! A [`FallbackRegistration`] is the single output of the resolution policy:
//! a plan telling the container how to satisfy one unregistered service.
//! It is either a direct construction of the concrete type or a factory
//! delegating to the mock repository, always one instance per scope.

use std::fmt;
use std::sync::Arc;

use crate::error::DiError;
use crate::facts::{CtorFn, TypeFacts};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::ServiceRegistration;
use crate::repository::MockRepository;

/// Who is responsible for disposing an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The container disposes the instance with its scope.
    ContainerOwned,
    /// The container must not dispose the instance; cleanup, if any,
    /// belongs to the mock verification path.
    ExternallyOwned,
}

/// How a fallback registration produces its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Run the type's real constructor, resolving its dependencies.
    Construct,
    /// Ask the mock repository for a proxy.
    Mock,
}

/// A synthesized registration for one unregistered service.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use ferrous_automock::{
///     passing_control, AutoMockSource, EmptyLookup, Lifetime, MockBehavior,
///     MockRepository, Ownership, ProviderKind, RegistrationSource,
///     ServiceFacts, ServiceRequest, TypeFacts, TypeSet,
/// };
///
/// trait Notifier: Send + Sync {}
/// struct NullNotifier;
/// impl Notifier for NullNotifier {}
///
/// impl ServiceFacts for dyn Notifier {
///     fn facts() -> TypeFacts {
///         TypeFacts::interface::<dyn Notifier>()
///             .mocked_with(|_| {
///                 Ok((
///                     Arc::new(NullNotifier) as Arc<dyn Notifier>,
///                     passing_control::<dyn Notifier>(),
///                 ))
///             })
///             .build()
///     }
/// }
///
/// let source = AutoMockSource::new(
///     Arc::new(MockRepository::new(MockBehavior::Loose)),
///     TypeSet::new(),
///     TypeSet::new(),
/// );
/// let request = ServiceRequest::typed::<dyn Notifier>();
/// let registration = source.registrations_for(&request, &EmptyLookup).unwrap();
///
/// assert_eq!(registration.provider_kind(), ProviderKind::Mock);
/// assert_eq!(registration.lifetime(), Lifetime::Scoped);
/// assert_eq!(registration.ownership(), Ownership::ExternallyOwned);
/// ```
pub struct FallbackRegistration {
    key: Key,
    lifetime: Lifetime,
    ownership: Ownership,
    kind: ProviderKind,
    ctor: CtorFn,
}

impl FallbackRegistration {
    /// Direct construction of the concrete type, one instance per scope.
    pub(crate) fn construct(facts: &Arc<TypeFacts>, ownership: Ownership) -> Self {
        let ctor = match facts.construct_fn() {
            Some(ctor) => ctor.clone(),
            None => {
                let name = facts.type_name();
                Arc::new(move |_: &crate::provider::ResolverContext<'_>| {
                    Err(DiError::NoConstructor(name))
                }) as CtorFn
            }
        };
        Self {
            key: facts.key().clone(),
            lifetime: Lifetime::Scoped,
            ownership,
            kind: ProviderKind::Construct,
            ctor,
        }
    }

    /// Mock production through the repository, one instance per scope,
    /// never disposed by the container. A repository failure surfaces as
    /// the underlying error, not behind a wrapper.
    pub(crate) fn mock(facts: Arc<TypeFacts>, repository: Arc<MockRepository>) -> Self {
        let key = facts.key().clone();
        let ctor: CtorFn = Arc::new(move |_: &crate::provider::ResolverContext<'_>| {
            repository
                .create(&facts)
                .map(|instance| instance.into_object())
                .map_err(DiError::Mock)
        });
        Self {
            key,
            lifetime: Lifetime::Scoped,
            ownership: Ownership::ExternallyOwned,
            kind: ProviderKind::Mock,
            ctor,
        }
    }

    /// The service key this registration satisfies.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The serviced type's name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Instance caching policy. Always [`Lifetime::Scoped`] for synthesized
    /// registrations.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Disposal responsibility for produced instances.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Whether this plan constructs the real type or produces a mock.
    pub fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub(crate) fn into_registration(self) -> ServiceRegistration {
        ServiceRegistration::new(self.lifetime, self.ownership, self.ctor)
    }
}

impl fmt::Debug for FallbackRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackRegistration")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .field("ownership", &self.ownership)
            .field("kind", &self.kind)
            .finish()
    }
}
