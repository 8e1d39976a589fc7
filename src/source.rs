//! The fallback registration source: resolution policy for unregistered
//! services.
//!
//! The container consults its registration sources whenever a requested
//! service has no matching registration. [`AutoMockSource`] is the policy
//! that makes auto-mocking work: it classifies the requested type and
//! synthesizes at most one registration: a mock, a direct construction,
//! or nothing at all.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::classify;
use crate::descriptors::{FallbackRegistration, Ownership};
use crate::facts::ServiceRequest;
use crate::key::Key;
use crate::repository::MockRepository;

/// A mutable set of service TypeIds shared between the session facade and
/// the fallback source.
///
/// The facade inserts; the source only reads. Membership grows
/// monotonically over a session and never shrinks.
#[derive(Clone, Debug, Default)]
pub struct TypeSet {
    inner: Arc<RwLock<HashSet<TypeId>>>,
}

impl TypeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type. Returns `false` if it was already present.
    pub fn insert(&self, id: TypeId) -> bool {
        self.inner.write().unwrap().insert(id)
    }

    /// Whether the type is present.
    pub fn contains(&self, id: TypeId) -> bool {
        self.inner.read().unwrap().contains(&id)
    }

    /// Number of types recorded.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

/// Accessor for the registrations the container already knows about.
///
/// Supplied by the container on every fallback query so sources can defer
/// to manual registrations.
pub trait RegistrationLookup {
    /// Whether any registration already satisfies the key.
    fn has_registration(&self, key: &Key) -> bool;
}

/// A lookup that reports nothing registered. Useful when exercising a
/// source in isolation.
pub struct EmptyLookup;

impl RegistrationLookup for EmptyLookup {
    fn has_registration(&self, _key: &Key) -> bool {
        false
    }
}

/// Extension point the container consults for unregistered services.
pub trait RegistrationSource: Send + Sync {
    /// Whether registrations from this source are 1:1 adapters over other
    /// components. Fallback synthesis is not; always `false` here.
    fn is_adapter_for_individual_components(&self) -> bool {
        false
    }

    /// Retrieves a registration for an unregistered service, or `None`
    /// when this source has no opinion. At most one registration is ever
    /// produced per request.
    fn registrations_for(
        &self,
        request: &ServiceRequest,
        existing: &dyn RegistrationLookup,
    ) -> Option<FallbackRegistration>;
}

/// Resolves unknown services to mocks using the session's
/// [`MockRepository`], or to direct constructions where mocking cannot
/// apply.
///
/// The decision procedure, in priority order:
///
/// 1. Non-typed requests (named keys, descriptor-less keys) pass through.
/// 2. Anything already registered passes through: manual registrations,
///    including directly provided mock instances, always win.
/// 3. Types the facade explicitly created as real objects get a direct
///    construction, so the root is genuinely built while its unregistered
///    constructor dependencies still fall through to this source.
/// 4. Excluded types (container wrappers, startables, container plumbing)
///    pass through.
/// 5. Types explicitly requested as mocks, and types proxyable per the
///    classifier, get a mock registration. Forcing the explicit ones
///    through the repository means mocking failures surface as clear
///    errors instead of being silently skipped.
/// 6. Remaining concretes eligible for automatic direct registration get a
///    direct construction; the container then recurses into their real
///    constructors and auto-mocks whatever those need.
/// 7. Otherwise no opinion; the container reports the missing registration.
pub struct AutoMockSource {
    repository: Arc<MockRepository>,
    created: TypeSet,
    mocked: TypeSet,
}

impl AutoMockSource {
    /// Creates a source reading the given session state.
    ///
    /// `created` and `mocked` stay owned by the session facade; this source
    /// never mutates them.
    pub fn new(repository: Arc<MockRepository>, created: TypeSet, mocked: TypeSet) -> Self {
        Self {
            repository,
            created,
            mocked,
        }
    }
}

impl RegistrationSource for AutoMockSource {
    fn is_adapter_for_individual_components(&self) -> bool {
        false
    }

    fn registrations_for(
        &self,
        request: &ServiceRequest,
        existing: &dyn RegistrationLookup,
    ) -> Option<FallbackRegistration> {
        let facts = request.as_typed()?;

        // Manually registered, don't do ourselves.
        if existing.has_registration(request.key()) {
            return None;
        }

        if self.created.contains(facts.type_id()) {
            return Some(FallbackRegistration::construct(
                facts,
                Ownership::ContainerOwned,
            ));
        }

        if classify::is_excluded(facts) {
            return None;
        }

        // If a mock has been explicitly requested, always try it, so that
        // mocking failures get properly surfaced.
        if self.mocked.contains(facts.type_id()) || classify::mock_compatible(facts) {
            return Some(FallbackRegistration::mock(
                facts.clone(),
                self.repository.clone(),
            ));
        }

        if classify::direct_registration_compatible(facts) {
            // Unmockable concretes are registered by type; their
            // constructor dependencies will then be mocked.
            return Some(FallbackRegistration::construct(
                facts,
                Ownership::ExternallyOwned,
            ));
        }

        None
    }
}
