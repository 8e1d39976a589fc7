//! The auto-mocking session facade.

use std::any::TypeId;
use std::sync::Arc;
use std::thread;

use crate::collection::ServiceCollection;
use crate::error::{DiResult, MockResult};
use crate::facts::ServiceFacts;
use crate::provider::ServiceProvider;
use crate::repository::{MockBehavior, MockRepository};
use crate::source::{AutoMockSource, TypeSet};
use crate::traits::Resolver;

/// One auto-mocking session: a container wired with a fallback source that
/// mocks whatever the subject under test needs.
///
/// [`create`](Self::create) builds the subject as a real object; its
/// unregistered dependencies resolve to mocks from the session's
/// [`MockRepository`]. Dropping the session verifies every mock it
/// produced, panicking on unmet expectations; call
/// [`verify`](Self::verify) instead to handle the result yourself.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{
///     passing_control, AutoMock, Resolver, ServiceFacts, TypeFacts,
/// };
/// use std::sync::Arc;
///
/// trait Mailer: Send + Sync {
///     fn send(&self, to: &str) -> bool;
/// }
///
/// struct Newsletter {
///     mailer: Arc<dyn Mailer>,
/// }
///
/// impl Newsletter {
///     fn blast(&self) -> bool {
///         self.mailer.send("everyone")
///     }
/// }
///
/// impl ServiceFacts for dyn Mailer {
///     fn facts() -> TypeFacts {
///         TypeFacts::interface::<dyn Mailer>()
///             .mocked_with(|_behavior| {
///                 struct MailerMock;
///                 impl Mailer for MailerMock {
///                     fn send(&self, _to: &str) -> bool {
///                         true
///                     }
///                 }
///                 Ok((
///                     Arc::new(MailerMock) as Arc<dyn Mailer>,
///                     passing_control::<dyn Mailer>(),
///                 ))
///             })
///             .build()
///     }
/// }
///
/// impl ServiceFacts for Newsletter {
///     fn facts() -> TypeFacts {
///         TypeFacts::concrete::<Newsletter>()
///             .constructed_with(|ctx| {
///                 Ok(Newsletter {
///                     mailer: ctx.get_trait::<dyn Mailer>()?,
///                 })
///             })
///             .build()
///     }
/// }
///
/// let auto = AutoMock::loose();
/// let newsletter = auto.create::<Newsletter>().unwrap();
/// assert!(newsletter.blast());
/// auto.verify().unwrap();
/// ```
pub struct AutoMock {
    provider: ServiceProvider,
    repository: Arc<MockRepository>,
    created: TypeSet,
    mocked: TypeSet,
    verify_all: bool,
    verified: bool,
}

impl AutoMock {
    /// Starts a session producing loose mocks.
    pub fn loose() -> Self {
        Self::from_repository(Arc::new(MockRepository::new(MockBehavior::Loose)))
    }

    /// Starts a session producing strict mocks.
    pub fn strict() -> Self {
        Self::from_repository(Arc::new(MockRepository::new(MockBehavior::Strict)))
    }

    /// Starts a loose session after applying extra registrations.
    ///
    /// `configure` runs before the fallback source is attached, so anything
    /// it registers shadows auto-mocking for that service.
    pub fn loose_with<F>(configure: F) -> Self
    where
        F: FnOnce(&mut ServiceCollection),
    {
        Self::from_repository_with(Arc::new(MockRepository::new(MockBehavior::Loose)), configure)
    }

    /// Starts a strict session after applying extra registrations.
    pub fn strict_with<F>(configure: F) -> Self
    where
        F: FnOnce(&mut ServiceCollection),
    {
        Self::from_repository_with(Arc::new(MockRepository::new(MockBehavior::Strict)), configure)
    }

    /// Starts a session over an existing repository, so several sessions
    /// can share behavior and verify together.
    pub fn from_repository(repository: Arc<MockRepository>) -> Self {
        Self::from_repository_with(repository, |_| {})
    }

    /// Starts a session over an existing repository with extra
    /// registrations.
    pub fn from_repository_with<F>(repository: Arc<MockRepository>, configure: F) -> Self
    where
        F: FnOnce(&mut ServiceCollection),
    {
        let created = TypeSet::new();
        let mocked = TypeSet::new();
        let mut services = ServiceCollection::new();
        configure(&mut services);
        services.add_registration_source(Arc::new(AutoMockSource::new(
            repository.clone(),
            created.clone(),
            mocked.clone(),
        )));
        Self {
            provider: services.build(),
            repository,
            created,
            mocked,
            verify_all: false,
            verified: false,
        }
    }

    /// The session's mock repository.
    pub fn repository(&self) -> &Arc<MockRepository> {
        &self.repository
    }

    /// The underlying container, for resolving beyond the facade.
    pub fn provider(&self) -> &ServiceProvider {
        &self.provider
    }

    /// When set, teardown verifies every recorded expectation instead of
    /// only the ones marked for verification.
    pub fn set_verify_all(&mut self, verify_all: bool) {
        self.verify_all = verify_all;
    }

    /// Builds the subject under test as a real object. Its unregistered
    /// dependencies resolve to mocks.
    ///
    /// The type is remembered for the rest of the session: later requests
    /// for it keep constructing rather than mocking.
    pub fn create<T>(&self) -> DiResult<Arc<T>>
    where
        T: ServiceFacts + Send + Sync + 'static,
    {
        self.created.insert(TypeId::of::<T>());
        self.provider.get::<T>()
    }

    /// Builds a trait-object subject as a real object, using its recorded
    /// constructor.
    pub fn create_trait<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + ServiceFacts + Send + Sync + 'static,
    {
        self.created.insert(TypeId::of::<T>());
        self.provider.get_trait::<T>()
    }

    /// Resolves a mock of the service, forcing mocking even for types the
    /// proxy rules would otherwise construct directly. Unsupported types
    /// fail with a mock error rather than being silently skipped.
    pub fn mock<T>(&self) -> DiResult<Arc<T>>
    where
        T: ServiceFacts + Send + Sync + 'static,
    {
        self.mocked.insert(TypeId::of::<T>());
        self.provider.get::<T>()
    }

    /// Resolves a mock of the trait-object service.
    pub fn mock_trait<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + ServiceFacts + Send + Sync + 'static,
    {
        self.mocked.insert(TypeId::of::<T>());
        self.provider.get_trait::<T>()
    }

    /// Ends the session: verifies mocks per the session settings and
    /// disposes the container. Consumes the session, so drop does not
    /// verify again.
    pub fn verify(mut self) -> MockResult<()> {
        self.verified = true;
        let result = if self.verify_all {
            self.repository.verify_all()
        } else {
            self.repository.verify()
        };
        self.provider.dispose();
        result
    }
}

impl Drop for AutoMock {
    fn drop(&mut self) {
        // Skip verification when unwinding; the original panic matters more.
        if self.verified || thread::panicking() {
            return;
        }
        let result = if self.verify_all {
            self.repository.verify_all()
        } else {
            self.repository.verify()
        };
        if let Err(err) = result {
            panic!("mock verification failed: {}", err);
        }
    }
}
