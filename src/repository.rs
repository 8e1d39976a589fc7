//! The mock repository: session-wide mock production and verification.
//!
//! One repository serves a whole mocking session. It carries the
//! strict/loose behavior mode, drives each type's proxy factory, and keeps
//! a verification handle for every mock it produced so teardown can check
//! expectations across the session.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::{MockError, MockResult};
use crate::facts::TypeFacts;
use crate::registration::AnyArc;

/// How mocks respond to calls that were never set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Unconfigured calls return defaults.
    Loose,
    /// Unconfigured calls are failures.
    Strict,
}

/// Verification handle for one mock.
///
/// Proxy factories return one of these alongside the proxy object. The
/// repository collects them and consults them at verification time.
pub trait MockControl: Send + Sync {
    /// The mocked service type's name, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Verifies only expectations explicitly marked for verification.
    fn verify_marked(&self) -> MockResult<()>;

    /// Verifies every recorded expectation.
    fn verify_all(&self) -> MockResult<()>;
}

/// A control whose verification always passes.
///
/// Convenient for loose hand-rolled mocks that record nothing.
pub fn passing_control<T: ?Sized + 'static>() -> Arc<dyn MockControl> {
    struct Passing(&'static str);
    impl MockControl for Passing {
        fn type_name(&self) -> &'static str {
            self.0
        }
        fn verify_marked(&self) -> MockResult<()> {
            Ok(())
        }
        fn verify_all(&self) -> MockResult<()> {
            Ok(())
        }
    }
    Arc::new(Passing(std::any::type_name::<T>()))
}

/// One produced mock: the proxy object plus its verification handle.
pub struct MockInstance {
    object: AnyArc,
    control: Arc<dyn MockControl>,
}

impl MockInstance {
    pub(crate) fn new(object: AnyArc, control: Arc<dyn MockControl>) -> Self {
        Self { object, control }
    }

    /// The verification handle for this mock.
    pub fn control(&self) -> &Arc<dyn MockControl> {
        &self.control
    }

    pub(crate) fn into_object(self) -> AnyArc {
        self.object
    }

    pub(crate) fn control_arc(&self) -> Arc<dyn MockControl> {
        self.control.clone()
    }
}

/// Produces mocks for a session and tracks their verification state.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{MockBehavior, MockRepository, MockError, TypeFacts};
///
/// struct Opaque;
///
/// let repository = MockRepository::new(MockBehavior::Strict);
/// assert_eq!(repository.behavior(), MockBehavior::Strict);
///
/// // No proxy factory attached: creation fails loudly.
/// let facts = TypeFacts::concrete::<Opaque>().build();
/// assert!(matches!(
///     repository.create(&facts),
///     Err(MockError::Unsupported(_))
/// ));
/// ```
pub struct MockRepository {
    behavior: MockBehavior,
    controls: Mutex<Vec<Arc<dyn MockControl>>>,
}

impl MockRepository {
    /// Creates a repository with the given behavior mode.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            controls: Mutex::new(Vec::new()),
        }
    }

    /// The session's behavior mode.
    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    /// Produces a mock for the described type by running its proxy factory.
    ///
    /// Factory failures are returned as-is. Types without a proxy factory
    /// fail with [`MockError::Unsupported`]; this is what surfaces when a
    /// mock was explicitly forced for a type the proxy rules would skip.
    pub fn create(&self, facts: &TypeFacts) -> MockResult<MockInstance> {
        let proxy = facts
            .proxy_fn()
            .ok_or(MockError::Unsupported(facts.type_name()))?;
        let instance = proxy(self.behavior)?;
        self.controls.lock().unwrap().push(instance.control_arc());
        Ok(instance)
    }

    /// How many mocks this repository has produced.
    pub fn mock_count(&self) -> usize {
        self.controls.lock().unwrap().len()
    }

    /// Verifies expectations explicitly marked for verification, across
    /// every mock produced in this session.
    pub fn verify(&self) -> MockResult<()> {
        self.verify_with(|control| control.verify_marked())
    }

    /// Verifies every recorded expectation across the session.
    pub fn verify_all(&self) -> MockResult<()> {
        self.verify_with(|control| control.verify_all())
    }

    fn verify_with(&self, check: fn(&dyn MockControl) -> MockResult<()>) -> MockResult<()> {
        let controls = self.controls.lock().unwrap();
        let failures: Vec<MockError> = controls
            .iter()
            .filter_map(|control| check(control.as_ref()).err())
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MockError::Verification(failures))
        }
    }
}

impl fmt::Debug for MockRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRepository")
            .field("behavior", &self.behavior)
            .field("mock_count", &self.mock_count())
            .finish()
    }
}
