//! Error types for resolution and mock verification.

use std::fmt;
use std::sync::Arc;

/// Dependency resolution errors.
///
/// # Examples
///
/// ```rust
/// use ferrous_automock::{DiError, ServiceCollection, Resolver, ServiceFacts, TypeFacts};
///
/// struct Missing;
/// impl ServiceFacts for Missing {
///     fn facts() -> TypeFacts {
///         // Sealed, no default ctor, no construction hook: nothing can
///         // synthesize it, so resolution reports the missing registration.
///         TypeFacts::concrete::<Missing>().sealed().build()
///     }
/// }
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<Missing>() {
///     Err(DiError::NoConstructor(name)) | Err(DiError::NotFound(name)) => {
///         assert!(name.contains("Missing"));
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Service not registered and no fallback source produced a registration
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// A direct-construct registration was synthesized for a type that has
    /// no registered constructor hook
    NoConstructor(&'static str),
    /// Mock creation failed; carries the underlying failure verbatim
    Mock(MockError),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::NoConstructor(name) => {
                write!(f, "No constructor available for: {}", name)
            }
            // The mock failure surfaces as-is, never behind wrapper text.
            DiError::Mock(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Mock(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for resolution operations.
pub type DiResult<T> = Result<T, DiError>;

/// Mock creation and verification errors.
///
/// Creation failures keep the original error reachable through
/// [`std::error::Error::source`] so callers see the true root cause, for
/// example a strict-behavior violation raised while a nested dependency was
/// being constructed.
#[derive(Debug, Clone)]
pub enum MockError {
    /// The type cannot be proxied: no mock factory is available for it
    Unsupported(&'static str),
    /// The proxy factory failed; `source` is the original failure
    Creation {
        /// Requested service type name
        type_name: &'static str,
        /// The underlying failure, unwrapped
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// A mock's recorded expectations were not met
    UnmetExpectations {
        /// Mocked service type name
        type_name: &'static str,
        /// One entry per unmet expectation
        details: Vec<String>,
    },
    /// Session teardown verification: one entry per failing mock
    Verification(Vec<MockError>),
}

impl MockError {
    /// Wraps an arbitrary failure raised while producing a mock.
    pub fn creation<E>(type_name: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MockError::Creation {
            type_name,
            source: Arc::new(source),
        }
    }
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockError::Unsupported(name) => {
                write!(f, "Cannot create a mock for: {}", name)
            }
            MockError::Creation { source, .. } => write!(f, "{}", source),
            MockError::UnmetExpectations { type_name, details } => {
                write!(f, "Unmet expectations on {}: {}", type_name, details.join("; "))
            }
            MockError::Verification(failures) => {
                write!(f, "Mock verification failed ({} mock", failures.len())?;
                if failures.len() != 1 {
                    write!(f, "s")?;
                }
                write!(f, "):")?;
                for failure in failures {
                    write!(f, " [{}]", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MockError::Creation { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for mock repository operations.
pub type MockResult<T> = Result<T, MockError>;
