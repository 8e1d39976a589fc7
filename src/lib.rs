//! # ferrous-automock
//!
//! Auto-mocking dependency injection for Rust tests: build the subject
//! under test as a real object and let its unregistered dependencies
//! resolve to mocks automatically.
//!
//! ## Features
//!
//! - **Auto-mocked dependencies**: Unregistered trait dependencies resolve to mocks from the session repository
//! - **Real subjects**: Types you `create` are genuinely constructed; only their dependencies are mocked
//! - **Manual registrations win**: Anything registered by hand shadows the fallback, mock instances included
//! - **Strict and loose sessions**: One behavior mode per session, with verification on teardown
//! - **Scoped lifetimes**: Synthesized registrations cache per scope, and mocks are never disposed by the container
//! - **Circular dependency detection**: Detailed error paths instead of infinite loops
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_automock::{passing_control, AutoMock, Resolver, ServiceFacts, TypeFacts};
//! use std::sync::Arc;
//!
//! // The dependency the subject needs.
//! trait Audit: Send + Sync {
//!     fn record(&self, event: &str);
//! }
//!
//! // The subject under test.
//! struct Transfer {
//!     audit: Arc<dyn Audit>,
//! }
//!
//! impl Transfer {
//!     fn run(&self) {
//!         self.audit.record("transfer");
//!     }
//! }
//!
//! // Describe how the dependency is mocked.
//! impl ServiceFacts for dyn Audit {
//!     fn facts() -> TypeFacts {
//!         TypeFacts::interface::<dyn Audit>()
//!             .mocked_with(|_behavior| {
//!                 struct AuditMock;
//!                 impl Audit for AuditMock {
//!                     fn record(&self, _event: &str) {}
//!                 }
//!                 Ok((
//!                     Arc::new(AuditMock) as Arc<dyn Audit>,
//!                     passing_control::<dyn Audit>(),
//!                 ))
//!             })
//!             .build()
//!     }
//! }
//!
//! // Describe how the subject is constructed.
//! impl ServiceFacts for Transfer {
//!     fn facts() -> TypeFacts {
//!         TypeFacts::concrete::<Transfer>()
//!             .constructed_with(|ctx| {
//!                 Ok(Transfer {
//!                     audit: ctx.get_trait::<dyn Audit>()?,
//!                 })
//!             })
//!             .build()
//!     }
//! }
//!
//! // The session builds Transfer for real and mocks the audit trail.
//! let auto = AutoMock::loose();
//! let transfer = auto.create::<Transfer>().unwrap();
//! transfer.run();
//! auto.verify().unwrap();
//! ```
//!
//! ## How resolution falls back
//!
//! The container resolves from manual registrations first. For anything
//! unregistered it consults the session's fallback source, which
//! classifies the requested type and synthesizes at most one
//! registration:
//!
//! - Types created through the session are constructed for real
//! - Traits and mock-described types get a mock from the repository
//! - Other plain concrete types are constructed directly, so their own
//!   dependencies get mocked in turn
//! - Wrappers, startables, and container plumbing are left alone
//!
//! Named registrations are never synthesized; only manual registrations
//! satisfy them.

// Module declarations
pub mod classify;
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod extensions;
pub mod facts;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod repository;
pub mod session;
pub mod source;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::ServiceCollection;
pub use descriptors::{FallbackRegistration, Ownership, ProviderKind};
pub use error::{DiError, DiResult, MockError, MockResult};
pub use extensions::RegisterMockExt;
pub use facts::{
    ConcreteFactsBuilder, FactsBuilder, ServiceFacts, ServiceRequest, TypeFacts, TypeKind,
    WrapperKind,
};
pub use key::{key_of_named_type, key_of_trait, key_of_type, Key};
pub use lifetime::Lifetime;
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use repository::{passing_control, MockBehavior, MockControl, MockInstance, MockRepository};
pub use session::AutoMock;
pub use source::{AutoMockSource, EmptyLookup, RegistrationLookup, RegistrationSource, TypeSet};
pub use traits::{Dispose, Resolver};
