//! Eligibility classification for fallback registration.
//!
//! Pure predicates over a [`TypeFacts`] record. The fallback source applies
//! them in a fixed order: exclusions first, then proxyability, then
//! automatic direct registration. A type that fails the proxy rules can
//! still be directly constructed, so an unmockable concrete dependency deep
//! in a graph does not become a hard failure.

use crate::facts::{TypeFacts, TypeKind};

/// Whether the type is off-limits for the fallback source entirely.
///
/// Container-special wrappers (enumerable, lazy, owned, meta), startable
/// services, and the container's own plumbing are never mocked and never
/// auto-registered, whatever else is true of them.
pub fn is_excluded(facts: &TypeFacts) -> bool {
    facts.wrapper_kind().is_some() || facts.is_startable() || facts.is_container_internal()
}

/// Whether a mock proxy can be generated for the type.
///
/// Interfaces and abstract bases always qualify. A concrete type qualifies
/// only when it is not sealed and exposes a zero-argument constructor the
/// generated proxy can call.
pub fn mock_compatible(facts: &TypeFacts) -> bool {
    match facts.kind() {
        TypeKind::Interface | TypeKind::AbstractBase => true,
        TypeKind::Concrete { sealed } => !sealed && facts.has_default_ctor(),
    }
}

/// Whether the type qualifies for automatic direct registration.
///
/// The fallback when proxying is impossible: register the concrete type
/// itself so the container runs its real constructor and auto-mocks the
/// constructor's own dependencies. Strings, delegates, and open generic
/// definitions are legitimate types but not sensible object-graph roots,
/// so they are left alone. Sealed concretes qualify here even though they
/// fail the proxy rules.
pub fn direct_registration_compatible(facts: &TypeFacts) -> bool {
    matches!(facts.kind(), TypeKind::Concrete { .. })
        && !facts.is_text()
        && !facts.is_delegate()
        && !facts.is_open_generic()
}
