//! Disposal trait for container-owned services.

/// Cleanup hook for services the container owns.
///
/// Factories register disposal through
/// [`ResolverContext::track_disposal`](crate::ResolverContext::track_disposal);
/// hooks run in reverse creation order when the owning scope is disposed.
/// Externally-owned instances (mocks in particular) are never disposed by
/// the container.
pub trait Dispose: Send + Sync {
    /// Releases resources held by the service.
    fn dispose(&self);
}
