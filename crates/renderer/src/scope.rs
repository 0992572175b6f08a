//! Explicit acquire/release lifecycle shared by every GPU and platform
//! resource.
//!
//! GL objects have to be deleted while their context is still current, so
//! release is an explicit call driven from here instead of a `Drop` impl.

use crate::error::RenderError;

/// A resource that is allocated by [`acquire`](Self::acquire) and freed by
/// [`release`](Self::release).
///
/// `release` must free whatever `acquire` managed to allocate before failing,
/// and must be a no-op when called again.
pub trait ScopedResource {
    fn acquire(&mut self) -> Result<(), RenderError>;
    fn release(&mut self);
}

/// Acquires `resources` in order.
///
/// When element `k` fails, `k` is released first (to free its partial state)
/// and then `k-1..=0`, each exactly once, before the error is returned.
pub fn acquire_all(resources: &mut [&mut dyn ScopedResource]) -> Result<(), RenderError> {
    for acquired in 0..resources.len() {
        if let Err(err) = resources[acquired].acquire() {
            resources[acquired].release();
            release_all(&mut resources[..acquired]);
            return Err(err);
        }
    }
    Ok(())
}

/// Releases `resources` in reverse order.
pub fn release_all(resources: &mut [&mut dyn ScopedResource]) {
    for resource in resources.iter_mut().rev() {
        resource.release();
    }
}

/// Runs `body` with `resource` acquired and releases it exactly once on
/// every exit path, including a panic unwinding out of `body`.
///
/// Nesting calls gives reverse-order release across resources of different
/// types.
pub fn using<S, T, E, F>(resource: &mut S, body: F) -> Result<T, E>
where
    S: ScopedResource + ?Sized,
    E: From<RenderError>,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    if let Err(err) = resource.acquire() {
        resource.release();
        return Err(err.into());
    }
    let mut guard = ReleaseOnExit { resource };
    body(&mut *guard.resource)
}

struct ReleaseOnExit<'a, S: ScopedResource + ?Sized> {
    resource: &'a mut S,
}

impl<S: ScopedResource + ?Sized> Drop for ReleaseOnExit<'_, S> {
    fn drop(&mut self) {
        self.resource.release();
    }
}
