use std::cell::Cell;

// SuppressGuard

/// Keeps a controller from reporting transitions upward while alive.
///
/// Dropping the guard restores reporting on every exit path, unwinding
/// included. Guards nest: reporting resumes once the last one is dropped.
#[must_use = "reporting resumes as soon as the guard is dropped"]
pub struct SuppressGuard<'c> {
    depth: &'c Cell<u32>,
}

impl<'c> SuppressGuard<'c> {
    pub(crate) fn new(depth: &'c Cell<u32>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for SuppressGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
