//! Callback registrations.
//!
//! Callbacks are plain pub/sub: a closure keyed by event name, with no key
//! resolution. Identity is pointer identity, so keep a clone of the
//! [`Callback`] to remove it later.

use core::fmt;
use std::sync::Arc;

use crate::actor::BoxError;
use crate::event::Notification;

type CallbackFn = dyn Fn(&Notification<'_>) -> Result<(), BoxError> + Send + Sync;

/// A notification callback with pointer identity.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Notification<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, notification: &Notification<'_>) -> Result<(), BoxError> {
        (self.0)(notification)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_are_equal() {
        let callback = Callback::new(|_| Ok(()));
        assert_eq!(callback, callback.clone());
        assert_ne!(callback, Callback::new(|_| Ok(())));
    }
}
