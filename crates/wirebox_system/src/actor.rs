//! The actor capability interface and typed injection slots.
//!
//! Everything the container hands out is an [`Actor`]. The trait replaces
//! runtime duck-typing with explicit capabilities, all of which default to
//! "not supported":
//!
//! | Capability | Method | Used by |
//! |------------|--------|---------|
//! | Declared outlets | [`Actor::has_outlet`] | strict injections |
//! | Property injection | [`Actor::inject`] | outlet rules |
//! | Lifecycle hooks | [`Actor::hook`] | post-injection hook |
//! | Named methods | [`Actor::handle`] | method handlers |
//!
//! Plain values only need an empty impl:
//!
//! ```
//! use wirebox_system::actor::Actor;
//!
//! struct Settings { endpoint: String }
//! impl Actor for Settings {}
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wirebox_system::actor::{Actor, BoxError, Instance, InjectError, Outlet};
//! use wirebox_system::event::Notification;
//!
//! #[derive(Default)]
//! struct UserModel { name: String }
//! impl Actor for UserModel {}
//!
//! #[derive(Default)]
//! struct View {
//!     model: Outlet<UserModel>,
//!     renders: AtomicUsize,
//! }
//!
//! impl Actor for View {
//!     fn has_outlet(&self, property: &str) -> bool {
//!         property == "model"
//!     }
//!
//!     fn inject(&mut self, property: &str, value: Instance) -> Result<bool, InjectError> {
//!         match property {
//!             "model" => self.model.fill(property, value),
//!             _ => Ok(false),
//!         }
//!     }
//!
//!     fn handle(&self, method: &str, _n: &Notification<'_>) -> Result<bool, BoxError> {
//!         match method {
//!             "render" => {
//!                 self.renders.fetch_add(1, Ordering::SeqCst);
//!                 Ok(true)
//!             }
//!             _ => Ok(false),
//!         }
//!     }
//! }
//! ```

use core::fmt;
use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};

use crate::event::Notification;

/// Boxed error returned by user code (hooks, handlers, callbacks).
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// A resolved, shareable object. Identity is pointer identity
/// (`Arc::ptr_eq`).
pub type Instance = Arc<dyn Actor>;

/// An object the container can produce, inject into and dispatch to.
///
/// Actors are `Send + Sync + 'static` and downcastable, so a resolved
/// [`Instance`] can be turned back into its concrete type with
/// `downcast_arc` or `downcast_ref`.
///
/// # Mutability
///
/// [`inject`](Self::inject) and [`hook`](Self::hook) run while the container
/// still owns the freshly built object and get `&mut self`.
/// [`handle`](Self::handle) runs on shared instances and gets `&self`; use
/// atomics or locks for state that handlers mutate. Handlers may notify
/// further events, which can reach the same instance again.
pub trait Actor: DowncastSync {
    /// Returns `true` if the actor declares an outlet named `property`.
    ///
    /// With strict injections enabled, outlet rules are only applied to
    /// properties declared here.
    fn has_outlet(&self, _property: &str) -> bool {
        false
    }

    /// Sets `property` to the resolved `value`.
    ///
    /// Returns `Ok(false)` if the actor has no such property.
    ///
    /// # Errors
    ///
    /// [`InjectError::TypeMismatch`] if the value has the wrong type.
    fn inject(&mut self, _property: &str, _value: Instance) -> Result<bool, InjectError> {
        Ok(false)
    }

    /// Runs the lifecycle hook called `name`.
    ///
    /// Returns `Ok(false)` if the actor has no hook by that name.
    fn hook(&mut self, _name: &str) -> Result<bool, BoxError> {
        Ok(false)
    }

    /// Invokes the method called `method` for a notification.
    ///
    /// Returns `Ok(false)` if the actor has no method by that name.
    fn handle(&self, _method: &str, _notification: &Notification<'_>) -> Result<bool, BoxError> {
        Ok(false)
    }

    /// Returns the concrete type name for diagnostics.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl_downcast!(sync Actor);

impl fmt::Debug for dyn Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Actor").field(&Actor::type_name(self)).finish()
    }
}

/// Errors an actor reports when it rejects an injected value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    /// The value's type does not match the outlet's type.
    #[error("outlet '{property}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// The outlet property.
        property: String,
        /// The type the outlet holds.
        expected: &'static str,
        /// The type that was resolved.
        actual: &'static str,
    },
}

/// A typed injection slot.
///
/// Starts empty; [`fill`](Self::fill) downcasts a resolved [`Instance`] to
/// `T` and stores it.
pub struct Outlet<T: Actor> {
    value: Option<Arc<T>>,
}

impl<T: Actor> Outlet<T> {
    /// Creates an empty outlet.
    #[must_use]
    pub const fn empty() -> Self {
        Self { value: None }
    }

    /// Stores `value` if it is a `T`.
    ///
    /// Always returns `Ok(true)` on success so it can be returned straight
    /// from [`Actor::inject`].
    ///
    /// # Errors
    ///
    /// [`InjectError::TypeMismatch`] if `value` is not a `T`.
    pub fn fill(&mut self, property: &str, value: Instance) -> Result<bool, InjectError> {
        let typed = value
            .downcast_arc::<T>()
            .map_err(|other| InjectError::TypeMismatch {
                property: property.to_string(),
                expected: core::any::type_name::<T>(),
                actual: Actor::type_name(&*other),
            })?;
        self.value = Some(typed);
        Ok(true)
    }

    /// Returns the injected value, if any.
    #[must_use]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.value.as_ref()
    }

    /// Returns `true` once a value has been injected.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// Removes and returns the injected value.
    pub fn take(&mut self) -> Option<Arc<T>> {
        self.value.take()
    }
}

impl<T: Actor> Default for Outlet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Actor> Clone for Outlet<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<T: Actor> fmt::Debug for Outlet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outlet")
            .field("type", &core::any::type_name::<T>())
            .field("filled", &self.is_filled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Model {
        name: &'static str,
    }
    impl Actor for Model {}

    struct Other;
    impl Actor for Other {}

    #[test]
    fn outlet_starts_empty() {
        let outlet = Outlet::<Model>::default();
        assert!(!outlet.is_filled());
        assert!(outlet.get().is_none());
    }

    #[test]
    fn outlet_fill_downcasts() {
        let mut outlet = Outlet::<Model>::empty();
        let instance: Instance = Arc::new(Model { name: "alice" });

        assert_eq!(outlet.fill("model", Arc::clone(&instance)), Ok(true));
        let stored = outlet.get().unwrap();
        assert_eq!(stored.name, "alice");

        // Same allocation, not a copy.
        let stored_dyn: Instance = Arc::clone(stored) as Instance;
        assert!(Arc::ptr_eq(&stored_dyn, &instance));
    }

    #[test]
    fn outlet_fill_rejects_wrong_type() {
        let mut outlet = Outlet::<Model>::empty();
        let result = outlet.fill("model", Arc::new(Other));

        match result {
            Err(InjectError::TypeMismatch {
                property,
                expected,
                actual,
            }) => {
                assert_eq!(property, "model");
                assert!(expected.ends_with("Model"));
                assert!(actual.ends_with("Other"));
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
        assert!(!outlet.is_filled());
    }

    #[test]
    fn default_capabilities_are_absent() {
        let mut model = Model { name: "bob" };
        assert!(!model.has_outlet("anything"));
        assert_eq!(model.inject("anything", Arc::new(Other)), Ok(false));
        assert!(!model.hook("setup").unwrap());
    }

    #[test]
    fn type_name_reports_concrete_type() {
        let instance: Instance = Arc::new(Model { name: "carol" });
        assert!(Actor::type_name(&*instance).ends_with("Model"));
        assert!(instance.is::<Model>());
        assert!(!instance.is::<Other>());
    }
}
