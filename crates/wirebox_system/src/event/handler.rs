//! Handler mappings.
//!
//! A handler mapping binds an event name to a [`Receiver`] and a
//! [`Handler`]:
//!
//! - [`Handler::Method`] names a method. It is looked up on the resolved
//!   receiver at dispatch time through [`Actor::handle`], never at mapping
//!   time, so the receiver may change between notifications.
//! - [`Handler::Function`] is a closure invoked with the resolved receiver
//!   (or `None` for [`Receiver::Unattached`]).
//!
//! Function identity is pointer identity: keep a clone of the
//! [`HandlerFn`] to unmap it later.
//!
//! ```
//! use wirebox_system::event::{Handler, HandlerFn, Receiver};
//!
//! let log = HandlerFn::new(|_receiver, notification| {
//!     tracing::info!(event = notification.event(), "seen");
//!     Ok(())
//! });
//!
//! assert_eq!(Handler::from(log.clone()), Handler::Function(log));
//! assert_eq!(Handler::from("render"), Handler::Method("render".into()));
//! assert_eq!(Receiver::from(None), Receiver::Unattached);
//! ```
//!
//! [`Actor::handle`]: crate::actor::Actor::handle

use core::fmt;
use std::sync::Arc;

use crate::actor::{BoxError, Instance};
use crate::event::Notification;

type HandlerCallback =
    dyn Fn(Option<&Instance>, &Notification<'_>) -> Result<(), BoxError> + Send + Sync;

/// A function handler with pointer identity.
#[derive(Clone)]
pub struct HandlerFn(Arc<HandlerCallback>);

impl HandlerFn {
    /// Wraps a closure. The first argument is the resolved receiver, `None`
    /// for unattached handlers.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Instance>, &Notification<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(
        &self,
        receiver: Option<&Instance>,
        notification: &Notification<'_>,
    ) -> Result<(), BoxError> {
        (self.0)(receiver, notification)
    }
}

impl PartialEq for HandlerFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for HandlerFn {}

impl fmt::Debug for HandlerFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerFn")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// What to invoke on the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// A method name, dispatched through `Actor::handle`.
    Method(String),
    /// A closure.
    Function(HandlerFn),
}

impl From<&str> for Handler {
    fn from(method: &str) -> Self {
        Handler::Method(method.to_string())
    }
}

impl From<String> for Handler {
    fn from(method: String) -> Self {
        Handler::Method(method)
    }
}

impl From<HandlerFn> for Handler {
    fn from(function: HandlerFn) -> Self {
        Handler::Function(function)
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Method(method) => f.write_str(method),
            Handler::Function(_) => f.write_str("<function>"),
        }
    }
}

/// Whose handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// The object resolved for a key.
    Key(String),
    /// No receiver; only valid with [`Handler::Function`].
    Unattached,
}

impl From<&str> for Receiver {
    fn from(key: &str) -> Self {
        Receiver::Key(key.to_string())
    }
}

impl From<String> for Receiver {
    fn from(key: String) -> Self {
        Receiver::Key(key)
    }
}

impl From<Option<&str>> for Receiver {
    fn from(key: Option<&str>) -> Self {
        key.map_or(Receiver::Unattached, Receiver::from)
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Key(key) => f.write_str(key),
            Receiver::Unattached => f.write_str("<unattached>"),
        }
    }
}

/// A (receiver, handler) pair stored in the handler table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) receiver: Receiver,
    pub(crate) handler: Handler,
}
