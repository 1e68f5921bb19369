//! Event mediation.
//!
//! Two parallel mechanisms map event names to reactions:
//!
//! - **Handlers** ([`handler`]): `(receiver, handler, one_shot)` bindings. On
//!   notification the receiver key is resolved through the container
//!   (respecting singleton/transient semantics) and the handler is invoked
//!   on it.
//! - **Callbacks** ([`callback`]): free functions keyed by event name. No
//!   resolution is involved.
//!
//! # Dispatch order
//!
//! `notify` runs every handler mapped to the event in registration order,
//! then every callback in registration order. Dispatch iterates a snapshot
//! of the tables, so handlers may map, unmap or notify without disturbing
//! the pass in progress.
//!
//! A one-shot entry is removed from the live table immediately before it
//! runs. If it is already gone (a re-entrant `notify` fired it first), the
//! entry is skipped, so it fires exactly once.

pub mod callback;
pub mod handler;
mod table;

pub use callback::Callback;
pub use handler::{Handler, HandlerFn, Receiver};
pub(crate) use table::EventTable;

use crate::payload::Payload;
use crate::system::System;

/// Context passed to handlers and callbacks.
///
/// Carries the event name (the event metadata), the payload, and the
/// dispatching container so reactions can resolve objects or notify further
/// events.
#[derive(Debug, Clone, Copy)]
pub struct Notification<'a> {
    event: &'a str,
    payload: &'a Payload,
    system: &'a System,
}

impl<'a> Notification<'a> {
    /// Creates a notification context.
    ///
    /// [`System::notify`] builds these itself; this is for code that invokes
    /// [`Actor::handle`](crate::actor::Actor::handle) directly.
    #[must_use]
    pub fn new(event: &'a str, payload: &'a Payload, system: &'a System) -> Self {
        Self {
            event,
            payload,
            system,
        }
    }

    /// Returns the name of the event being dispatched.
    #[must_use]
    pub fn event(&self) -> &'a str {
        self.event
    }

    /// Returns the notification payload.
    #[must_use]
    pub fn payload(&self) -> &'a Payload {
        self.payload
    }

    /// Returns the payload argument at `index` if it is a `T`.
    #[must_use]
    pub fn arg<T: core::any::Any>(&self, index: usize) -> Option<&'a T> {
        self.payload.get(index)
    }

    /// Returns the dispatching container.
    #[must_use]
    pub fn system(&self) -> &'a System {
        self.system
    }
}
