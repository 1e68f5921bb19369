//! Commands: transient actors run in response to events.
//!
//! A command is an actor whose [`EXECUTE`] method does the work. Mapping a
//! command to an event registers it as a transient and maps its `execute`
//! method as the event's handler, so every notification runs a freshly
//! injected command.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wirebox_core_plugins::{CommandMapExt, EXECUTE};
//! use wirebox_system::prelude::*;
//!
//! static SAVED: AtomicUsize = AtomicUsize::new(0);
//!
//! #[derive(Default)]
//! struct SaveCommand;
//!
//! impl Actor for SaveCommand {
//!     fn handle(&self, method: &str, _n: &Notification<'_>) -> Result<bool, BoxError> {
//!         if method != EXECUTE {
//!             return Ok(false);
//!         }
//!         SAVED.fetch_add(1, Ordering::SeqCst);
//!         Ok(true)
//!     }
//! }
//!
//! let system = System::new();
//! system.commands().map_event_of::<SaveCommand>("save", "command.save", false)?;
//!
//! system.notify("save", ())?;
//! system.notify("save", ())?;
//! assert_eq!(SAVED.load(Ordering::SeqCst), 2);
//! # Ok::<(), SystemError>(())
//! ```

use wirebox_system::actor::Actor;
use wirebox_system::error::SystemError;
use wirebox_system::event::Notification;
use wirebox_system::payload::IntoPayload;
use wirebox_system::registry::{MappingKind, Provider};
use wirebox_system::system::System;

/// Method name invoked on commands.
pub const EXECUTE: &str = "execute";

/// Maps commands onto a [`System`].
///
/// Obtain one with [`CommandMapExt::commands`].
#[derive(Debug, Clone, Copy)]
pub struct CommandMap<'a> {
    system: &'a System,
}

impl<'a> CommandMap<'a> {
    /// Wraps `system`.
    #[must_use]
    pub fn new(system: &'a System) -> Self {
        Self { system }
    }

    /// Runs the command mapped under `key` whenever `event` is notified.
    ///
    /// `key` is mapped as a transient producer of `C` unless it is already
    /// mapped, which lets several events share one command. Returns a copy
    /// of the map for chaining.
    ///
    /// # Errors
    ///
    /// - [`SystemError::InvalidArgument`] if `key` is mapped as something
    ///   other than a transient
    /// - any error from mapping the key or the handler
    pub fn map_event<C, F>(
        &self,
        event: &str,
        key: &str,
        constructor: F,
        one_shot: bool,
    ) -> Result<Self, SystemError>
    where
        C: Actor,
        F: Fn() -> C + Send + Sync + 'static,
    {
        match self.system.mapping_kind(key) {
            None => {
                self.system.map(key, Provider::class(constructor))?;
            }
            Some(MappingKind::Class) => {}
            Some(_) => {
                return Err(SystemError::InvalidArgument(
                    "command keys must be mapped as transients",
                ));
            }
        }

        self.system.map_handler(event, key, EXECUTE, one_shot)?;
        tracing::debug!(event, key, one_shot, "command mapped");
        Ok(*self)
    }

    /// [`map_event`](Self::map_event) using `C::default`.
    ///
    /// # Errors
    ///
    /// See [`map_event`](Self::map_event).
    pub fn map_event_of<C: Actor + Default>(
        &self,
        event: &str,
        key: &str,
        one_shot: bool,
    ) -> Result<Self, SystemError> {
        self.map_event(event, key, C::default, one_shot)
    }

    /// Stops running `key` for `event`. The key stays mapped. Returns `true`
    /// if the command was mapped to the event.
    pub fn unmap_event(&self, event: &str, key: &str) -> bool {
        self.system.unmap_handler(event, key, EXECUTE)
    }

    /// Returns `true` if `key` runs for `event`.
    #[must_use]
    pub fn has_event(&self, event: &str, key: &str) -> bool {
        self.system.has_handler(event, key, EXECUTE)
    }

    /// Builds a fresh command for `key` and executes it with `payload`.
    ///
    /// The notification's event name is `key`.
    ///
    /// # Errors
    ///
    /// - [`SystemError::MissingMapping`] if `key` is not mapped
    /// - [`SystemError::UnknownMethod`] if the actor has no `execute` method
    /// - [`SystemError::HandlerFailed`] if the command fails
    pub fn execute(&self, key: &str, payload: impl IntoPayload) -> Result<(), SystemError> {
        let command = self.system.instantiate(key)?;
        let payload = payload.into_payload();
        let notification = Notification::new(key, &payload, self.system);

        tracing::trace!(key, "executing command");
        match command.handle(EXECUTE, &notification) {
            Ok(true) => Ok(()),
            Ok(false) => Err(SystemError::UnknownMethod {
                event: key.to_string(),
                key: key.to_string(),
                method: EXECUTE.to_string(),
            }),
            Err(source) => Err(SystemError::HandlerFailed {
                event: key.to_string(),
                source,
            }),
        }
    }
}

/// Adds [`commands`](Self::commands) to [`System`].
pub trait CommandMapExt {
    /// Returns a [`CommandMap`] for this container.
    fn commands(&self) -> CommandMap<'_>;
}

impl CommandMapExt for System {
    fn commands(&self) -> CommandMap<'_> {
        CommandMap::new(self)
    }
}
