//! The inversion-of-control core of wirebox.
//!
//! `wirebox_system` provides a string-keyed object container with event
//! mediation:
//!
//! - [`registry`] - Providers and mapping kinds (value, class, singleton)
//! - [`outlet`] - Outlet rules describing property injection
//! - [`event`] - Handlers, callbacks and notifications
//! - [`mod@system`] - The [`System`](system::System) container tying it together
//! - [`actor`] - The capability interface every managed object implements
//! - [`plugin`] - Reusable bundles of wiring
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wirebox_system::prelude::*;
//!
//! #[derive(Default)]
//! struct Counter {
//!     hits: AtomicUsize,
//! }
//!
//! impl Actor for Counter {
//!     fn handle(&self, method: &str, _n: &Notification<'_>) -> Result<bool, BoxError> {
//!         match method {
//!             "hit" => {
//!                 self.hits.fetch_add(1, Ordering::SeqCst);
//!                 Ok(true)
//!             }
//!             _ => Ok(false),
//!         }
//!     }
//! }
//!
//! let system = System::new();
//! system
//!     .map_singleton_of::<Counter>("counter")?
//!     .map_handler("tick", "counter", "hit", false)?;
//!
//! system.notify("tick", ())?;
//! system.notify("tick", ())?;
//!
//! let counter = system.get::<Counter>("counter")?;
//! assert_eq!(counter.hits.load(Ordering::SeqCst), 2);
//! # Ok::<(), SystemError>(())
//! ```

/// The actor capability interface and typed outlets.
pub mod actor;

/// Container configuration.
pub mod config;

/// Container errors.
pub mod error;

/// Handlers, callbacks and notifications.
pub mod event;

/// Outlet rules.
pub mod outlet;

/// Notification payloads.
pub mod payload;

/// Plugin trait for reusable wiring.
pub mod plugin;

/// Mapping providers.
pub mod registry;

/// The container.
pub mod system;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::outlet::*;
    pub use crate::payload::*;
    pub use crate::plugin::*;
    pub use crate::registry::{MappingKind, Provider};
    pub use crate::system::*;
}
