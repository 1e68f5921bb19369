//! A string-keyed inversion-of-control container with event mediation.
//!
//! Objects ("actors") are mapped under string keys as values, transients or
//! singletons. Outlet rules inject resolved objects into properties of new
//! instances, and events dispatch to handlers on resolved receivers or to
//! plain callbacks.
//!
//! ```
//! use wirebox::prelude::*;
//!
//! #[derive(Default)]
//! struct Greeter;
//! impl Actor for Greeter {}
//!
//! let system = System::new();
//! system.map_singleton_of::<Greeter>("greeter")?;
//! assert!(system.get::<Greeter>("greeter").is_ok());
//! # Ok::<(), SystemError>(())
//! ```

pub use wirebox_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use wirebox_internal::prelude::*;
}
