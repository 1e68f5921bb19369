//! # wirebox Internal Library
//!
//! Re-exports the core wirebox crates for convenience.

/// Layer 1: registry, resolver, outlets and event mediation.
pub use wirebox_system;

/// Layer 2: tracing, declarative wirings and commands.
pub use wirebox_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use wirebox_core_plugins::{
        Catalog, CommandMap, CommandMapExt, TracingPlugin, WiringError, WiringPlugin,
    };
    pub use wirebox_system::prelude::*;
}
