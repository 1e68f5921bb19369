//! Core plugins for wirebox.
//!
//! This crate provides the plugins most wirebox applications need:
//!
//! - [`TracingPlugin`] - Logging and observability via the `tracing` crate
//! - [`WiringPlugin`] - Declarative wirings loaded from JSON
//! - [`CommandMap`] - Transient command actors run in response to events
//!
//! # Example
//!
//! ```
//! use wirebox_core_plugins::{Catalog, TracingPlugin, WiringPlugin};
//! use wirebox_system::prelude::*;
//! use tracing::Level;
//!
//! #[derive(Default)]
//! struct Clock;
//! impl Actor for Clock {}
//!
//! let catalog = Catalog::new().with_default::<Clock>("Clock");
//! let wirings = WiringPlugin::from_json(
//!     catalog,
//!     r#"{ "wirings": { "clock": { "impl": "Clock", "singleton": true } } }"#,
//! )?;
//!
//! let system = System::new();
//! system
//!     .add_plugin(TracingPlugin::default().with_level(Level::WARN))?
//!     .add_plugin(wirings)?;
//!
//! assert!(system.has_mapping("clock"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod command;
mod tracing_plugin;
mod wiring;

pub use command::{CommandMap, CommandMapExt, EXECUTE};
pub use tracing_plugin::{TRACING_CONFIG_KEY, TracingConfig, TracingFormat, TracingPlugin};
pub use wiring::{
    Catalog, ConfigSection, HandlerEntry, MissingReceiverPolicy, OutletEntry, Wiring,
    WiringDocument, WiringError, WiringPlugin,
};
