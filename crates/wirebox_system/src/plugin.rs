//! Plugins bundle mappings, outlets and handlers into reusable units.
//!
//! A plugin receives the container once, in [`Plugin::build`], and wires
//! whatever it provides. Unique plugins (the default) may only be added once
//! per container.
//!
//! # Example
//!
//! ```
//! use wirebox_system::prelude::*;
//!
//! #[derive(Default)]
//! struct Clock;
//! impl Actor for Clock {}
//!
//! struct ClockPlugin;
//!
//! impl Plugin for ClockPlugin {
//!     fn build(&self, system: &System) -> Result<(), SystemError> {
//!         system.map_singleton_of::<Clock>("clock")?;
//!         system.map_global_outlet("clock")?;
//!         Ok(())
//!     }
//! }
//!
//! let system = System::new();
//! system.add_plugin(ClockPlugin)?;
//! assert!(system.has_mapping("clock"));
//! assert!(system.add_plugin(ClockPlugin).is_err());
//! # Ok::<(), SystemError>(())
//! ```

use core::any::TypeId;

use crate::error::SystemError;
use crate::system::System;

// ─────────────────────────────────────────────────────────────────────────────
// PluginId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a plugin type.
///
/// Based on [`TypeId`], so each plugin type has exactly one `PluginId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginId {
    /// Creates a `PluginId` for the given plugin type.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: core::any::type_name::<P>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of container configuration.
pub trait Plugin: Send + Sync + 'static {
    /// Wires the plugin's mappings into `system`. Called once, from
    /// [`System::add_plugin`].
    ///
    /// # Errors
    ///
    /// Any mapping error. The container keeps whatever was mapped before
    /// the failure.
    fn build(&self, system: &System) -> Result<(), SystemError>;

    /// Returns the plugin's name for logging and error messages.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Whether only one instance of this plugin may be added.
    fn is_unique(&self) -> bool {
        true
    }
}
