//! Tracing and observability plugin.
//!
//! Provides [`TracingPlugin`] which installs a `tracing` subscriber and maps
//! its configuration as a value under [`TRACING_CONFIG_KEY`].
//!
//! The container logs mapping changes and construction at `debug`, injection
//! and dispatch at `trace`, and skipped receivers at `warn`. Filter them with
//! the `wirebox_system` target.
//!
//! # Example
//!
//! ```
//! use wirebox_core_plugins::{TRACING_CONFIG_KEY, TracingConfig, TracingFormat, TracingPlugin};
//! use wirebox_system::system::System;
//! use tracing::Level;
//!
//! let system = System::new();
//! system.add_plugin(
//!     TracingPlugin::default()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact),
//! )?;
//!
//! let config = system.get::<TracingConfig>(TRACING_CONFIG_KEY)?;
//! assert_eq!(config.level, Level::DEBUG);
//! # Ok::<(), wirebox_system::error::SystemError>(())
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wirebox_system::actor::Actor;
use wirebox_system::error::SystemError;
use wirebox_system::plugin::Plugin;
use wirebox_system::system::System;

/// Key the [`TracingConfig`] value is mapped under.
pub const TRACING_CONFIG_KEY: &str = "tracing.config";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// The installed tracing configuration.
///
/// Mapped as a value so actors can receive it through an outlet and adapt
/// their logging.
///
/// ```
/// use wirebox_core_plugins::TracingConfig;
/// use tracing::Level;
///
/// fn verbose(config: &TracingConfig) -> bool {
///     config.level >= Level::DEBUG
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    /// The configured log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
}

impl Actor for TracingConfig {}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing and logging plugin.
///
/// Installs a `tracing-subscriber` registry when built. If a global
/// subscriber is already set (for example by a test harness), installation
/// is skipped and the configuration is still mapped.
///
/// # Mappings Provided
///
/// | Key | Kind | Description |
/// |-----|------|-------------|
/// | [`TRACING_CONFIG_KEY`] | Value | [`TracingConfig`] |
///
/// # Environment Filter
///
/// ```
/// use wirebox_core_plugins::TracingPlugin;
///
/// TracingPlugin::default()
///     .with_env_filter("wirebox_system=trace,my_app=debug")
/// # ;
/// ```
#[derive(Clone)]
pub struct TracingPlugin {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "`wirebox_system=debug`").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingPlugin {
    /// Creates a new `TracingPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`. An invalid filter falls back
    /// to the configured level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configuration this plugin maps.
    #[must_use]
    pub fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level,
            format: self.format,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    /// Installs the global subscriber. Returns `false` if one was already
    /// installed.
    fn install(&self) -> bool {
        let env_filter = self.env_filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match self.format {
            TracingFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init(),
        };
        result.is_ok()
    }
}

impl Plugin for TracingPlugin {
    fn build(&self, system: &System) -> Result<(), SystemError> {
        system.map_value(TRACING_CONFIG_KEY, self.config())?;

        if self.install() {
            tracing::info!(
                level = %self.level,
                format = ?self.format,
                "TracingPlugin initialized"
            );
        } else {
            tracing::debug!("global subscriber already set, TracingPlugin kept it");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "wirebox::tracing"
    }
}
