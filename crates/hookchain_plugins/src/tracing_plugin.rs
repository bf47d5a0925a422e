//! Tracing and observability plugin.
//!
//! Provides [`TracingPlugin`], which does two jobs:
//!
//! - **`install()`** configures the global `tracing` subscriber. The executor
//!   crates only emit events; nothing is printed until a subscriber exists.
//! - **`into_sync_plugin()` / `into_async_plugin()`** build a lifecycle plugin
//!   named `"tracing"` that logs every call as it enters the before, success,
//!   and error phases. It never alters values or errors.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::SyncExecutor;
//! use hookchain_plugins::{TracingFormat, TracingPlugin};
//! use tracing::Level;
//!
//! let plugin = TracingPlugin::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact);
//! plugin.install();
//!
//! let mut executor = SyncExecutor::<(), u32>::new();
//! executor.use_plugin(plugin.into_sync_plugin());
//! assert_eq!(executor.exec((), |_| Ok(7)).unwrap(), 7);
//! ```

use hookchain_executor::context::ExecutorContext;
use hookchain_executor::error::ExecutorError;
use hookchain_executor::plugin::asynchronous::AsyncPlugin;
use hookchain_executor::plugin::sync::SyncPlugin;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Emits an event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            tracing::error!($($arg)+);
        } else if level == Level::WARN {
            tracing::warn!($($arg)+);
        } else if level == Level::INFO {
            tracing::info!($($arg)+);
        } else if level == Level::DEBUG {
            tracing::debug!($($arg)+);
        } else {
            tracing::trace!($($arg)+);
        }
    }};
}

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
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing and logging plugin.
///
/// # Configuration Options
///
/// ```
/// use hookchain_plugins::{TracingFormat, TracingPlugin};
/// use tracing::Level;
///
/// // Development: pretty output with span enter/exit
/// let dev = TracingPlugin::default()
///     .with_level(Level::DEBUG)
///     .with_format(TracingFormat::Pretty)
///     .with_span_events(true);
///
/// // Production: JSON output for log aggregation
/// let prod = TracingPlugin::default()
///     .with_level(Level::INFO)
///     .with_format(TracingFormat::Json)
///     .with_env_filter("hookchain_executor=debug,hyper=warn");
/// ```
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    /// Maximum log level, also the level of lifecycle events.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "hookchain_executor=trace").
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
    /// Name under which the lifecycle plugin registers.
    pub const NAME: &'static str = "tracing";

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

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured output format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Installs the global subscriber.
    ///
    /// Does nothing if a global subscriber is already set.
    pub fn install(&self) {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init().ok() ignores errors if already initialized
        match self.format {
            TracingFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::debug!(
            level = %self.level,
            format = ?self.format,
            "tracing subscriber installed"
        );
    }

    /// Builds the lifecycle-logging plugin for a sync executor.
    #[must_use]
    pub fn into_sync_plugin<P, R>(self) -> SyncPlugin<P, R> {
        let level = self.level;
        SyncPlugin::new(Self::NAME)
            .on_before(move |_| {
                log_before(level);
                Ok(None)
            })
            .on_success(move |ctx| {
                log_success(level, ctx);
                Ok(None)
            })
            .on_error(move |ctx| {
                log_error(level, ctx);
                Ok(None)
            })
    }

    /// Builds the lifecycle-logging plugin for an async executor.
    #[must_use]
    pub fn into_async_plugin<P, R>(self) -> AsyncPlugin<P, R> {
        let level = self.level;
        AsyncPlugin::new(Self::NAME)
            .on_before(move |_| {
                log_before(level);
                Box::pin(async { Ok(None) })
            })
            .on_success(move |ctx| {
                log_success(level, ctx);
                Box::pin(async { Ok(None) })
            })
            .on_error(move |ctx| {
                log_error(level, ctx);
                Box::pin(async { Ok(None) })
            })
    }
}

fn log_before(level: Level) {
    event_at!(level, phase = "before", "exec started");
}

fn log_success<P, R>(level: Level, ctx: &ExecutorContext<P, R>) {
    event_at!(
        level,
        phase = "success",
        has_value = ctx.return_value().is_some(),
        "exec succeeded"
    );
}

fn log_error<P, R>(level: Level, ctx: &ExecutorContext<P, R>) {
    let message = ctx.error().map(ExecutorError::message).unwrap_or_default();
    let id = ctx.error().and_then(ExecutorError::id).unwrap_or_default();
    event_at!(level, phase = "error", error = message, id, "exec failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookchain_executor::NamedPlugin;

    #[test]
    fn tracing_format_default_is_pretty() {
        assert_eq!(TracingFormat::default(), TracingFormat::Pretty);
    }

    #[test]
    fn tracing_plugin_default_level_is_info() {
        let plugin = TracingPlugin::default();
        assert_eq!(plugin.level(), Level::INFO);
    }

    #[test]
    fn tracing_plugin_builders() {
        let plugin = TracingPlugin::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("hookchain_executor=trace")
            .with_span_events(true);

        assert_eq!(plugin.level(), Level::DEBUG);
        assert_eq!(plugin.format(), TracingFormat::Json);
        assert_eq!(plugin.env_filter.as_deref(), Some("hookchain_executor=trace"));
        assert!(plugin.span_events);
    }

    #[test]
    fn install_twice_is_harmless() {
        let plugin = TracingPlugin::new().with_env_filter("not a [valid filter");
        plugin.install();
        plugin.install();
    }

    #[test]
    fn lifecycle_plugin_is_passive() {
        let plugin: SyncPlugin<(), i32> = TracingPlugin::new().into_sync_plugin();
        assert_eq!(plugin.name(), TracingPlugin::NAME);
        assert!(plugin.hook("on_before").is_some());
        assert!(plugin.exec_hook("on_exec").is_none());

        let mut ctx = ExecutorContext::new(());
        let success = plugin.hook("on_success").expect("on_success should be set");
        assert_eq!(success(&mut ctx).unwrap(), None);
    }
}
