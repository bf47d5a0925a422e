//! Hook-chain execution runtime.
//!
//! `hookchain_executor` runs a caller-supplied task through a fixed lifecycle
//! of phases and lets registered plugins observe and alter every phase.
//!
//! # Core Concepts
//!
//! - [`SyncPlugin`] / [`AsyncPlugin`] - Named bundles of optional hooks
//! - [`SyncExecutor`] / [`AsyncExecutor`] - Ordered plugin lists plus the lifecycle driver
//! - [`LifecycleExecutor`] - Async executor whose phase hook names can be reconfigured
//! - [`ExecutorContext`] - Per-call state shared by every hook and the task
//! - [`ExecOutcome`] - What an exec hook hands back: a value or a wrapping executable
//! - [`ExecutorError`] - Error carrying an optional identifier and the original failure
//!
//! # Lifecycle
//!
//! 1. **Before**: every plugin's before hooks run in registration order and may
//!    mutate the parameters.
//! 2. **Exec**: exec hooks may wrap the task or short-circuit it with a value.
//! 3. **Success**: after hooks may transform the result.
//! 4. **Error**: any failure above runs the `on_error` hooks, which may replace
//!    the error. Unhandled errors are wrapped under an unknown-error id.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::prelude::*;
//!
//! let mut executor = SyncExecutor::<String, String>::new();
//! executor.use_plugin(SyncPlugin::<String, String>::new("shout").on_success(|ctx| {
//!     if let Some(value) = ctx.return_value().map(|value| value.to_uppercase()) {
//!         ctx.set_return_value(value);
//!     }
//!     Ok(None)
//! }));
//!
//! let greeting = executor.exec("hello".to_string(), |ctx| Ok(format!("{} world", ctx.parameters())));
//! assert_eq!(greeting.unwrap(), "HELLO WORLD");
//! ```

/// Phase hook names.
pub mod config;

/// Per-call execution state.
pub mod context;

/// Error type and well-known error identifiers.
pub mod error;

/// Sync, async, and lifecycle executors.
pub mod executor;

/// Exec-hook return values.
pub mod outcome;

/// Plugin contract, hook types, and registration.
pub mod plugin;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{ExecutorConfig, ON_BEFORE, ON_ERROR, ON_EXEC, ON_SUCCESS};
    pub use crate::context::{ExecutorContext, HookRuntimes};
    pub use crate::error::{BoxError, ExecutorError, HookResult, ids};
    pub use crate::executor::asynchronous::AsyncExecutor;
    pub use crate::executor::lifecycle::LifecycleExecutor;
    pub use crate::executor::sync::SyncExecutor;
    pub use crate::outcome::ExecOutcome;
    pub use crate::plugin::NamedPlugin;
    pub use crate::plugin::asynchronous::{AsyncPlugin, AsyncTask};
    pub use crate::plugin::sync::{SyncPlugin, Task};
    pub use futures::future::BoxFuture;
}

// Re-export key types at crate root for convenience
pub use config::ExecutorConfig;
pub use context::{ExecutorContext, HookRuntimes};
pub use error::{ExecutorError, HookResult};
pub use executor::asynchronous::AsyncExecutor;
pub use executor::lifecycle::LifecycleExecutor;
pub use executor::sync::SyncExecutor;
pub use outcome::ExecOutcome;
pub use plugin::NamedPlugin;
pub use plugin::asynchronous::{AsyncPlugin, AsyncTask};
pub use plugin::sync::{SyncPlugin, Task};
