//! Ready-made plugins for hookchain executors.
//!
//! - [`RetryPlugin`] - Re-runs a failing task with optional exponential backoff
//! - [`TracingPlugin`] - Installs a `tracing` subscriber and logs each call's lifecycle
//!
//! Both plugins are plain configuration values. Turn one into a registrable
//! plugin with `into_sync_plugin()` or `into_async_plugin()`.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::AsyncExecutor;
//! use hookchain_plugins::{RetryPlugin, TracingPlugin};
//!
//! let mut executor = AsyncExecutor::<(), String>::new();
//! executor
//!     .use_plugin(TracingPlugin::default().into_async_plugin())
//!     .use_plugin(RetryPlugin::new().with_max_retries(2).into_async_plugin());
//! ```

mod retry;
mod tracing_plugin;

pub use retry::{MAX_RETRIES_CAP, RetryPlugin, ShouldRetryFn};
pub use tracing_plugin::{TracingFormat, TracingPlugin};
