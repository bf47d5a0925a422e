//! # Hookchain Internal Library
//!
//! Re-exports the core hookchain crates for convenience.

/// Plugin contract, executors, and the per-call context.
pub use hookchain_executor;

/// Ready-made retry and tracing plugins.
pub use hookchain_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookchain_executor::prelude::*;
    pub use hookchain_plugins::{RetryPlugin, TracingFormat, TracingPlugin};
}
