//! Run a task wrapped by an ordered chain of pluggable lifecycle hooks.
//!
//! ```
//! use hookchain::prelude::*;
//!
//! let mut executor = SyncExecutor::<u32, u32>::new();
//! executor.use_plugin(RetryPlugin::new().with_max_retries(1).into_sync_plugin());
//! assert_eq!(executor.exec(20, |ctx| Ok(*ctx.parameters() + 1)).unwrap(), 21);
//! ```

pub use hookchain_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookchain_internal::prelude::*;
}
