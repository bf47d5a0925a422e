//! Reusable async executor with reconfigurable phases.
//!
//! [`LifecycleExecutor`] lets a request layer describe one logical phase as a
//! list of differently named steps. A request traverses `build_url`,
//! `inject_headers`, and `serialize_body` as a single before phase, each step
//! contributed by whichever plugins implement it.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::executor::lifecycle::LifecycleExecutor;
//! use hookchain_executor::plugin::asynchronous::AsyncPlugin;
//!
//! #[derive(Default)]
//! struct Request {
//!     url: String,
//! }
//!
//! # futures::executor::block_on(async {
//! let mut executor = LifecycleExecutor::<Request, String>::new();
//! executor
//!     .set_before_hooks(["build_url", "append_query"])
//!     .use_plugin(
//!         AsyncPlugin::<Request, String>::new("url")
//!             .on_hook("build_url", |ctx| {
//!                 Box::pin(async move {
//!                     ctx.parameters_mut().url = "https://host/api".into();
//!                     Ok(None)
//!                 })
//!             })
//!             .on_hook("append_query", |ctx| {
//!                 Box::pin(async move {
//!                     ctx.parameters_mut().url.push_str("?page=1");
//!                     Ok(None)
//!                 })
//!             }),
//!     );
//!
//! let url = executor
//!     .exec(Request::default(), |ctx| Box::pin(async move { Ok(ctx.parameters().url.clone()) }))
//!     .await
//!     .unwrap();
//! assert_eq!(url, "https://host/api?page=1");
//! # });
//! ```

use futures::future::BoxFuture;

use super::asynchronous::AsyncExecutor;
use crate::config::ExecutorConfig;
use crate::context::ExecutorContext;
use crate::error::{ExecutorError, HookResult};
use crate::plugin::asynchronous::{AsyncPlugin, AsyncTask};

/// An [`AsyncExecutor`] whose phase hook names can be changed after construction
/// or overridden for a single call.
pub struct LifecycleExecutor<P, R> {
    executor: AsyncExecutor<P, R>,
}

impl<P, R> Default for LifecycleExecutor<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> LifecycleExecutor<P, R> {
    /// Creates an executor with the default hook names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Creates an executor with custom hook names.
    #[must_use]
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            executor: AsyncExecutor::with_config(config),
        }
    }

    /// Registers a plugin. See [`AsyncExecutor::use_plugin`].
    pub fn use_plugin(&mut self, plugin: AsyncPlugin<P, R>) -> &mut Self {
        self.executor.use_plugin(plugin);
        self
    }

    /// Returns the registered plugins in order.
    #[must_use]
    pub fn plugins(&self) -> &[AsyncPlugin<P, R>] {
        self.executor.plugins()
    }

    /// Returns the current hook-name configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        self.executor.config()
    }

    /// Replaces the before-phase hook names.
    pub fn set_before_hooks<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executor.config_mut().before_hooks = names.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a step to the before phase.
    pub fn push_before_hook(&mut self, name: impl Into<String>) -> &mut Self {
        self.executor.config_mut().before_hooks.push(name.into());
        self
    }

    /// Replaces the success-phase hook names.
    pub fn set_after_hooks<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executor.config_mut().after_hooks = names.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a step to the success phase.
    pub fn push_after_hook(&mut self, name: impl Into<String>) -> &mut Self {
        self.executor.config_mut().after_hooks.push(name.into());
        self
    }

    /// Sets the exec-phase hook name.
    pub fn set_exec_hook(&mut self, name: impl Into<String>) -> &mut Self {
        self.executor.config_mut().exec_hook = name.into();
        self
    }

    /// Runs `task` under the stored configuration.
    ///
    /// # Errors
    ///
    /// See [`AsyncExecutor::exec`].
    pub async fn exec<F>(&self, parameters: P, task: F) -> Result<R, ExecutorError>
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.executor.exec(parameters, task).await
    }

    /// Runs `task` under the stored configuration, never unwinding.
    ///
    /// # Errors
    ///
    /// See [`AsyncExecutor::exec_no_error`].
    pub async fn exec_no_error<F>(&self, parameters: P, task: F) -> Result<R, ExecutorError>
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.executor.exec_no_error(parameters, task).await
    }

    /// Runs `task` once under `config`, leaving the stored configuration untouched.
    ///
    /// # Errors
    ///
    /// See [`AsyncExecutor::exec`].
    pub async fn exec_with<F>(
        &self,
        config: &ExecutorConfig,
        parameters: P,
        task: F,
    ) -> Result<R, ExecutorError>
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.executor
            .exec_with_config(config, parameters, AsyncTask::new(task))
            .await
    }
}
