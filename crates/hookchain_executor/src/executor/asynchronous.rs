//! Asynchronous executor.
//!
//! [`AsyncExecutor`] has the same phases, ordering, and chain-break rules as
//! [`SyncExecutor`](super::sync::SyncExecutor). Each hook is awaited before the
//! next one starts, so hooks within a phase never run concurrently even when
//! they perform asynchronous work themselves.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::executor::asynchronous::AsyncExecutor;
//! use hookchain_executor::plugin::asynchronous::AsyncPlugin;
//!
//! # futures::executor::block_on(async {
//! let mut executor = AsyncExecutor::<u32, u32>::new();
//! executor.use_plugin(AsyncPlugin::<u32, u32>::new("double").on_success(|ctx| {
//!     Box::pin(async move {
//!         let doubled = ctx.return_value().copied().unwrap_or_default() * 2;
//!         ctx.set_return_value(doubled);
//!         Ok(None)
//!     })
//! }));
//!
//! let result = executor
//!     .exec(21, |ctx| Box::pin(async move { Ok(*ctx.parameters()) }))
//!     .await;
//! assert_eq!(result.unwrap(), 42);
//! # });
//! ```

use core::ops::ControlFlow;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::{ErrorChain, ExecChain, Settled, after_hook, take_result};
use crate::config::{ExecutorConfig, ON_ERROR};
use crate::context::ExecutorContext;
use crate::error::{ExecutorError, HookResult, ids};
use crate::plugin::asynchronous::{AsyncPlugin, AsyncTask};
use crate::plugin::{NamedPlugin, register};

/// Awaits the before/success-style hooks named in `hook_names` across `plugins`.
///
/// Same visiting order and chaining as
/// [`sync::run_hooks`](super::sync::run_hooks); each hook is awaited before the
/// next one is started.
///
/// # Errors
///
/// Stops at the first hook that fails and returns its error.
pub async fn run_hooks<P, R, S>(
    plugins: &[AsyncPlugin<P, R>],
    hook_names: &[S],
    ctx: &mut ExecutorContext<P, R>,
) -> HookResult<Option<R>>
where
    S: AsRef<str>,
{
    ctx.hooks_runtimes_mut().reset();

    'phase: for hook_name in hook_names {
        let hook_name = hook_name.as_ref();
        for plugin in plugins {
            let Some(hook) = plugin.hook(hook_name) else {
                continue;
            };
            if !plugin.is_enabled(hook_name, ctx) {
                continue;
            }

            ctx.hooks_runtimes_mut().enter(plugin.name(), hook_name);
            tracing::trace!(plugin = plugin.name(), hook = hook_name, "running hook");

            let produced = hook(ctx).await?;
            if after_hook(ctx, produced).is_break() {
                break 'phase;
            }
        }
    }

    Ok(ctx.hooks_runtimes_mut().take_return_value())
}

/// Executor for asynchronous tasks.
///
/// Concurrent `exec` calls on one executor are independent: each call owns a
/// fresh [`ExecutorContext`].
pub struct AsyncExecutor<P, R> {
    config: ExecutorConfig,
    plugins: Vec<AsyncPlugin<P, R>>,
}

impl<P, R> Default for AsyncExecutor<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> AsyncExecutor<P, R> {
    /// Creates an executor with the default hook names and no plugins.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Creates an executor with custom hook names.
    #[must_use]
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin.
    ///
    /// A plugin whose name is already registered is ignored unless both
    /// plugins opt out of uniqueness.
    pub fn use_plugin(&mut self, plugin: AsyncPlugin<P, R>) -> &mut Self {
        register(&mut self.plugins, plugin);
        self
    }

    /// Returns the registered plugins in order.
    #[must_use]
    pub fn plugins(&self) -> &[AsyncPlugin<P, R>] {
        &self.plugins
    }

    /// Returns the hook-name configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut ExecutorConfig {
        &mut self.config
    }

    /// Awaits the named hooks of the registered plugins against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the first hook error.
    pub async fn run_hooks<S: AsRef<str>>(
        &self,
        hook_names: &[S],
        ctx: &mut ExecutorContext<P, R>,
    ) -> HookResult<Option<R>> {
        run_hooks(&self.plugins, hook_names, ctx).await
    }

    /// Runs `task` through the full lifecycle.
    ///
    /// # Errors
    ///
    /// Returns the error surfaced by the error phase: a replacement returned
    /// by an `on_error` hook, an error thrown by one, or the original failure
    /// wrapped under [`ids::UNKNOWN_ASYNC_ERROR`].
    pub async fn exec<F>(&self, parameters: P, task: F) -> Result<R, ExecutorError>
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.exec_with_config(&self.config, parameters, AsyncTask::new(task))
            .await
    }

    /// Like [`exec`](Self::exec), but never unwinds.
    ///
    /// A panic raised while polling a hook or the task is caught and returned
    /// as an [`ids::PANIC`] error.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec), plus caught panics.
    pub async fn exec_no_error<F>(&self, parameters: P, task: F) -> Result<R, ExecutorError>
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        let task = AsyncTask::new(task);
        std::panic::AssertUnwindSafe(self.exec_with_config(&self.config, parameters, task))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ExecutorError::from_panic(payload)))
    }

    pub(crate) async fn exec_with_config(
        &self,
        config: &ExecutorConfig,
        parameters: P,
        task: AsyncTask<P, R>,
    ) -> Result<R, ExecutorError> {
        let mut ctx = ExecutorContext::new(parameters);
        match self.run_lifecycle(config, &mut ctx, task).await {
            Ok(value) => Ok(value),
            Err(error) => {
                ctx.set_error(error);
                Err(self.run_error(&mut ctx).await)
            }
        }
    }

    async fn run_lifecycle(
        &self,
        config: &ExecutorConfig,
        ctx: &mut ExecutorContext<P, R>,
        task: AsyncTask<P, R>,
    ) -> HookResult<R> {
        // Before-phase values only coordinate hooks within the phase.
        run_hooks(&self.plugins, config.before_hooks.as_slice(), ctx).await?;

        let value = self.run_exec(&config.exec_hook, ctx, task).await?;
        ctx.set_return_value(value);

        run_hooks(&self.plugins, config.after_hooks.as_slice(), ctx).await?;
        take_result(ctx)
    }

    async fn run_exec(
        &self,
        hook_name: &str,
        ctx: &mut ExecutorContext<P, R>,
        task: AsyncTask<P, R>,
    ) -> HookResult<R> {
        ctx.hooks_runtimes_mut().reset();

        let mut chain = ExecChain::new(task);
        for plugin in &self.plugins {
            let Some(hook) = plugin.exec_hook(hook_name) else {
                continue;
            };
            if !plugin.is_enabled(hook_name, ctx) {
                continue;
            }

            ctx.hooks_runtimes_mut().enter(plugin.name(), hook_name);
            tracing::trace!(plugin = plugin.name(), hook = hook_name, "running exec hook");

            let outcome = hook(ctx, chain.executable()).await?;
            if chain.apply(ctx, outcome).is_break() {
                break;
            }
        }

        match chain.settle(ctx)? {
            Settled::Call(executable) => executable.call(ctx).await,
            Settled::Value(value) => Ok(value),
        }
    }

    async fn run_error(&self, ctx: &mut ExecutorContext<P, R>) -> ExecutorError {
        ctx.hooks_runtimes_mut().reset();

        let mut chain = ErrorChain::new(ids::UNKNOWN_ASYNC_ERROR);
        for plugin in &self.plugins {
            let Some(hook) = plugin.error_hook() else {
                continue;
            };
            if !plugin.is_enabled(ON_ERROR, ctx) {
                continue;
            }

            ctx.hooks_runtimes_mut().enter(plugin.name(), ON_ERROR);
            tracing::trace!(plugin = plugin.name(), hook = ON_ERROR, "running error hook");

            let result = hook(ctx).await;
            match chain.apply(ctx, result) {
                ControlFlow::Continue(()) => {}
                ControlFlow::Break(Some(thrown)) => return thrown,
                ControlFlow::Break(None) => break,
            }
        }

        chain.finish(ctx)
    }
}

impl<P: Default, R> AsyncExecutor<P, R> {
    /// Runs `task` with default parameters.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec).
    pub async fn exec_default<F>(&self, task: F) -> Result<R, ExecutorError>
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.exec(P::default(), task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ON_BEFORE;

    type Plugin = AsyncPlugin<(), String>;

    #[tokio::test]
    async fn run_hooks_awaits_in_registration_order() {
        let plugins = vec![
            Plugin::new("a").on_before(|ctx| {
                Box::pin(async move {
                    tokio::task::yield_now().await;
                    Ok(Some(format!("{}a", prev(ctx))))
                })
            }),
            Plugin::new("b").on_before(|ctx| Box::pin(async move { Ok(Some(format!("{}b", prev(ctx)))) })),
        ];
        let mut ctx = ExecutorContext::new(());

        let result = run_hooks(&plugins, &[ON_BEFORE], &mut ctx).await.unwrap();
        assert_eq!(result.as_deref(), Some("ab"));
    }

    #[tokio::test]
    async fn run_hooks_empty_inputs_return_none() {
        let mut ctx = ExecutorContext::<(), String>::new(());
        let result = run_hooks::<(), String, &str>(&[], &[ON_BEFORE], &mut ctx).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn exec_default_uses_default_parameters() {
        let executor = AsyncExecutor::<String, usize>::new();
        let len = executor
            .exec_default(|ctx| Box::pin(async move { Ok(ctx.parameters().len()) }))
            .await
            .unwrap();
        assert_eq!(len, 0);
    }

    fn prev(ctx: &ExecutorContext<(), String>) -> String {
        ctx.hooks_runtimes().return_value().cloned().unwrap_or_default()
    }
}
