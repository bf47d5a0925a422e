//! Synchronous executor.
//!
//! [`SyncExecutor`] runs entirely on the calling thread with no suspension
//! points. Hooks and the task are plain closures.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::executor::sync::SyncExecutor;
//! use hookchain_executor::plugin::sync::SyncPlugin;
//!
//! struct Params {
//!     v: String,
//! }
//!
//! let mut executor = SyncExecutor::<Params, String>::new();
//! executor.use_plugin(SyncPlugin::<Params, String>::new("p1").on_before(|ctx| {
//!     ctx.parameters_mut().v = "p1".to_string();
//!     Ok(None)
//! }));
//!
//! let result = executor.exec(Params { v: "a".into() }, |ctx| Ok(ctx.parameters().v.clone()));
//! assert_eq!(result.unwrap(), "p1");
//! ```

use core::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};

use super::{ErrorChain, ExecChain, Settled, after_hook, take_result};
use crate::config::{ExecutorConfig, ON_ERROR};
use crate::context::ExecutorContext;
use crate::error::{ExecutorError, HookResult, ids};
use crate::plugin::sync::{SyncPlugin, Task};
use crate::plugin::{NamedPlugin, register};

/// Runs the before/success-style hooks named in `hook_names` across `plugins`.
///
/// Hook names are visited in order; within each name, plugins run in
/// registration order. Plugins lacking the hook or gated off are skipped. The
/// phase scratch state is reset first, and every produced value becomes
/// visible to later hooks through
/// [`HookRuntimes::return_value`](crate::context::HookRuntimes::return_value).
///
/// Returns the last value produced, or `None` if no hook produced one (including
/// when `plugins` or `hook_names` is empty).
///
/// # Errors
///
/// Stops at the first hook that fails and returns its error.
pub fn run_hooks<P, R, S>(
    plugins: &[SyncPlugin<P, R>],
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

            let produced = hook(ctx)?;
            if after_hook(ctx, produced).is_break() {
                break 'phase;
            }
        }
    }

    Ok(ctx.hooks_runtimes_mut().take_return_value())
}

/// Executor for synchronous tasks.
///
/// # Type Parameters
///
/// * `P` - Parameters passed to every call
/// * `R` - Value produced by the task
pub struct SyncExecutor<P, R> {
    config: ExecutorConfig,
    plugins: Vec<SyncPlugin<P, R>>,
}

impl<P, R> Default for SyncExecutor<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> SyncExecutor<P, R> {
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
    pub fn use_plugin(&mut self, plugin: SyncPlugin<P, R>) -> &mut Self {
        register(&mut self.plugins, plugin);
        self
    }

    /// Returns the registered plugins in order.
    #[must_use]
    pub fn plugins(&self) -> &[SyncPlugin<P, R>] {
        &self.plugins
    }

    /// Returns the hook-name configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs the named hooks of the registered plugins against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the first hook error.
    pub fn run_hooks<S: AsRef<str>>(
        &self,
        hook_names: &[S],
        ctx: &mut ExecutorContext<P, R>,
    ) -> HookResult<Option<R>> {
        run_hooks(&self.plugins, hook_names, ctx)
    }

    /// Runs `task` through the full lifecycle.
    ///
    /// # Errors
    ///
    /// Returns the error surfaced by the error phase: a replacement returned
    /// by an `on_error` hook, an error thrown by one, or the original failure
    /// wrapped under [`ids::UNKNOWN_SYNC_ERROR`].
    pub fn exec<F>(&self, parameters: P, task: F) -> Result<R, ExecutorError>
    where
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<R> + Send + Sync + 'static,
    {
        let mut ctx = ExecutorContext::new(parameters);
        match self.run_lifecycle(&mut ctx, Task::new(task)) {
            Ok(value) => Ok(value),
            Err(error) => {
                ctx.set_error(error);
                Err(self.run_error(&mut ctx))
            }
        }
    }

    /// Like [`exec`](Self::exec), but never unwinds.
    ///
    /// A panic raised by a hook or the task is caught and returned as an
    /// [`ids::PANIC`] error.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec), plus caught panics.
    pub fn exec_no_error<F>(&self, parameters: P, task: F) -> Result<R, ExecutorError>
    where
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<R> + Send + Sync + 'static,
    {
        catch_unwind(AssertUnwindSafe(|| self.exec(parameters, task)))
            .unwrap_or_else(|payload| Err(ExecutorError::from_panic(payload)))
    }

    fn run_lifecycle(&self, ctx: &mut ExecutorContext<P, R>, task: Task<P, R>) -> HookResult<R> {
        // Before-phase values only coordinate hooks within the phase.
        run_hooks(&self.plugins, self.config.before_hooks.as_slice(), ctx)?;

        let value = self.run_exec(ctx, task)?;
        ctx.set_return_value(value);

        run_hooks(&self.plugins, self.config.after_hooks.as_slice(), ctx)?;
        take_result(ctx)
    }

    fn run_exec(&self, ctx: &mut ExecutorContext<P, R>, task: Task<P, R>) -> HookResult<R> {
        let hook_name = self.config.exec_hook.as_str();
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

            let outcome = hook(ctx, chain.executable())?;
            if chain.apply(ctx, outcome).is_break() {
                break;
            }
        }

        match chain.settle(ctx)? {
            Settled::Call(executable) => executable.call(ctx),
            Settled::Value(value) => Ok(value),
        }
    }

    fn run_error(&self, ctx: &mut ExecutorContext<P, R>) -> ExecutorError {
        ctx.hooks_runtimes_mut().reset();

        let mut chain = ErrorChain::new(ids::UNKNOWN_SYNC_ERROR);
        for plugin in &self.plugins {
            let Some(hook) = plugin.error_hook() else {
                continue;
            };
            if !plugin.is_enabled(ON_ERROR, ctx) {
                continue;
            }

            ctx.hooks_runtimes_mut().enter(plugin.name(), ON_ERROR);
            tracing::trace!(plugin = plugin.name(), hook = ON_ERROR, "running error hook");

            let result = hook(ctx);
            match chain.apply(ctx, result) {
                ControlFlow::Continue(()) => {}
                ControlFlow::Break(Some(thrown)) => return thrown,
                ControlFlow::Break(None) => break,
            }
        }

        chain.finish(ctx)
    }
}

impl<P: Default, R> SyncExecutor<P, R> {
    /// Runs `task` with default parameters.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec).
    pub fn exec_default<F>(&self, task: F) -> Result<R, ExecutorError>
    where
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<R> + Send + Sync + 'static,
    {
        self.exec(P::default(), task)
    }
}
