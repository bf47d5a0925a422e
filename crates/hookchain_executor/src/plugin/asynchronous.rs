//! Plugins and tasks for [`AsyncExecutor`](crate::executor::asynchronous::AsyncExecutor).
//!
//! Async hooks return a boxed future borrowing the context for the duration
//! of the call. Hooks are awaited one at a time, so each hook observes every
//! mutation made by the hooks before it.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::outcome::ExecOutcome;
//! use hookchain_executor::plugin::asynchronous::{AsyncPlugin, AsyncTask};
//!
//! let plugin = AsyncPlugin::<u32, String>::new("suffix")
//!     .on_exec(|_ctx, inner: AsyncTask<u32, String>| {
//!         Box::pin(async move {
//!             Ok(ExecOutcome::Wrapper(AsyncTask::new(move |ctx| {
//!                 let inner = inner.clone();
//!                 Box::pin(async move { Ok(format!("{}!", inner.call(ctx).await?)) })
//!             })))
//!         })
//!     });
//! ```

use core::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use hashbrown::HashMap;

use super::{EnabledFn, NamedPlugin};
use crate::config::{ON_BEFORE, ON_EXEC, ON_SUCCESS};
use crate::context::ExecutorContext;
use crate::error::{ExecutorError, HookResult};
use crate::outcome::ExecOutcome;

/// Before/success/custom hook of an [`AsyncPlugin`].
pub type AsyncHookFn<P, R> = Arc<
    dyn for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<Option<R>>>
        + Send
        + Sync,
>;

/// Exec hook of an [`AsyncPlugin`].
pub type AsyncExecHookFn<P, R> = Arc<
    dyn for<'a> Fn(
            &'a mut ExecutorContext<P, R>,
            AsyncTask<P, R>,
        ) -> BoxFuture<'a, HookResult<ExecOutcome<AsyncTask<P, R>, R>>>
        + Send
        + Sync,
>;

/// Error hook of an [`AsyncPlugin`].
pub type AsyncErrorHookFn<P, R> = Arc<
    dyn for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<Option<ExecutorError>>>
        + Send
        + Sync,
>;

// ─────────────────────────────────────────────────────────────────────────────
// AsyncTask
// ─────────────────────────────────────────────────────────────────────────────

/// An asynchronous executable: the caller's task or a wrapper around one.
pub struct AsyncTask<P, R>(
    Arc<dyn for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>> + Send + Sync>,
);

impl<P, R> AsyncTask<P, R> {
    /// Creates a task from a closure returning a boxed future.
    #[must_use]
    pub fn new<F>(task: F) -> Self
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(task))
    }

    /// Runs the task against the context.
    pub fn call<'a>(&self, ctx: &'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<R>> {
        (self.0)(ctx)
    }
}

impl<P, R> Clone for AsyncTask<P, R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P, R> fmt::Debug for AsyncTask<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTask").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AsyncPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// A plugin for asynchronous executors.
pub struct AsyncPlugin<P, R> {
    name: String,
    only_one: bool,
    enabled: Option<EnabledFn<P, R>>,
    on_before: Option<AsyncHookFn<P, R>>,
    on_exec: Option<AsyncExecHookFn<P, R>>,
    on_success: Option<AsyncHookFn<P, R>>,
    on_error: Option<AsyncErrorHookFn<P, R>>,
    hooks: HashMap<String, AsyncHookFn<P, R>>,
    exec_hooks: HashMap<String, AsyncExecHookFn<P, R>>,
}

impl<P, R> AsyncPlugin<P, R> {
    /// Creates a plugin with no hooks.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            only_one: true,
            enabled: None,
            on_before: None,
            on_exec: None,
            on_success: None,
            on_error: None,
            hooks: HashMap::new(),
            exec_hooks: HashMap::new(),
        }
    }

    /// Allows or forbids registering other plugins with the same name.
    #[must_use]
    pub fn with_only_one(mut self, only_one: bool) -> Self {
        self.only_one = only_one;
        self
    }

    /// Sets the per-invocation gate.
    #[must_use]
    pub fn with_enabled<F>(mut self, enabled: F) -> Self
    where
        F: Fn(&str, &ExecutorContext<P, R>) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(enabled));
        self
    }

    /// Sets the `on_before` hook.
    #[must_use]
    pub fn on_before<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<Option<R>>>
            + Send
            + Sync
            + 'static,
    {
        self.on_before = Some(Arc::new(hook));
        self
    }

    /// Sets the `on_exec` hook.
    #[must_use]
    pub fn on_exec<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut ExecutorContext<P, R>,
                AsyncTask<P, R>,
            ) -> BoxFuture<'a, HookResult<ExecOutcome<AsyncTask<P, R>, R>>>
            + Send
            + Sync
            + 'static,
    {
        self.on_exec = Some(Arc::new(hook));
        self
    }

    /// Sets the `on_success` hook.
    #[must_use]
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<Option<R>>>
            + Send
            + Sync
            + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Sets the `on_error` hook.
    #[must_use]
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut ExecutorContext<P, R>,
            ) -> BoxFuture<'a, HookResult<Option<ExecutorError>>>
            + Send
            + Sync
            + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Sets a before/success-style hook under any name.
    ///
    /// `on_before` and `on_success` route to their dedicated slots.
    #[must_use]
    pub fn on_hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: for<'a> Fn(&'a mut ExecutorContext<P, R>) -> BoxFuture<'a, HookResult<Option<R>>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let hook: AsyncHookFn<P, R> = Arc::new(hook);
        match name.as_str() {
            ON_BEFORE => self.on_before = Some(hook),
            ON_SUCCESS => self.on_success = Some(hook),
            _ => {
                self.hooks.insert(name, hook);
            }
        }
        self
    }

    /// Sets an exec-style hook under any name.
    #[must_use]
    pub fn on_exec_hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut ExecutorContext<P, R>,
                AsyncTask<P, R>,
            ) -> BoxFuture<'a, HookResult<ExecOutcome<AsyncTask<P, R>, R>>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let hook: AsyncExecHookFn<P, R> = Arc::new(hook);
        if name == ON_EXEC {
            self.on_exec = Some(hook);
        } else {
            self.exec_hooks.insert(name, hook);
        }
        self
    }

    /// Looks up a before/success-style hook by name.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<&AsyncHookFn<P, R>> {
        match name {
            ON_BEFORE => self.on_before.as_ref(),
            ON_SUCCESS => self.on_success.as_ref(),
            _ => self.hooks.get(name),
        }
    }

    /// Looks up an exec-style hook by name.
    #[must_use]
    pub fn exec_hook(&self, name: &str) -> Option<&AsyncExecHookFn<P, R>> {
        if name == ON_EXEC {
            self.on_exec.as_ref()
        } else {
            self.exec_hooks.get(name)
        }
    }

    /// Returns the `on_error` hook.
    #[must_use]
    pub fn error_hook(&self) -> Option<&AsyncErrorHookFn<P, R>> {
        self.on_error.as_ref()
    }

    /// Evaluates the gate for one invocation. Plugins without a gate are always enabled.
    #[must_use]
    pub fn is_enabled(&self, hook_name: &str, ctx: &ExecutorContext<P, R>) -> bool {
        self.enabled
            .as_ref()
            .is_none_or(|enabled| enabled(hook_name, ctx))
    }
}

impl<P, R> NamedPlugin for AsyncPlugin<P, R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn only_one(&self) -> bool {
        self.only_one
    }
}

impl<P, R> Clone for AsyncPlugin<P, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            only_one: self.only_one,
            enabled: self.enabled.clone(),
            on_before: self.on_before.clone(),
            on_exec: self.on_exec.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            hooks: self.hooks.clone(),
            exec_hooks: self.exec_hooks.clone(),
        }
    }
}

impl<P, R> fmt::Debug for AsyncPlugin<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncPlugin")
            .field("name", &self.name)
            .field("only_one", &self.only_one)
            .field("on_before", &self.on_before.is_some())
            .field("on_exec", &self.on_exec.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .field("exec_hooks", &self.exec_hooks.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
