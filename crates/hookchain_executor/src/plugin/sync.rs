//! Plugins and tasks for [`SyncExecutor`](crate::executor::sync::SyncExecutor).
//!
//! # Example
//!
//! ```
//! use hookchain_executor::outcome::ExecOutcome;
//! use hookchain_executor::plugin::sync::{SyncPlugin, Task};
//!
//! struct Request {
//!     url: String,
//! }
//!
//! let plugin = SyncPlugin::<Request, String>::new("prefix")
//!     .on_before(|ctx| {
//!         ctx.parameters_mut().url.insert_str(0, "https://");
//!         Ok(None)
//!     })
//!     .on_exec(|_ctx, inner: Task<Request, String>| {
//!         Ok(ExecOutcome::Wrapper(Task::new(move |ctx| {
//!             inner.call(ctx).map(|body| body.to_uppercase())
//!         })))
//!     });
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use super::{EnabledFn, NamedPlugin};
use crate::config::{ON_BEFORE, ON_EXEC, ON_SUCCESS};
use crate::context::ExecutorContext;
use crate::error::{ExecutorError, HookResult};
use crate::outcome::ExecOutcome;

/// Before/success/custom hook of a [`SyncPlugin`].
pub type SyncHookFn<P, R> =
    Arc<dyn Fn(&mut ExecutorContext<P, R>) -> HookResult<Option<R>> + Send + Sync>;

/// Exec hook of a [`SyncPlugin`].
pub type SyncExecHookFn<P, R> = Arc<
    dyn Fn(&mut ExecutorContext<P, R>, Task<P, R>) -> HookResult<ExecOutcome<Task<P, R>, R>>
        + Send
        + Sync,
>;

/// Error hook of a [`SyncPlugin`].
pub type SyncErrorHookFn<P, R> =
    Arc<dyn Fn(&mut ExecutorContext<P, R>) -> HookResult<Option<ExecutorError>> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// A synchronous executable: the caller's task or a wrapper around one.
///
/// Cloning is cheap, so wrappers can capture the executable they wrap.
pub struct Task<P, R>(Arc<dyn Fn(&mut ExecutorContext<P, R>) -> HookResult<R> + Send + Sync>);

impl<P, R> Task<P, R> {
    /// Creates a task from a closure.
    #[must_use]
    pub fn new<F>(task: F) -> Self
    where
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<R> + Send + Sync + 'static,
    {
        Self(Arc::new(task))
    }

    /// Runs the task against the context.
    ///
    /// # Errors
    ///
    /// Returns whatever error the task produced.
    pub fn call(&self, ctx: &mut ExecutorContext<P, R>) -> HookResult<R> {
        (self.0)(ctx)
    }
}

impl<P, R> Clone for Task<P, R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P, R> fmt::Debug for Task<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SyncPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// A plugin for synchronous executors.
///
/// Built with a consuming builder; every hook is optional.
pub struct SyncPlugin<P, R> {
    name: String,
    only_one: bool,
    enabled: Option<EnabledFn<P, R>>,
    on_before: Option<SyncHookFn<P, R>>,
    on_exec: Option<SyncExecHookFn<P, R>>,
    on_success: Option<SyncHookFn<P, R>>,
    on_error: Option<SyncErrorHookFn<P, R>>,
    hooks: HashMap<String, SyncHookFn<P, R>>,
    exec_hooks: HashMap<String, SyncExecHookFn<P, R>>,
}

impl<P, R> SyncPlugin<P, R> {
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
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<Option<R>> + Send + Sync + 'static,
    {
        self.on_before = Some(Arc::new(hook));
        self
    }

    /// Sets the `on_exec` hook.
    #[must_use]
    pub fn on_exec<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ExecutorContext<P, R>, Task<P, R>) -> HookResult<ExecOutcome<Task<P, R>, R>>
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
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<Option<R>> + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Sets the `on_error` hook.
    #[must_use]
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<Option<ExecutorError>>
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
        F: Fn(&mut ExecutorContext<P, R>) -> HookResult<Option<R>> + Send + Sync + 'static,
    {
        let name = name.into();
        let hook: SyncHookFn<P, R> = Arc::new(hook);
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
        F: Fn(&mut ExecutorContext<P, R>, Task<P, R>) -> HookResult<ExecOutcome<Task<P, R>, R>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let hook: SyncExecHookFn<P, R> = Arc::new(hook);
        if name == ON_EXEC {
            self.on_exec = Some(hook);
        } else {
            self.exec_hooks.insert(name, hook);
        }
        self
    }

    /// Looks up a before/success-style hook by name.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<&SyncHookFn<P, R>> {
        match name {
            ON_BEFORE => self.on_before.as_ref(),
            ON_SUCCESS => self.on_success.as_ref(),
            _ => self.hooks.get(name),
        }
    }

    /// Looks up an exec-style hook by name.
    #[must_use]
    pub fn exec_hook(&self, name: &str) -> Option<&SyncExecHookFn<P, R>> {
        if name == ON_EXEC {
            self.on_exec.as_ref()
        } else {
            self.exec_hooks.get(name)
        }
    }

    /// Returns the `on_error` hook.
    #[must_use]
    pub fn error_hook(&self) -> Option<&SyncErrorHookFn<P, R>> {
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

impl<P, R> NamedPlugin for SyncPlugin<P, R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn only_one(&self) -> bool {
        self.only_one
    }
}

impl<P, R> Clone for SyncPlugin<P, R> {
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

impl<P, R> fmt::Debug for SyncPlugin<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncPlugin")
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

#[cfg(test)]
mod tests {
    use super::*;

    type Plugin = SyncPlugin<(), i32>;

    #[test]
    fn new_plugin_has_no_hooks() {
        let plugin = Plugin::new("empty");
        assert_eq!(plugin.name(), "empty");
        assert!(plugin.only_one());
        assert!(plugin.hook(ON_BEFORE).is_none());
        assert!(plugin.exec_hook(ON_EXEC).is_none());
        assert!(plugin.error_hook().is_none());
    }

    #[test]
    fn on_hook_routes_fixed_names_to_fields() {
        let plugin = Plugin::new("p")
            .on_hook(ON_BEFORE, |_| Ok(Some(1)))
            .on_hook("custom", |_| Ok(Some(2)));

        let mut ctx = ExecutorContext::new(());
        let before = plugin.hook(ON_BEFORE).expect("on_before should be set");
        assert_eq!(before(&mut ctx).unwrap(), Some(1));

        let custom = plugin.hook("custom").expect("custom hook should be set");
        assert_eq!(custom(&mut ctx).unwrap(), Some(2));

        assert!(plugin.hook(ON_SUCCESS).is_none());
    }

    #[test]
    fn custom_exec_hook_lookup() {
        let plugin = Plugin::new("p").on_exec_hook("send", |_, _| Ok(ExecOutcome::Value(5)));

        assert!(plugin.exec_hook(ON_EXEC).is_none());
        assert!(plugin.exec_hook("send").is_some());
    }

    #[test]
    fn enabled_gate_sees_hook_name() {
        let plugin = Plugin::new("p").with_enabled(|hook, _| hook != ON_SUCCESS);
        let ctx = ExecutorContext::new(());

        assert!(plugin.is_enabled(ON_BEFORE, &ctx));
        assert!(!plugin.is_enabled(ON_SUCCESS, &ctx));
        assert!(Plugin::new("ungated").is_enabled(ON_SUCCESS, &ctx));
    }

    #[test]
    fn task_clone_shares_closure() {
        let task: Task<(), i32> = Task::new(|_| Ok(9));
        let copy = task.clone();
        let mut ctx = ExecutorContext::new(());
        assert_eq!(copy.call(&mut ctx).unwrap(), 9);
    }
}
