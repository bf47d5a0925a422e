//! Per-call execution state.
//!
//! An [`ExecutorContext`] is created fresh for every `exec` call and threaded
//! by `&mut` reference through every hook and the task. It is the only shared
//! mutable state of a call and is dropped once the call returns.
//!
//! # Parameters are shared by reference
//!
//! Before-phase hooks receive the same context the task later receives. A
//! hook that mutates [`parameters_mut`](ExecutorContext::parameters_mut) is
//! therefore observed by every later hook and by the task itself.
//!
//! # Phase scratch state
//!
//! [`HookRuntimes`] is reset at the start of every hook run. It carries the
//! previous hook's return value and the chain-break flags, so nothing set in
//! one phase leaks into the next.

use crate::error::ExecutorError;

// ─────────────────────────────────────────────────────────────────────────────
// HookRuntimes
// ─────────────────────────────────────────────────────────────────────────────

/// Scratch state private to the currently running phase.
#[derive(Debug)]
pub struct HookRuntimes<R> {
    /// Name of the plugin whose hook is running.
    plugin_name: Option<String>,
    /// Name of the hook that is running.
    hook_name: Option<String>,
    /// Value produced by the last hook that returned one.
    return_value: Option<R>,
    /// Number of hooks invoked so far in this phase.
    times: usize,
    /// Stop the phase after the current hook.
    break_chain: bool,
    /// Stop the phase once a hook produces a value.
    return_break_chain: bool,
}

impl<R> Default for HookRuntimes<R> {
    fn default() -> Self {
        Self {
            plugin_name: None,
            hook_name: None,
            return_value: None,
            times: 0,
            break_chain: false,
            return_break_chain: false,
        }
    }
}

impl<R> HookRuntimes<R> {
    /// Returns the name of the plugin whose hook is currently running.
    #[must_use]
    pub fn plugin_name(&self) -> Option<&str> {
        self.plugin_name.as_deref()
    }

    /// Returns the name of the hook currently running.
    #[must_use]
    pub fn hook_name(&self) -> Option<&str> {
        self.hook_name.as_deref()
    }

    /// Returns the value produced by the most recent hook that returned one.
    #[must_use]
    pub fn return_value(&self) -> Option<&R> {
        self.return_value.as_ref()
    }

    /// Returns how many hooks have been invoked in this phase, including the current one.
    #[must_use]
    pub fn times(&self) -> usize {
        self.times
    }

    /// Requests that the phase stop after the current hook.
    pub fn set_break_chain(&mut self, value: bool) {
        self.break_chain = value;
    }

    /// Returns `true` if the phase will stop after the current hook.
    #[must_use]
    pub fn breaks_chain(&self) -> bool {
        self.break_chain
    }

    /// Requests that the phase stop as soon as a hook produces a value.
    ///
    /// In the error phase the chain stops after the current hook whether or
    /// not it returned a replacement error.
    pub fn set_return_break_chain(&mut self, value: bool) {
        self.return_break_chain = value;
    }

    /// Returns `true` if the phase stops once a hook produces a value.
    #[must_use]
    pub fn returns_break_chain(&self) -> bool {
        self.return_break_chain
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn enter(&mut self, plugin_name: &str, hook_name: &str) {
        self.plugin_name = Some(plugin_name.to_owned());
        self.hook_name = Some(hook_name.to_owned());
        self.times += 1;
    }

    pub(crate) fn record(&mut self, value: R) {
        self.return_value = Some(value);
    }

    pub(crate) fn take_return_value(&mut self) -> Option<R> {
        self.return_value.take()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExecutorContext
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable record threaded through one `exec` call.
///
/// # Type Parameters
///
/// * `P` - Caller-supplied parameters
/// * `R` - Value produced by the task
#[derive(Debug)]
pub struct ExecutorContext<P, R> {
    parameters: P,
    return_value: Option<R>,
    error: Option<ExecutorError>,
    hooks_runtimes: HookRuntimes<R>,
}

impl<P, R> ExecutorContext<P, R> {
    /// Creates a fresh context around the given parameters.
    #[must_use]
    pub fn new(parameters: P) -> Self {
        Self {
            parameters,
            return_value: None,
            error: None,
            hooks_runtimes: HookRuntimes::default(),
        }
    }

    /// Returns the call parameters.
    #[must_use]
    pub fn parameters(&self) -> &P {
        &self.parameters
    }

    /// Returns the call parameters for in-place mutation.
    pub fn parameters_mut(&mut self) -> &mut P {
        &mut self.parameters
    }

    /// Returns the task's result once the exec phase has produced one.
    #[must_use]
    pub fn return_value(&self) -> Option<&R> {
        self.return_value.as_ref()
    }

    /// Replaces the call's result. Success hooks use this to transform it.
    pub fn set_return_value(&mut self, value: R) {
        self.return_value = Some(value);
    }

    /// Returns the error being handled by the error phase.
    #[must_use]
    pub fn error(&self) -> Option<&ExecutorError> {
        self.error.as_ref()
    }

    /// Returns the current phase's scratch state.
    #[must_use]
    pub fn hooks_runtimes(&self) -> &HookRuntimes<R> {
        &self.hooks_runtimes
    }

    /// Returns the current phase's scratch state for setting chain-break flags.
    pub fn hooks_runtimes_mut(&mut self) -> &mut HookRuntimes<R> {
        &mut self.hooks_runtimes
    }

    pub(crate) fn take_return_value(&mut self) -> Option<R> {
        self.return_value.take()
    }

    pub(crate) fn set_error(&mut self, error: ExecutorError) {
        self.error = Some(error);
    }

    pub(crate) fn take_error(&mut self) -> Option<ExecutorError> {
        self.error.take()
    }
}
