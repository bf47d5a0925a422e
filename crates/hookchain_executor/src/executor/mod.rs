//! Executors that run a task through the hook lifecycle.
//!
//! Every `exec` call walks the same state machine:
//!
//! ```text
//! Before ──▶ Exec ──▶ Success ──▶ Done
//!    │         │         │
//!    └─────────┴─────────┴──▶ Error ──▶ Done (Err)
//! ```
//!
//! No state is re-entered. The sync and async executors share the chain
//! bookkeeping in this module and differ only in whether hooks are awaited.

pub mod asynchronous;
pub mod lifecycle;
pub mod sync;

use core::ops::ControlFlow;

use crate::context::ExecutorContext;
use crate::error::{ExecutorError, HookResult, ids};
use crate::outcome::ExecOutcome;

/// Records a lifecycle hook's product and decides whether the phase continues.
pub(crate) fn after_hook<P, R>(ctx: &mut ExecutorContext<P, R>, produced: Option<R>) -> ControlFlow<()> {
    let runtimes = ctx.hooks_runtimes_mut();
    let produced_value = produced.is_some();
    if let Some(value) = produced {
        runtimes.record(value);
    }

    if runtimes.breaks_chain() || (produced_value && runtimes.returns_break_chain()) {
        tracing::debug!(
            plugin = runtimes.plugin_name(),
            hook = runtimes.hook_name(),
            "hook chain broken"
        );
        return ControlFlow::Break(());
    }
    ControlFlow::Continue(())
}

/// What the exec phase settled on once every exec hook ran.
pub(crate) enum Settled<T, R> {
    /// Invoke this executable to obtain the result.
    Call(T),
    /// The result is already known.
    Value(R),
}

/// Accumulates exec-hook outcomes.
///
/// Starts with the caller's task as a pending executable. A `Value` outcome
/// replaces the pending executable with a concrete result (kept in the phase's
/// `return_value` slot, so later hooks can read it) and drops every wrapper
/// installed so far; a `Wrapper` outcome installs a new pending executable.
pub(crate) struct ExecChain<T> {
    task: T,
    executable: T,
    pending: bool,
}

impl<T: Clone> ExecChain<T> {
    pub(crate) fn new(task: T) -> Self {
        Self {
            executable: task.clone(),
            task,
            pending: true,
        }
    }

    /// The executable handed to the next exec hook.
    ///
    /// After a `Value` this is the caller's task again, never a dropped wrapper.
    pub(crate) fn executable(&self) -> T {
        self.executable.clone()
    }

    pub(crate) fn apply<P, R>(
        &mut self,
        ctx: &mut ExecutorContext<P, R>,
        outcome: ExecOutcome<T, R>,
    ) -> ControlFlow<()> {
        let produced = match outcome {
            ExecOutcome::Unchanged => None,
            ExecOutcome::Value(value) => {
                self.executable = self.task.clone();
                self.pending = false;
                Some(value)
            }
            ExecOutcome::Wrapper(executable) => {
                self.executable = executable;
                self.pending = true;
                None
            }
        };
        after_hook(ctx, produced)
    }

    pub(crate) fn settle<P, R>(self, ctx: &mut ExecutorContext<P, R>) -> HookResult<Settled<T, R>> {
        if self.pending {
            return Ok(Settled::Call(self.executable));
        }
        ctx.hooks_runtimes_mut()
            .take_return_value()
            .map(Settled::Value)
            .ok_or_else(|| ExecutorError::new(ids::MISSING_RETURN_VALUE, "exec hook value was lost"))
    }
}

/// Tracks the error phase.
pub(crate) struct ErrorChain {
    unknown_id: &'static str,
    replaced: bool,
}

impl ErrorChain {
    pub(crate) fn new(unknown_id: &'static str) -> Self {
        Self {
            unknown_id,
            replaced: false,
        }
    }

    /// Applies one error hook's result.
    ///
    /// Breaks with the error to surface when the hook threw or set a chain-break flag.
    pub(crate) fn apply<P, R>(
        &mut self,
        ctx: &mut ExecutorContext<P, R>,
        result: HookResult<Option<ExecutorError>>,
    ) -> ControlFlow<Option<ExecutorError>> {
        match result {
            Ok(Some(replacement)) => {
                ctx.set_error(replacement);
                self.replaced = true;
            }
            Ok(None) => {}
            Err(thrown) => return ControlFlow::Break(Some(thrown)),
        }

        let runtimes = ctx.hooks_runtimes();
        if runtimes.breaks_chain() || runtimes.returns_break_chain() {
            tracing::debug!(plugin = runtimes.plugin_name(), "error chain broken");
            return ControlFlow::Break(None);
        }
        ControlFlow::Continue(())
    }

    /// Produces the error surfaced to the caller.
    ///
    /// A replacement returned by a hook is surfaced as-is; otherwise the
    /// original error is wrapped under the executor's unknown-error id.
    pub(crate) fn finish<P, R>(self, ctx: &mut ExecutorContext<P, R>) -> ExecutorError {
        match ctx.take_error() {
            Some(error) if self.replaced => error,
            Some(error) => {
                tracing::debug!(error = %error, id = self.unknown_id, "wrapping unhandled error");
                ExecutorError::wrap(self.unknown_id, error)
            }
            None => ExecutorError::new(self.unknown_id, "error phase entered without an error"),
        }
    }
}

/// Takes the lifecycle's final value out of the context.
pub(crate) fn take_result<P, R>(ctx: &mut ExecutorContext<P, R>) -> HookResult<R> {
    ctx.take_return_value()
        .ok_or_else(|| ExecutorError::new(ids::MISSING_RETURN_VALUE, "lifecycle produced no return value"))
}
