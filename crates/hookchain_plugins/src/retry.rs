//! Retry plugin.
//!
//! Provides [`RetryPlugin`], which re-runs a failing task from the exec phase.
//! Retries happen inside a wrapper installed by `on_exec`, so every attempt
//! sees the same context and the before phase is not repeated. Only the last
//! error reaches the error phase.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use hookchain_executor::AsyncExecutor;
//! use hookchain_plugins::RetryPlugin;
//!
//! let mut executor = AsyncExecutor::<(), String>::new();
//! executor.use_plugin(
//!     RetryPlugin::new()
//!         .with_max_retries(2)
//!         .with_retry_delay(Duration::from_millis(50))
//!         .with_exponential_backoff(true)
//!         .into_async_plugin(),
//! );
//! ```

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use hookchain_executor::error::ExecutorError;
use hookchain_executor::outcome::ExecOutcome;
use hookchain_executor::plugin::asynchronous::{AsyncPlugin, AsyncTask};
use hookchain_executor::plugin::sync::{SyncPlugin, Task};

/// Upper bound for [`RetryPlugin::with_max_retries`].
pub const MAX_RETRIES_CAP: u32 = 16;

/// Predicate deciding whether an error is worth another attempt.
pub type ShouldRetryFn = Arc<dyn Fn(&ExecutorError) -> bool + Send + Sync>;

/// Re-runs a failing task with optional exponential backoff.
///
/// | Setting | Default |
/// |---------|---------|
/// | `max_retries` | 3 |
/// | `retry_delay` | 100 ms |
/// | `use_exponential_backoff` | `false` |
/// | `should_retry` | every error |
///
/// Total attempts are `max_retries + 1`.
#[derive(Clone)]
pub struct RetryPlugin {
    max_retries: u32,
    retry_delay: Duration,
    use_exponential_backoff: bool,
    should_retry: Option<ShouldRetryFn>,
}

impl Default for RetryPlugin {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(100),
            use_exponential_backoff: false,
            should_retry: None,
        }
    }
}

impl fmt::Debug for RetryPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPlugin")
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("use_exponential_backoff", &self.use_exponential_backoff)
            .field("should_retry", &self.should_retry.is_some())
            .finish()
    }
}

impl RetryPlugin {
    /// Name under which the plugin registers.
    pub const NAME: &'static str = "retry";

    /// Creates a `RetryPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many times a failed task is re-run, capped at [`MAX_RETRIES_CAP`].
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.min(MAX_RETRIES_CAP);
        self
    }

    /// Sets the base delay between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Doubles the delay after every retry when enabled.
    #[must_use]
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.use_exponential_backoff = enabled;
        self
    }

    /// Restricts retries to errors accepted by `predicate`.
    #[must_use]
    pub fn with_should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ExecutorError) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Arc::new(predicate));
        self
    }

    /// Returns the configured retry count.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.use_exponential_backoff {
            self.retry_delay.saturating_mul(2_u32.saturating_pow(attempt))
        } else {
            self.retry_delay
        }
    }

    /// Returns `true` if `error` may be retried.
    #[must_use]
    pub fn should_retry(&self, error: &ExecutorError) -> bool {
        self.should_retry
            .as_ref()
            .is_none_or(|predicate| predicate(error))
    }

    /// Decides what follows failed attempt `attempt`: the delay before the
    /// next one, or `None` to give up.
    fn next_delay(&self, attempt: u32, error: &ExecutorError) -> Option<Duration> {
        if attempt >= self.max_retries || !self.should_retry(error) {
            tracing::debug!(attempt, error = %error, "giving up");
            return None;
        }

        let delay = self.delay_for(attempt);
        tracing::debug!(
            retry = attempt + 1,
            max_retries = self.max_retries,
            ?delay,
            error = %error,
            "retrying task"
        );
        Some(delay)
    }

    /// Builds the plugin for an [`AsyncExecutor`](hookchain_executor::AsyncExecutor).
    ///
    /// Waits between attempts with `tokio::time::sleep`.
    #[must_use]
    pub fn into_async_plugin<P, R>(self) -> AsyncPlugin<P, R>
    where
        P: Send + 'static,
        R: Send + 'static,
    {
        let policy = Arc::new(self);
        AsyncPlugin::new(Self::NAME).on_exec(move |_ctx, previous: AsyncTask<P, R>| {
            let policy = Arc::clone(&policy);
            Box::pin(async move {
                let task = AsyncTask::new(move |ctx| {
                    let previous = previous.clone();
                    let policy = Arc::clone(&policy);
                    Box::pin(async move {
                        let mut attempt = 0;
                        loop {
                            match previous.call(&mut *ctx).await {
                                Ok(value) => return Ok(value),
                                Err(error) => match policy.next_delay(attempt, &error) {
                                    Some(delay) => tokio::time::sleep(delay).await,
                                    None => return Err(error),
                                },
                            }
                            attempt += 1;
                        }
                    })
                });
                Ok(ExecOutcome::Wrapper(task))
            })
        })
    }

    /// Builds the plugin for a [`SyncExecutor`](hookchain_executor::SyncExecutor).
    ///
    /// Blocks the calling thread between attempts.
    #[must_use]
    pub fn into_sync_plugin<P, R>(self) -> SyncPlugin<P, R>
    where
        P: 'static,
        R: 'static,
    {
        let policy = Arc::new(self);
        SyncPlugin::new(Self::NAME).on_exec(move |_ctx, previous: Task<P, R>| {
            let policy = Arc::clone(&policy);
            Ok(ExecOutcome::Wrapper(Task::new(move |ctx| {
                let mut attempt = 0;
                loop {
                    match previous.call(ctx) {
                        Ok(value) => return Ok(value),
                        Err(error) => match policy.next_delay(attempt, &error) {
                            Some(delay) => std::thread::sleep(delay),
                            None => return Err(error),
                        },
                    }
                    attempt += 1;
                }
            })))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookchain_executor::NamedPlugin;

    #[test]
    fn retry_plugin_defaults() {
        let plugin = RetryPlugin::default();
        assert_eq!(plugin.max_retries(), 3);
        assert_eq!(plugin.delay_for(0), Duration::from_millis(100));
        assert!(plugin.should_retry(&ExecutorError::msg("any")));
    }

    #[test]
    fn max_retries_is_capped() {
        let plugin = RetryPlugin::new().with_max_retries(1_000);
        assert_eq!(plugin.max_retries(), MAX_RETRIES_CAP);
    }

    #[test]
    fn fixed_delay_ignores_attempt() {
        let plugin = RetryPlugin::new().with_retry_delay(Duration::from_millis(10));
        assert_eq!(plugin.delay_for(0), Duration::from_millis(10));
        assert_eq!(plugin.delay_for(5), Duration::from_millis(10));
    }

    #[test]
    fn exponential_delay_doubles() {
        let plugin = RetryPlugin::new()
            .with_retry_delay(Duration::from_millis(10))
            .with_exponential_backoff(true);
        assert_eq!(plugin.delay_for(0), Duration::from_millis(10));
        assert_eq!(plugin.delay_for(1), Duration::from_millis(20));
        assert_eq!(plugin.delay_for(3), Duration::from_millis(80));
    }

    #[test]
    fn should_retry_predicate_filters_errors() {
        let plugin = RetryPlugin::new().with_should_retry(|error| error.has_id("TRANSIENT"));
        assert!(plugin.should_retry(&ExecutorError::new("TRANSIENT", "try again")));
        assert!(!plugin.should_retry(&ExecutorError::new("FATAL", "stop")));
    }

    #[test]
    fn next_delay_gives_up_after_max_retries() {
        let plugin = RetryPlugin::new().with_max_retries(1);
        let error = ExecutorError::msg("e");
        assert!(plugin.next_delay(0, &error).is_some());
        assert!(plugin.next_delay(1, &error).is_none());
    }

    #[test]
    fn saturated_backoff_delay_is_kept_whole() {
        let plugin = RetryPlugin::new()
            .with_max_retries(MAX_RETRIES_CAP)
            .with_retry_delay(Duration::MAX)
            .with_exponential_backoff(true);
        let error = ExecutorError::msg("e");
        assert_eq!(plugin.next_delay(3, &error), Some(Duration::MAX));
    }

    #[test]
    fn plugins_are_named_retry() {
        let sync: SyncPlugin<(), ()> = RetryPlugin::new().into_sync_plugin();
        let asynchronous: AsyncPlugin<(), ()> = RetryPlugin::new().into_async_plugin();
        assert_eq!(sync.name(), RetryPlugin::NAME);
        assert_eq!(asynchronous.name(), RetryPlugin::NAME);
    }
}
