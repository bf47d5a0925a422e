//! Phase hook-name configuration.
//!
//! By default the before phase runs `on_before`, the exec phase runs
//! `on_exec`, and the success phase runs `on_success`. [`ExecutorConfig`]
//! renames or extends these, so one phase can traverse several differently
//! named steps in order (for example `build_url`, `inject_headers`,
//! `serialize_body` as a single before phase).
//!
//! The error phase always runs [`ON_ERROR`].

use serde::{Deserialize, Serialize};

/// Default before-phase hook name.
pub const ON_BEFORE: &str = "on_before";

/// Default exec-phase hook name.
pub const ON_EXEC: &str = "on_exec";

/// Default success-phase hook name.
pub const ON_SUCCESS: &str = "on_success";

/// Error-phase hook name.
pub const ON_ERROR: &str = "on_error";

/// Hook names used for each configurable phase.
///
/// Deserializes from partial documents; missing fields take their defaults.
///
/// # Example
///
/// ```
/// use hookchain_executor::config::ExecutorConfig;
///
/// let config = ExecutorConfig::new()
///     .with_before_hooks(["build_url", "inject_headers"])
///     .with_exec_hook("send");
///
/// assert_eq!(config.before_hooks, vec!["build_url", "inject_headers"]);
/// assert_eq!(config.after_hooks, vec!["on_success"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Hook names run, in order, during the before phase.
    pub before_hooks: Vec<String>,
    /// Hook names run, in order, during the success phase.
    pub after_hooks: Vec<String>,
    /// Hook name run during the exec phase.
    pub exec_hook: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            before_hooks: vec![ON_BEFORE.to_owned()],
            after_hooks: vec![ON_SUCCESS.to_owned()],
            exec_hook: ON_EXEC.to_owned(),
        }
    }
}

impl ExecutorConfig {
    /// Creates a configuration with the default hook names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the before-phase hook names.
    #[must_use]
    pub fn with_before_hooks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before_hooks = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the success-phase hook names.
    #[must_use]
    pub fn with_after_hooks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after_hooks = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the exec-phase hook name.
    #[must_use]
    pub fn with_exec_hook(mut self, name: impl Into<String>) -> Self {
        self.exec_hook = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hook_names() {
        let config = ExecutorConfig::default();
        assert_eq!(config.before_hooks, vec![ON_BEFORE]);
        assert_eq!(config.after_hooks, vec![ON_SUCCESS]);
        assert_eq!(config.exec_hook, ON_EXEC);
    }

    #[test]
    fn builder_replaces_lists() {
        let config = ExecutorConfig::new()
            .with_before_hooks(["a", "b"])
            .with_after_hooks(Vec::<String>::new())
            .with_exec_hook("run");

        assert_eq!(config.before_hooks, vec!["a", "b"]);
        assert!(config.after_hooks.is_empty());
        assert_eq!(config.exec_hook, "run");
    }

    #[test]
    fn deserializes_partial_document() {
        let config: ExecutorConfig =
            serde_json::from_str(r#"{ "before_hooks": ["build_url", "inject_headers"] }"#)
                .expect("config should deserialize");

        assert_eq!(config.before_hooks, vec!["build_url", "inject_headers"]);
        assert_eq!(config.after_hooks, vec![ON_SUCCESS]);
        assert_eq!(config.exec_hook, ON_EXEC);
    }
}
