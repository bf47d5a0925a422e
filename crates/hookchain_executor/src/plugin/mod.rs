//! Plugin contract and registration.
//!
//! A plugin is a named bundle of optional lifecycle hooks. Executors hold an
//! ordered list of plugins and, for every phase, invoke each plugin's hook of
//! the phase's name in registration order.
//!
//! # Hooks
//!
//! | Hook | Signature | Phase |
//! |------|-----------|-------|
//! | `on_before` (or custom) | `ctx -> Option<R>` | before |
//! | `on_exec` (or custom) | `(ctx, executable) -> ExecOutcome` | exec |
//! | `on_success` (or custom) | `ctx -> Option<R>` | success |
//! | `on_error` | `ctx -> Option<ExecutorError>` | error |
//!
//! The fixed hooks live in dedicated fields; custom-named hooks live in a side
//! map and are looked up by name when a phase runs.
//!
//! # Uniqueness
//!
//! Plugins are unique by name unless both the registered plugin and the new
//! one opt out via `with_only_one(false)`. Registering a duplicate is a no-op;
//! the first registration is kept.
//!
//! # Gating
//!
//! An optional `enabled(hook_name, ctx)` predicate is consulted right before
//! each invocation. Returning `false` skips that hook for that call only.

pub mod asynchronous;
pub mod sync;

use std::sync::Arc;

use crate::context::ExecutorContext;

/// Per-invocation gate shared by sync and async plugins.
pub type EnabledFn<P, R> = Arc<dyn Fn(&str, &ExecutorContext<P, R>) -> bool + Send + Sync>;

/// Identity shared by all plugin kinds, used for registration.
pub trait NamedPlugin {
    /// Returns the plugin's name.
    fn name(&self) -> &str;

    /// Returns `true` if no other plugin with the same name may be registered.
    ///
    /// Default is `true`.
    fn only_one(&self) -> bool {
        true
    }
}

/// Appends `plugin` to `plugins` unless it collides with a registered plugin.
///
/// A collision is a plugin with the same name where either side is
/// [`only_one`](NamedPlugin::only_one). Returns `true` if the plugin was added.
pub fn register<T: NamedPlugin>(plugins: &mut Vec<T>, plugin: T) -> bool {
    let duplicate = plugins
        .iter()
        .any(|existing| existing.name() == plugin.name() && (existing.only_one() || plugin.only_one()));

    if duplicate {
        tracing::debug!(plugin = plugin.name(), "plugin already registered, keeping the first one");
        return false;
    }

    plugins.push(plugin);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: &'static str,
        only_one: bool,
        tag: u8,
    }

    impl NamedPlugin for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn only_one(&self) -> bool {
            self.only_one
        }
    }

    fn named(name: &'static str, only_one: bool, tag: u8) -> Named {
        Named { name, only_one, tag }
    }

    #[test]
    fn unique_duplicate_is_ignored() {
        let mut plugins = Vec::new();
        assert!(register(&mut plugins, named("a", true, 1)));
        assert!(!register(&mut plugins, named("a", true, 2)));

        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].tag, 1, "first registration wins");
    }

    #[test]
    fn either_side_only_one_blocks_duplicate() {
        let mut plugins = Vec::new();
        register(&mut plugins, named("a", false, 1));
        assert!(!register(&mut plugins, named("a", true, 2)));

        let mut plugins = Vec::new();
        register(&mut plugins, named("a", true, 1));
        assert!(!register(&mut plugins, named("a", false, 2)));
    }

    #[test]
    fn non_unique_plugins_append() {
        let mut plugins = Vec::new();
        register(&mut plugins, named("a", false, 1));
        register(&mut plugins, named("a", false, 2));
        register(&mut plugins, named("b", true, 3));

        let tags: Vec<u8> = plugins.iter().map(|p| p.tag).collect();
        assert_eq!(tags, vec![1, 2, 3]);
    }
}
