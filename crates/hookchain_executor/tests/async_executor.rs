//! Lifecycle tests for `AsyncExecutor`.
//!
//! Mirrors the sync suite where behavior is shared and adds checks that only
//! matter once hooks suspend: strict sequencing across awaits and panics
//! raised while a future is polled.

use core::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hookchain_executor::prelude::*;

type Plugin = AsyncPlugin<Vec<String>, String>;
type Executor = AsyncExecutor<Vec<String>, String>;

fn explode() -> HookResult<String> {
    panic!("task exploded")
}

fn previous(ctx: &ExecutorContext<Vec<String>, String>) -> String {
    ctx.hooks_runtimes().return_value().cloned().unwrap_or_default()
}

#[tokio::test]
async fn no_plugins_returns_task_value() {
    let executor = AsyncExecutor::<(), String>::new();
    let result = executor
        .exec_default(|_| Box::pin(async { Ok("x".to_string()) }))
        .await;
    assert_eq!(result.unwrap(), "x");
}

#[tokio::test]
async fn hooks_are_awaited_sequentially() {
    let mut executor = Executor::new();
    for (name, delay) in [("slow", 20), ("fast", 0)] {
        executor.use_plugin(Plugin::new(name).on_before(move |ctx| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                ctx.parameters_mut().push(name.to_string());
                Ok(None)
            })
        }));
    }

    let result = executor
        .exec(Vec::new(), |ctx| Box::pin(async move { Ok(ctx.parameters().join(",")) }))
        .await;
    assert_eq!(result.unwrap(), "slow,fast");
}

#[tokio::test]
async fn exec_values_chain_through_runtimes() {
    let mut executor = Executor::new();
    executor
        .use_plugin(Plugin::new("task1").on_exec(|_, _| {
            Box::pin(async { Ok(ExecOutcome::Value("task1".into())) })
        }))
        .use_plugin(Plugin::new("task2").on_exec(|ctx, _| {
            Box::pin(async move { Ok(ExecOutcome::Value(format!("{}task2", previous(ctx)))) })
        }));

    let result = executor
        .exec(Vec::new(), |_| Box::pin(async { Ok("task".to_string()) }))
        .await;
    assert_eq!(result.unwrap(), "task1task2");
}

#[tokio::test]
async fn wrappers_compose_outer_to_inner() {
    let mut executor = Executor::new();
    for name in ["inner", "outer"] {
        executor.use_plugin(Plugin::new(name).on_exec(move |_, previous: AsyncTask<Vec<String>, String>| {
            Box::pin(async move {
                Ok(ExecOutcome::Wrapper(AsyncTask::<Vec<String>, String>::new(move |ctx| {
                    let previous = previous.clone();
                    Box::pin(async move {
                        ctx.parameters_mut().push(format!("enter {name}"));
                        let value = previous.call(ctx).await?;
                        ctx.parameters_mut().push(format!("leave {name}"));
                        Ok(format!("{name}({value})"))
                    })
                })))
            })
        }));
    }

    let trace = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&trace);
    executor.use_plugin(Plugin::new("recorder").on_success(move |ctx| {
        let seen = Arc::clone(&seen);
        Box::pin(async move {
            seen.lock().unwrap().extend(ctx.parameters().iter().cloned());
            Ok(None)
        })
    }));

    let result = executor
        .exec(Vec::new(), |_| Box::pin(async { Ok("task".to_string()) }))
        .await;
    assert_eq!(result.unwrap(), "outer(inner(task))");
    assert_eq!(
        *trace.lock().unwrap(),
        ["enter outer", "enter inner", "leave inner", "leave outer"]
    );
}

#[tokio::test]
async fn wrapper_after_value_never_sees_dropped_wrapper() {
    let dropped_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&dropped_calls);
    let mut executor = Executor::new();
    executor
        .use_plugin(Plugin::new("dropped").on_exec(move |_, _| {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                Ok(ExecOutcome::Wrapper(AsyncTask::<Vec<String>, String>::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async { Ok("dropped".to_string()) })
                })))
            })
        }))
        .use_plugin(Plugin::new("value").on_exec(|_, _| {
            Box::pin(async { Ok(ExecOutcome::Value("value".into())) })
        }))
        .use_plugin(Plugin::new("outer").on_exec(|_, previous: AsyncTask<Vec<String>, String>| {
            Box::pin(async move {
                Ok(ExecOutcome::Wrapper(AsyncTask::<Vec<String>, String>::new(move |ctx| {
                    let previous = previous.clone();
                    Box::pin(async move { Ok(format!("outer({})", previous.call(ctx).await?)) })
                })))
            })
        }));

    let result = executor
        .exec(Vec::new(), |_| Box::pin(async { Ok("task".to_string()) }))
        .await;
    assert_eq!(result.unwrap(), "outer(task)");
    assert_eq!(dropped_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn success_transformations_compose() {
    let mut executor = Executor::new();
    for suffix in ["1", "2"] {
        executor.use_plugin(Plugin::new(suffix).on_success(move |ctx| {
            Box::pin(async move {
                let value = format!("{}{suffix}", ctx.return_value().cloned().unwrap_or_default());
                ctx.set_return_value(value);
                Ok(None)
            })
        }));
    }

    let result = executor
        .exec(Vec::new(), |_| Box::pin(async { Ok("task".to_string()) }))
        .await;
    assert_eq!(result.unwrap(), "task12");
}

#[tokio::test]
async fn rejected_task_is_wrapped_as_async_error() {
    let executor = Executor::new();
    let error = executor
        .exec(Vec::new(), |_| Box::pin(async { Err("rejected".into()) }))
        .await
        .unwrap_err();
    assert_eq!(error.message(), "rejected");
    assert!(error.has_id(ids::UNKNOWN_ASYNC_ERROR));
}

#[tokio::test]
async fn exec_hook_error_with_passive_error_hook() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut executor = Executor::new();
    executor
        .use_plugin(Plugin::new("boom").on_exec(|_, _| Box::pin(async { Err("boom".into()) })))
        .use_plugin(Plugin::new("observer").on_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(None) })
        }));

    let error = executor
        .exec(Vec::new(), |_| Box::pin(async { Ok("task".to_string()) }))
        .await
        .unwrap_err();
    assert_eq!(error.message(), "boom");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn error_hook_replacement_and_rethrow() {
    let mut executor = Executor::new();
    executor
        .use_plugin(Plugin::new("replace").on_error(|_| {
            Box::pin(async { Ok(Some(ExecutorError::new("HANDLED", "handled"))) })
        }))
        .use_plugin(Plugin::new("rethrow").on_error(|ctx| {
            Box::pin(async move {
                let current = ctx.error().map(ExecutorError::message).unwrap_or_default();
                Err(ExecutorError::new("RETHROWN", format!("rethrown: {current}")))
            })
        }));

    let error = executor
        .exec(Vec::new(), |_| Box::pin(async { Err("raw".into()) }))
        .await
        .unwrap_err();
    assert!(error.has_id("RETHROWN"));
    assert_eq!(error.message(), "rethrown: handled");
}

#[tokio::test]
async fn exec_no_error_catches_panic_in_future() {
    let executor = Executor::new();
    let error = executor
        .exec_no_error(Vec::new(), |_| {
            Box::pin(async {
                tokio::task::yield_now().await;
                explode()
            })
        })
        .await
        .unwrap_err();
    assert!(error.has_id(ids::PANIC));
    assert_eq!(error.message(), "task exploded");
}

#[tokio::test]
async fn exec_no_error_returns_unhandled_error() {
    let executor = Executor::new();
    let error = executor
        .exec_no_error(Vec::new(), |_| Box::pin(async { Err("e".into()) }))
        .await
        .unwrap_err();
    assert_eq!(error.message(), "e");
}

#[tokio::test]
async fn concurrent_exec_calls_are_independent() {
    let mut executor = Executor::new();
    executor.use_plugin(Plugin::new("tag").on_before(|ctx| {
        Box::pin(async move {
            tokio::task::yield_now().await;
            ctx.parameters_mut().push("tagged".into());
            Ok(None)
        })
    }));

    let calls = (0..4).map(|i| {
        executor.exec(vec![i.to_string()], |ctx| {
            Box::pin(async move { Ok(ctx.parameters().join("-")) })
        })
    });
    let results = futures::future::join_all(calls).await;

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), format!("{i}-tagged"));
    }
}
