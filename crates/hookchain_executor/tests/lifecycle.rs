//! Tests for `LifecycleExecutor`: multi-step phases and per-call configuration.

use hookchain_executor::prelude::*;

#[derive(Debug, Default)]
struct Request {
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

type Plugin = AsyncPlugin<Request, String>;

fn request_executor() -> LifecycleExecutor<Request, String> {
    let mut executor = LifecycleExecutor::new();
    executor
        .set_before_hooks(["build_url", "inject_headers", "serialize_body"])
        .use_plugin(Plugin::new("url").on_hook("build_url", |ctx| {
            Box::pin(async move {
                ctx.parameters_mut().url = "https://api.test/items".into();
                Ok(None)
            })
        }))
        .use_plugin(
            Plugin::new("auth")
                .on_hook("inject_headers", |ctx| {
                    Box::pin(async move {
                        ctx.parameters_mut()
                            .headers
                            .push(("authorization".into(), "token".into()));
                        Ok(None)
                    })
                })
                .on_hook("build_url", |ctx| {
                    Box::pin(async move {
                        ctx.parameters_mut().url.push_str("?auth=1");
                        Ok(None)
                    })
                }),
        )
        .use_plugin(Plugin::new("json").on_hook("serialize_body", |ctx| {
            Box::pin(async move {
                let headers = ctx.parameters().headers.len();
                ctx.parameters_mut().body = Some(format!("{{\"headers\":{headers}}}"));
                Ok(None)
            })
        }));
    executor
}

fn describe(ctx: &ExecutorContext<Request, String>) -> String {
    let request = ctx.parameters();
    format!(
        "{} {} {}",
        request.url,
        request.headers.len(),
        request.body.as_deref().unwrap_or("-")
    )
}

#[tokio::test]
async fn custom_before_steps_form_one_phase() {
    let executor = request_executor();

    let result = executor
        .exec(Request::default(), |ctx| Box::pin(async move { Ok(describe(ctx)) }))
        .await;
    assert_eq!(
        result.unwrap(),
        "https://api.test/items?auth=1 1 {\"headers\":1}"
    );
}

#[tokio::test]
async fn failing_step_skips_later_steps() {
    let mut executor = request_executor();
    executor.use_plugin(Plugin::new("reject").on_hook("inject_headers", |_| {
        Box::pin(async { Err(ExecutorError::new("UNAUTHORIZED", "missing credentials")) })
    }));

    let error = executor
        .exec(Request::default(), |_| Box::pin(async { Ok(String::new()) }))
        .await
        .unwrap_err();
    assert_eq!(error.message(), "missing credentials");
    assert!(error.has_id(ids::UNKNOWN_ASYNC_ERROR));
}

#[tokio::test]
async fn custom_exec_and_after_hooks() {
    let mut executor = LifecycleExecutor::<Request, String>::new();
    executor
        .set_exec_hook("send")
        .set_after_hooks(["decode"])
        .push_after_hook("validate")
        .use_plugin(
            Plugin::new("transport")
                .on_exec_hook("send", |_, _| {
                    Box::pin(async { Ok(ExecOutcome::Value("raw".to_string())) })
                })
                .on_hook("decode", |ctx| {
                    Box::pin(async move {
                        let decoded = format!("decoded({})", ctx.return_value().cloned().unwrap_or_default());
                        ctx.set_return_value(decoded);
                        Ok(None)
                    })
                })
                .on_hook("validate", |ctx| {
                    Box::pin(async move {
                        let valid = ctx.return_value().is_some_and(|v| v.starts_with("decoded"));
                        if valid {
                            Ok(None)
                        } else {
                            Err("invalid response".into())
                        }
                    })
                }),
        );

    let result = executor
        .exec(Request::default(), |_| Box::pin(async { Ok("unsent".to_string()) }))
        .await;
    assert_eq!(result.unwrap(), "decoded(raw)");
}

#[tokio::test]
async fn exec_with_leaves_stored_config_untouched() {
    let executor = request_executor();
    let ad_hoc = ExecutorConfig::new().with_before_hooks(["build_url"]);

    let result = executor
        .exec_with(&ad_hoc, Request::default(), |ctx| {
            Box::pin(async move { Ok(describe(ctx)) })
        })
        .await;
    assert_eq!(result.unwrap(), "https://api.test/items?auth=1 0 -");
    assert_eq!(executor.config().before_hooks.len(), 3);
}

#[tokio::test]
async fn duplicate_step_plugin_is_ignored() {
    let mut executor = request_executor();
    executor.use_plugin(Plugin::new("url").on_hook("build_url", |_| {
        Box::pin(async { Err("duplicate plugin must not run".into()) })
    }));

    assert_eq!(executor.plugins().len(), 3);
    let result = executor
        .exec_no_error(Request::default(), |ctx| Box::pin(async move { Ok(describe(ctx)) }))
        .await;
    assert!(result.is_ok());
}
