//! Checker HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, observability, and the check router, then starts the
//! main API server and the metrics endpoint.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
mod api;
mod app;
mod auth;
mod config;
mod observability;

use app::{AppState, build_router};
use auth::CheckerAuth;
use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::CheckerConfig::from_env_or_yaml().expect("checker config");
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::CheckerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let state = build_state(&config);
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, policy = config.unknown_key_policy.as_str(), "checker listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

fn build_state(config: &config::CheckerConfig) -> AppState {
    AppState {
        api_version: "v1".to_string(),
        auth: CheckerAuth::new(config.key_base_url.clone(), config.clock_skew_secs),
        unknown_key_policy: config.unknown_key_policy,
    }
}
