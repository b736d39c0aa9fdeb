use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::converter::CurrencyConverter;
use crate::core::conversion::ConversionResult;
use crate::core::currency::{RateProvider, RateSnapshot};

pub struct AppState<P: RateProvider> {
    pub converter: CurrencyConverter<P>,
}

type QueryPairs = Query<Vec<(String, String)>>;

/// First non-empty value for `key`, or `default`.
fn query_param<'a>(pairs: &'a [(String, String)], key: &str, default: &'a str) -> &'a str {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map_or(default, |(_, v)| v.as_str())
}

pub fn app_router<P: RateProvider + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/api/rates", get(get_rates::<P>).options(preflight))
        .route("/api/convert", get(convert::<P>).options(preflight))
        .fallback(fallback)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("X-Requested-With, Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn get_rates<P: RateProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): QueryPairs,
) -> Json<RateSnapshot> {
    let base = query_param(&params, "base", "USD");
    Json(state.converter.get_exchange_rates(base).await)
}

async fn convert<P: RateProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): QueryPairs,
) -> Json<ConversionResult> {
    let amount = query_param(&params, "amount", "1");
    let from = query_param(&params, "from", "USD");
    let to = query_param(&params, "to", "EUR");
    Json(state.converter.convert(amount, from, to).await)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response()
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<P, F>(
    listener: TcpListener,
    state: Arc<AppState<P>>,
    shutdown: F,
) -> Result<()>
where
    P: RateProvider + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        listen = %addr,
        "Starting currency converter server on port {}",
        addr.port()
    );

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Stopping server...");
    Ok(())
}

pub async fn serve<P: RateProvider + 'static>(
    addr: SocketAddr,
    state: Arc<AppState<P>>,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
