//! CORS relay for the upstream earthquake feeds.
//!
//! Browsers cannot call the Wolfx and USGS APIs directly because neither
//! sends permissive CORS headers. This binary exposes the two feeds under
//! `/api/wolfx` and `/api/usgs`, forwards each request upstream with a
//! per-feed timeout, and relays the JSON body back with `*` CORS headers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use quakewatch_core::feeds::{usgs, wolfx};
use quakewatch_core::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};

const WOLFX_TIMEOUT: Duration = Duration::from_secs(10);
const USGS_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Parser)]
#[command(
    name = "quakewatch-proxy",
    version,
    about = "CORS relay for the Wolfx and USGS earthquake feeds"
)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3001)]
    port: u16,
}

#[derive(Clone)]
struct AppState {
    client: Arc<dyn HttpClient>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let state = AppState {
        client: Arc::new(ReqwestHttpClient::new()),
    };

    let addr: SocketAddr = match format!("{}:{}", args.host, args.port).parse() {
        Ok(addr) => addr,
        Err(error) => {
            eprintln!("invalid bind address {}:{}: {error}", args.host, args.port);
            std::process::exit(2);
        }
    };

    let app = router(state);

    tracing::info!("feed proxy listening on http://{addr}");
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            eprintln!("failed to bind {addr}: {error}");
            std::process::exit(2);
        }
    };
    if let Err(error) = axum::serve(listener, app).await {
        eprintln!("server error: {error}");
        std::process::exit(1);
    }
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86_400));

    Router::new()
        .route("/api/wolfx", get(relay_wolfx))
        .route("/api/usgs", get(relay_usgs))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn relay_wolfx(State(state): State<AppState>) -> Response {
    relay(&state, "Wolfx", wolfx::DIRECT_URL, WOLFX_TIMEOUT).await
}

async fn relay_usgs(State(state): State<AppState>) -> Response {
    relay(&state, "USGS", usgs::DIRECT_URL, USGS_TIMEOUT).await
}

/// Forward one request upstream and relay the JSON body.
///
/// Any upstream problem (transport error, non-2xx status, non-JSON body)
/// collapses to a single 500 shape so browser clients have one error
/// contract to handle.
async fn relay(state: &AppState, upstream: &str, url: &str, timeout: Duration) -> Response {
    let request = HttpRequest::get(url)
        .with_timeout_ms(timeout.as_millis() as u64)
        .with_header("Accept", "application/json");

    let details = match state.client.execute(request).await {
        Ok(response) if response.is_success() => {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(body) => return (StatusCode::OK, Json(body)).into_response(),
                Err(error) => format!("upstream body was not valid JSON: {error}"),
            }
        }
        Ok(response) => format!("upstream returned HTTP {}", response.status),
        Err(error) => error.to_string(),
    };

    tracing::warn!(upstream, url, %details, "relay failed");
    relay_error(upstream, details)
}

fn relay_error(upstream: &str, details: String) -> Response {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    let body = json!({
        "error": format!("Failed to fetch data from {upstream} API"),
        "details": details,
        "timestamp": timestamp,
    });

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
