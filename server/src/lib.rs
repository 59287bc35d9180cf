use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use postsearch_core::SearchService;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Host name that disables the virtual-host check.
pub const ANY_HOST: &str = "*";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Only requests whose `Host` equals this name are routed.
    pub host_name: String,
    pub static_dir: PathBuf,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

pub fn build_app(service: SearchService, config: &ServerConfig) -> Router {
    let app_state = AppState { service: Arc::new(service) };
    let host_name: Arc<str> = Arc::from(config.host_name.as_str());

    Router::new()
        .route("/search", get(search_handler))
        // Every path other than /search falls through to the asset directory.
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(app_state)
        .layer(middleware::from_fn_with_state(host_name, require_host))
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<Vec<(String, String)>>) -> Response {
    let posts = state.service.search(first_param(&params, "query"));
    match serde_json::to_vec(&posts) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "json encoding of search results failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// First value of `name`; repeated parameters after it are ignored.
fn first_param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()).unwrap_or("")
}

async fn require_host(State(host_name): State<Arc<str>>, req: Request, next: Next) -> Response {
    if host_matches(&host_name, &req) {
        next.run(req).await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

fn host_matches(expected: &str, req: &Request) -> bool {
    if expected == ANY_HOST {
        return true;
    }
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host());
    match host {
        Some(h) => strip_port(h).eq_ignore_ascii_case(expected),
        None => false,
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // [v6]:port
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}
