use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use shared::DEFAULT_ALLOWED_ORIGINS;
use std::sync::Arc;

pub const ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
/// 24 時間
pub const MAX_AGE: &str = "86400";

/// 許可リストに基づく CORS ヘッダの決定
///
/// 許可リストにないオリジンには先頭の許可オリジンを返す。
/// ブラウザ側で一致しないため、結果としてクロスオリジンは拒否される。
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        let allowed_origins = if allowed_origins.is_empty() {
            DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            allowed_origins
        };
        Self { allowed_origins }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Access-Control-Allow-Origin に載せるオリジン
    pub fn allow_origin(&self, origin: Option<&str>) -> &str {
        origin
            .and_then(|o| self.allowed_origins.iter().find(|allowed| *allowed == o))
            .or_else(|| self.allowed_origins.first())
            .map_or(DEFAULT_ALLOWED_ORIGINS[0], String::as_str)
    }

    pub fn headers(&self, origin: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let allow_origin = self.allow_origin(origin);
        match HeaderValue::from_str(allow_origin) {
            Ok(value) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
            Err(_) => {
                tracing::warn!(origin = allow_origin, "Configured origin is not a valid header value");
            }
        }
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
        headers
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// 全レスポンス（エラー・プリフライト含む）に CORS ヘッダを付与するミドルウェア
pub async fn apply_cors(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .extend(policy.headers(origin.as_deref()));
    response
}
