//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "hclip_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "hclip_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "hclip_http_requests_in_flight";

    // Pipeline metrics
    pub const ANALYSES_TOTAL: &str = "hclip_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "hclip_analysis_duration_seconds";

    // Clip metrics
    pub const CLIPS_TOTAL: &str = "hclip_clips_total";
    pub const CLIP_DURATION_SECONDS: &str = "hclip_clip_duration_seconds";

    // Janitor metrics
    pub const JANITOR_REMOVED_TOTAL: &str = "hclip_janitor_removed_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the outcome of a highlight analysis.
pub fn record_pipeline_outcome(outcome: &'static str, duration_secs: f64) {
    let labels = [("outcome", outcome)];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the outcome of a clip creation.
pub fn record_clip_outcome(outcome: &'static str, duration_secs: f64) {
    let labels = [("outcome", outcome)];
    counter!(names::CLIPS_TOTAL, &labels).increment(1);
    histogram!(names::CLIP_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record entries removed by one janitor sweep.
pub fn record_janitor_removed(count: u64) {
    counter!(names::JANITOR_REMOVED_TOTAL).increment(count);
}

/// Sanitize path for metrics labels (collapse file names).
fn sanitize_path(path: &str) -> String {
    static DOWNLOAD: OnceLock<Regex> = OnceLock::new();
    let download = DOWNLOAD.get_or_init(|| {
        Regex::new(r"^/downloads/.+$").expect("download path pattern is valid")
    });
    download.replace(path, "/downloads/:filename").to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status();
    let duration = start.elapsed().as_secs_f64();

    // Unknown paths would otherwise blow up label cardinality
    let path = if status == StatusCode::NOT_FOUND && !path.starts_with("/downloads/") {
        "unmatched".to_string()
    } else {
        sanitize_path(&path)
    };

    record_http_request(&method, &path, status.as_u16(), duration);

    response
}
