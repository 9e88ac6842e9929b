//! 可观测性模块
//!
//! 提供 Prometheus 指标、结构化日志和健康检查。

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};
use crate::storage::factory::{StorageFactory, StorageInstance};

// ===== Simple Metrics =====

/// 简单应用指标
#[derive(Debug, Default)]
pub struct AppMetrics {
    pub http_requests_total: AtomicU64,
    pub http_request_duration_sum: AtomicU64,
    pub active_connections: AtomicUsize,
    pub messages_sent_total: AtomicU64,
    pub access_denied_total: AtomicU64,
    pub upstream_faults_total: AtomicU64,
    pub payments_verified_total: AtomicU64,
    pub payments_failed_total: AtomicU64,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn connection_opened(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_message_sent(&self) {
        self.messages_sent_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_access_denied(&self) {
        self.access_denied_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_fault(&self) {
        self.upstream_faults_total.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录支付校验结果
    pub fn record_payment(&self, verified: bool) {
        if verified {
            self.payments_verified_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.payments_failed_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        let requests = self.http_requests_total.load(Ordering::Relaxed);
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds summary
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP active_connections Active HTTP connections
# TYPE active_connections gauge
active_connections {}
# HELP chat_messages_sent_total Messages answered by the upstream model
# TYPE chat_messages_sent_total counter
chat_messages_sent_total {}
# HELP chat_access_denied_total Messages refused by the tier gate
# TYPE chat_access_denied_total counter
chat_access_denied_total {}
# HELP chat_upstream_faults_total Failed upstream completions
# TYPE chat_upstream_faults_total counter
chat_upstream_faults_total {}
# HELP payments_verified_total Payments with a valid signature
# TYPE payments_verified_total counter
payments_verified_total {}
# HELP payments_failed_total Payments with an invalid signature
# TYPE payments_failed_total counter
payments_failed_total {}
"#,
            requests,
            self.http_request_duration_sum.load(Ordering::Relaxed) as f64 / 1000.0,
            requests,
            self.active_connections.load(Ordering::Relaxed),
            self.messages_sent_total.load(Ordering::Relaxed),
            self.access_denied_total.load(Ordering::Relaxed),
            self.upstream_faults_total.load(Ordering::Relaxed),
            self.payments_verified_total.load(Ordering::Relaxed),
            self.payments_failed_total.load(Ordering::Relaxed),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

/// 可观测性路由状态
#[derive(Debug, Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub storage: StorageInstance,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: &str, metrics: Arc<AppMetrics>, storage: StorageInstance) -> Self {
        Self {
            metrics,
            storage,
            start_time: Utc::now(),
            version: version.to_string(),
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }

    async fn storage_check(&self) -> HealthCheck {
        let start = Instant::now();
        let result = StorageFactory::health_check(&self.storage).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthCheck {
                name: format!("storage:{}", self.storage.kind()),
                status: "healthy".to_string(),
                message: None,
                latency_ms: Some(latency_ms),
            },
            Err(e) => HealthCheck {
                name: format!("storage:{}", self.storage.kind()),
                status: "unhealthy".to_string(),
                message: Some(e.to_string()),
                latency_ms: Some(latency_ms),
            },
        }
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = vec![state.storage_check().await];
    let all_healthy = checks.iter().all(|c| c.status == "healthy");

    let health_status = HealthStatus {
        status: if all_healthy { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查（检查存储）
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    match StorageFactory::health_check(&state.storage).await {
        Ok(()) => (StatusCode::OK, "Ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "Not Ready"),
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    (StatusCode::OK, state.metrics.gather())
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化日志
///
/// RUST_LOG 优先于配置中的级别；`structured` 为 true 时输出 JSON。
pub fn init_tracing(level: &str, structured: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = if structured {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_line_number(true)
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to set tracing subscriber: {}", e)))
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    metrics.connection_opened();

    let response = next.run(req).await;

    metrics.record_http_request(start.elapsed().as_millis() as u64);
    metrics.connection_closed();

    response
}
