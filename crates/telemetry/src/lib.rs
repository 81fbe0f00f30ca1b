//! telemetry - 可观测性库

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const RPC_REQUESTS_TOTAL: &str = "catalog_rpc_requests_total";
pub const RPC_DURATION_SECONDS: &str = "catalog_rpc_duration_seconds";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to install Prometheus exporter: {0}")]
    Metrics(#[from] BuildError),
}

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

/// 安装 Prometheus recorder 并在 `addr` 上暴露抓取端点
///
/// 必须在 tokio runtime 内调用。
pub fn init_metrics(addr: SocketAddr) -> Result<(), TelemetryError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// 单次 RPC 的计时器
///
/// 未安装 recorder 时 `finish` 为空操作。
pub struct RpcTimer {
    method: &'static str,
    started: Instant,
}

impl RpcTimer {
    pub fn start(method: &'static str) -> Self {
        Self {
            method,
            started: Instant::now(),
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn finish(self, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        metrics::counter!(RPC_REQUESTS_TOTAL, "method" => self.method, "outcome" => outcome)
            .increment(1);
        metrics::histogram!(RPC_DURATION_SECONDS, "method" => self.method)
            .record(self.started.elapsed().as_secs_f64());
    }
}
