//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use catalog_config::AppConfig;
use catalog_errors::AppResult;
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 gRPC 服务
///
/// 负责：
/// 1. 加载配置（`.env`、配置文件、环境变量）
/// 2. 初始化日志与指标
/// 3. 创建数据库连接池
/// 4. 调用闭包注册 gRPC 服务
/// 5. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use catalog_bootstrap::run_server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server("config", |infra, mut server| async move {
///         let service = MyServiceImpl::new(infra.postgres_pool());
///         Ok(server.add_service(MyServiceServer::new(service)))
///     })
///     .await
/// }
/// ```
pub async fn run_server<F, Fut>(
    config_dir: &str,
    server_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let _ = dotenvy::dotenv();

    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let infra = Infrastructure::from_config(config).await?;

    // 超时的请求会被丢弃，未提交的事务随之回滚
    let server = Server::builder().timeout(request_timeout);
    let router = server_builder(infra, server).await?;

    info!(%addr, timeout_secs = request_timeout.as_secs(), "gRPC server starting");

    router.serve_with_shutdown(addr, shutdown_signal()).await?;

    info!("Service stopped");

    Ok(())
}
