//! catalog-bootstrap - 统一服务启动骨架
//!
//! 加载配置、初始化日志与指标、建立数据库连接池，并运行 gRPC 服务器

mod infrastructure;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
