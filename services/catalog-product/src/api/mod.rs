//! gRPC 接口层

mod conversions;
mod grpc_service;

pub use conversions::*;
pub use grpc_service::*;
