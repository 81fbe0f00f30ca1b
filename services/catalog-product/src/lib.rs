//! catalog-product - 商品目录服务
//!
//! 商品按分类归组，分类按名称（不区分大小写）惰性创建。

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Proto generated code modules
pub mod catalog_product {
    pub mod v1 {
        tonic::include_proto!("catalog.product.v1");
    }
}

// Re-export for convenience
pub use catalog_product::v1 as proto;

/// 文件描述符集 (用于 gRPC 反射)
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("catalog_product_descriptor");
