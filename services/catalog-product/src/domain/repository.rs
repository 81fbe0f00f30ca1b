//! 商品仓储接口

use async_trait::async_trait;
use catalog_common::Pagination;
use catalog_errors::AppResult;

use super::pagination::RowCounter;
use super::product::{Product, ProductId};

/// 商品读取与删除
///
/// 计数（`RowCounter`）针对未过滤的全部商品。
#[async_trait]
pub trait ProductRepository: RowCounter {
    /// 按分页窗口读取商品及其分类
    async fn list(&self, pagination: &Pagination) -> AppResult<Vec<Product>>;

    /// 根据 ID 查找商品
    ///
    /// 行存在但无法解码时返回 `AppError::NotFound`。
    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 删除商品，返回受影响行数
    async fn delete(&self, id: ProductId) -> AppResult<u64>;
}
