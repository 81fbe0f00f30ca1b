//! Unit of Work 模式
//!
//! 分类解析与商品写入在同一事务中完成，保证二者原子可见。

use async_trait::async_trait;
use catalog_errors::AppResult;

use super::product::{CategoryId, CategoryWrite, ProductId, ProductWrite};

/// 事务内的分类仓储
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// 按名称（不区分大小写）查找分类
    async fn find_id_by_name(&self, name: &str) -> AppResult<Option<CategoryId>>;

    /// 新建分类并返回生成的 ID
    ///
    /// 并发插入同名分类时由唯一索引裁决，失败方返回 `AppError::Conflict`。
    async fn insert(&self, category: &CategoryWrite) -> AppResult<CategoryId>;
}

/// 事务内的商品写仓储
#[async_trait]
pub trait ProductWriteRepository: Send + Sync {
    /// 插入商品；`id` 为空时由数据库生成
    async fn insert(&self, product: &ProductWrite) -> AppResult<ProductId>;

    /// 覆盖指定商品的全部字段，返回受影响行数
    async fn update(&self, id: ProductId, product: &ProductWrite) -> AppResult<u64>;
}

/// Unit of Work trait
///
/// # 使用示例
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
///
/// let category_id = uow.categories().insert(&category).await?;
/// uow.products().insert(&product).await?;
///
/// uow.commit().await?;
/// ```
///
/// 未提交即被丢弃的 UnitOfWork 会回滚。
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn categories(&self) -> &dyn CategoryRepository;

    fn products(&self) -> &dyn ProductWriteRepository;

    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
