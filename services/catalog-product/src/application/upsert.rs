//! 事务协调：查找或创建分类，然后写入商品

use std::sync::Arc;

use catalog_errors::AppResult;
use tracing::{debug, info, warn};

use crate::domain::{
    CategoryId, CategoryRepository, CategoryWrite, ProductDraft, ProductId, ProductWrite,
    UnitOfWork, UnitOfWorkFactory, UpsertMode,
};

/// 查找或创建分类
///
/// 找到同名（不区分大小写）分类时复用其 ID，否则插入新分类。
pub async fn resolve_category(
    categories: &dyn CategoryRepository,
    name: &str,
) -> AppResult<CategoryId> {
    if let Some(id) = categories.find_id_by_name(name).await? {
        debug!(category = name, category_id = %id, "Category resolved");
        return Ok(id);
    }

    let id = categories
        .insert(&CategoryWrite::from_requested_name(name))
        .await?;
    info!(category = name, category_id = %id, "Category created");
    Ok(id)
}

/// Create / Update 共用的事务协调器
pub struct UpsertCoordinator {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl UpsertCoordinator {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }

    /// 在单个事务中解析分类并写入商品
    ///
    /// 任一步骤失败都会回滚，不会留下只写了一半的数据。
    /// Create 返回新商品 ID，Update 原样返回请求中的 ID。
    pub async fn upsert(&self, draft: &ProductDraft, mode: UpsertMode) -> AppResult<ProductId> {
        let uow = self.uow_factory.begin().await?;

        match Self::apply(uow.as_ref(), draft, mode).await {
            Ok(id) => {
                uow.commit().await?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn apply(
        uow: &dyn UnitOfWork,
        draft: &ProductDraft,
        mode: UpsertMode,
    ) -> AppResult<ProductId> {
        let category_id = resolve_category(uow.categories(), &draft.category_name).await?;
        let write = ProductWrite::from_draft(draft, category_id);

        match mode {
            UpsertMode::Create => uow.products().insert(&write).await,
            UpsertMode::Update => {
                let id = draft.id.unwrap_or_default();
                let affected = uow.products().update(id, &write).await?;
                if affected == 0 {
                    debug!(product_id = %id, "Update matched no rows");
                }
                Ok(id)
            }
        }
    }
}
