//! Business logic handler

use std::sync::Arc;

use catalog_common::PagedResult;
use catalog_errors::AppError;
use tracing::{debug, info};

use crate::domain::{
    Paginator, Product, ProductDraft, ProductId, ProductRepository, UnitOfWorkFactory, UpsertMode,
};
use crate::error::{CatalogError, CatalogResult};

use super::upsert::UpsertCoordinator;

pub struct ProductHandler {
    repo: Arc<dyn ProductRepository>,
    coordinator: UpsertCoordinator,
    paginator: Paginator,
}

impl ProductHandler {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        page_size: u32,
    ) -> Self {
        Self {
            repo,
            coordinator: UpsertCoordinator::new(uow_factory),
            paginator: Paginator::new(page_size),
        }
    }

    /// 分页查询商品
    pub async fn list_products(&self, requested_page: i64) -> CatalogResult<PagedResult<Product>> {
        let window = self
            .paginator
            .compute(self.repo.as_ref(), requested_page)
            .await
            .map_err(CatalogError::data_source)?;

        let items = self
            .repo
            .list(&window.pagination)
            .await
            .map_err(CatalogError::data_source)?;

        debug!(
            page = window.page(),
            offset = window.offset(),
            total = window.total,
            returned = items.len(),
            "Products listed"
        );

        Ok(PagedResult::new(items, window.total, &window.pagination))
    }

    /// 查询单个商品
    ///
    /// 行不存在与行无法解码同样视为未找到。
    pub async fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        match self.repo.find_by_id(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(CatalogError::ProductNotFound(format!("product {} does not exist", id))),
            Err(AppError::NotFound(msg)) => Err(CatalogError::ProductNotFound(msg)),
            Err(e) => Err(CatalogError::data_source(e)),
        }
    }

    /// 创建商品
    pub async fn create_product(&self, draft: &ProductDraft) -> CatalogResult<ProductId> {
        let id = self
            .coordinator
            .upsert(draft, UpsertMode::Create)
            .await
            .map_err(CatalogError::transaction)?;

        info!(product_id = %id, category = %draft.category_name, "Product created");
        Ok(id)
    }

    /// 全量更新商品
    ///
    /// ID 不存在时不报错，与更新成功无法区分。
    pub async fn update_product(&self, draft: &ProductDraft) -> CatalogResult<ProductId> {
        let id = self
            .coordinator
            .upsert(draft, UpsertMode::Update)
            .await
            .map_err(CatalogError::transaction)?;

        info!(product_id = %id, category = %draft.category_name, "Product updated");
        Ok(id)
    }

    /// 删除商品（幂等）
    pub async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        let affected = self
            .repo
            .delete(id)
            .await
            .map_err(CatalogError::data_source)?;

        info!(product_id = %id, affected, "Product deleted");
        Ok(())
    }
}
