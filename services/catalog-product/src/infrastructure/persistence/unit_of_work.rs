//! PostgreSQL Unit of Work 实现
//!
//! 事务内的仓储共享同一个 `Transaction`。UnitOfWork 在提交前被丢弃
//! （例如请求被取消或超时）时，sqlx 会在归还连接时自动回滚。

use std::sync::Arc;

use async_trait::async_trait;
use catalog_adapter_postgres::{is_unique_violation, map_sqlx_error};
use catalog_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{
    CategoryId, CategoryRepository, CategoryWrite, ProductId, ProductWrite,
    ProductWriteRepository, UnitOfWork, UnitOfWorkFactory,
};

use super::queries::{
    FIND_CATEGORY_BY_NAME, INSERT_CATEGORY, INSERT_PRODUCT, INSERT_PRODUCT_WITH_ID,
    SYNC_PRODUCT_ID_SEQUENCE, UPDATE_PRODUCT, db_product_id,
};

/// Shared transaction type
type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// Postgres Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }
}

pub struct PostgresUnitOfWork {
    tx: SharedTx,
    category_repo: TxCategoryRepository,
    product_repo: TxProductRepository,
}

impl PostgresUnitOfWork {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        let tx = Arc::new(Mutex::new(Some(tx)));

        Self {
            tx: tx.clone(),
            category_repo: TxCategoryRepository { tx: tx.clone() },
            product_repo: TxProductRepository { tx },
        }
    }

    async fn take(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn categories(&self) -> &dyn CategoryRepository {
        &self.category_repo
    }

    fn products(&self) -> &dyn ProductWriteRepository {
        &self.product_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.take()
            .await?
            .commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.take()
            .await?
            .rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))
    }
}

struct TxCategoryRepository {
    tx: SharedTx,
}

#[async_trait]
impl CategoryRepository for TxCategoryRepository {
    async fn find_id_by_name(&self, name: &str) -> AppResult<Option<CategoryId>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let id: Option<i32> = sqlx::query_scalar(FIND_CATEGORY_BY_NAME)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        id.map(category_id_from_db).transpose()
    }

    async fn insert(&self, category: &CategoryWrite) -> AppResult<CategoryId> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let id: i32 = sqlx::query_scalar(INSERT_CATEGORY)
            .bind(&category.name)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                // 并发事务已提交同名分类
                if is_unique_violation(&e) {
                    warn!(category = %category.name, "Concurrent category insert lost");
                }
                map_sqlx_error(e)
            })?;

        category_id_from_db(id)
    }
}

struct TxProductRepository {
    tx: SharedTx,
}

#[async_trait]
impl ProductWriteRepository for TxProductRepository {
    async fn insert(&self, product: &ProductWrite) -> AppResult<ProductId> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let stock = i64::from(product.stock);
        let category_id = i32::try_from(product.category_id.0)
            .map_err(|_| AppError::validation("category id out of range"))?;

        let id: i64 = match product.id {
            Some(id) => {
                let id = i64::try_from(id.0)
                    .map_err(|_| AppError::validation(format!("product id {} out of range", id)))?;

                let inserted: i64 = sqlx::query_scalar(INSERT_PRODUCT_WITH_ID)
                    .bind(id)
                    .bind(&product.name)
                    .bind(product.price)
                    .bind(stock)
                    .bind(category_id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(map_sqlx_error)?;

                sqlx::query(SYNC_PRODUCT_ID_SEQUENCE)
                    .bind(inserted)
                    .execute(&mut **tx)
                    .await
                    .map_err(map_sqlx_error)?;

                inserted
            }
            None => sqlx::query_scalar(INSERT_PRODUCT)
                .bind(&product.name)
                .bind(product.price)
                .bind(stock)
                .bind(category_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(map_sqlx_error)?,
        };

        u64::try_from(id)
            .map(ProductId)
            .map_err(|_| AppError::internal(format!("invalid generated product id {}", id)))
    }

    async fn update(&self, id: ProductId, product: &ProductWrite) -> AppResult<u64> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let category_id = i32::try_from(product.category_id.0)
            .map_err(|_| AppError::validation("category id out of range"))?;

        let result = sqlx::query(UPDATE_PRODUCT)
            .bind(db_product_id(id))
            .bind(&product.name)
            .bind(product.price)
            .bind(i64::from(product.stock))
            .bind(category_id)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

fn category_id_from_db(id: i32) -> AppResult<CategoryId> {
    u32::try_from(id)
        .map(CategoryId)
        .map_err(|_| AppError::internal(format!("invalid category id {}", id)))
}
