//! PostgreSQL repository implementation

use async_trait::async_trait;
use catalog_adapter_postgres::map_sqlx_error;
use catalog_common::Pagination;
use catalog_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::{Product, ProductId, ProductRepository, RowCounter};

use super::queries::{DELETE_PRODUCT, ProductQuery, db_product_id};
use super::rows::ProductRow;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 单行查询的错误映射：列解码失败视为未找到
fn map_get_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::ColumnDecode { index, source } => {
            AppError::not_found(format!("failed to decode column {}: {}", index, source))
        }
        sqlx::Error::Decode(source) => AppError::not_found(format!("failed to decode row: {}", source)),
        other => map_sqlx_error(other),
    }
}

#[async_trait]
impl RowCounter for PostgresProductRepository {
    async fn count_rows(&self) -> AppResult<u64> {
        let mut qb = ProductQuery::count();
        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(&self, pagination: &Pagination) -> AppResult<Vec<Product>> {
        let mut qb = ProductQuery::list(pagination);
        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // 单行坏数据只让本次请求失败
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        let mut qb = ProductQuery::by_id(id);
        let row = qb
            .build_query_as::<ProductRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_get_error)?;

        row.map(|r| Product::try_from(r).map_err(|e| AppError::not_found(e.to_string())))
            .transpose()
    }

    async fn delete(&self, id: ProductId) -> AppResult<u64> {
        let result = sqlx::query(DELETE_PRODUCT)
            .bind(db_product_id(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
