//! 数据库行映射结构

use catalog_errors::AppError;
use sqlx::FromRow;

use crate::domain::{Category, CategoryId, Product, ProductId};

/// 商品左连接分类的结果行，分类列可能为 NULL
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(row.id)
            .map_err(|_| AppError::internal(format!("invalid product id {}", row.id)))?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            AppError::internal(format!("product {} has invalid stock {}", row.id, row.stock))
        })?;
        let category_id = match row.category_id {
            Some(raw) => u32::try_from(raw).map_err(|_| {
                AppError::internal(format!("product {} has invalid category id {}", row.id, raw))
            })?,
            None => 0,
        };

        Ok(Product {
            id: ProductId(id),
            name: row.name,
            price: row.price,
            stock,
            category: Category {
                id: CategoryId(category_id),
                name: row.category_name.unwrap_or_default(),
            },
        })
    }
}
