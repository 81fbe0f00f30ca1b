//! SQL 构造
//!
//! 读语句以 `products AS p` 左连接 `categories AS c`，分类缺失的商品照常返回。
//! 每次调用都生成独立的 `QueryBuilder`，计数语句与取数语句互不影响。

use catalog_common::Pagination;
use sqlx::{Postgres, QueryBuilder};

use crate::domain::ProductId;

/// 读语句的列
pub const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.price, p.stock, c.id AS category_id, c.name AS category_name";

/// 读语句的数据来源
pub const PRODUCT_SOURCE: &str =
    "products AS p LEFT JOIN categories AS c ON c.id = p.category_id";

pub const FIND_CATEGORY_BY_NAME: &str =
    "SELECT id FROM categories WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1";

pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id";

pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (name, price, stock, category_id)
    VALUES ($1, $2, $3, $4)
    RETURNING id
"#;

pub const INSERT_PRODUCT_WITH_ID: &str = r#"
    INSERT INTO products (id, name, price, stock, category_id)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id
"#;

/// 显式 ID 超过序列当前值时把序列推进到该 ID；序列只前进，不回退。
///
/// 序列值在事务之间立即可见，其他未提交事务已取得的 ID 也计入 `last_value`。
pub const SYNC_PRODUCT_ID_SEQUENCE: &str = r#"
    SELECT setval(s.seq, $1)
    FROM (SELECT pg_get_serial_sequence('products', 'id')::regclass AS seq) AS s
    WHERE $1 > COALESCE(pg_sequence_last_value(s.seq), 0)
"#;

/// 全量覆盖，不支持部分字段更新
pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products SET
        name = $2,
        price = $3,
        stock = $4,
        category_id = $5
    WHERE id = $1
"#;

pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

/// 商品读语句构造器
pub struct ProductQuery;

impl ProductQuery {
    fn select() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(format!("SELECT {} FROM {}", PRODUCT_COLUMNS, PRODUCT_SOURCE))
    }

    /// 未过滤范围的计数
    pub fn count() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new("SELECT COUNT(*) FROM products AS p")
    }

    /// 分页列表
    pub fn list(pagination: &Pagination) -> QueryBuilder<'static, Postgres> {
        let mut qb = Self::select();
        qb.push(" ORDER BY p.id LIMIT ")
            .push_bind(i64::from(pagination.limit()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));
        qb
    }

    /// 按 ID 查询
    pub fn by_id(id: ProductId) -> QueryBuilder<'static, Postgres> {
        let mut qb = Self::select();
        qb.push(" WHERE p.id = ").push_bind(db_product_id(id));
        qb
    }
}

/// 商品 ID 转为 BIGINT；超出范围的 ID 不可能存在于表中，映射为 -1 以确保匹配不到任何行
pub fn db_product_id(id: ProductId) -> i64 {
    i64::try_from(id.0).unwrap_or(-1)
}
