//! 商品与分类

use derive_more::{Display, From};

/// 商品 ID
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct ProductId(pub u64);

/// 分类 ID
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, From)]
#[display("{_0}")]
pub struct CategoryId(pub u32);

/// 分类
///
/// 商品引用的分类行不存在时（外键为空或已失效）取零值：id 为 0，名称为空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn is_unassigned(&self) -> bool {
        self.id == CategoryId::default() && self.name.is_empty()
    }
}

/// 商品
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub category: Category,
}

/// 写入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    Create,
    Update,
}

/// 客户端提交的商品数据，分类仅以名称给出
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Create 时可选；Update 时缺省按 0 处理（匹配不到任何行）
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub category_name: String,
}

/// `products` 表写模型
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWrite {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub category_id: CategoryId,
}

impl ProductWrite {
    pub fn from_draft(draft: &ProductDraft, category_id: CategoryId) -> Self {
        Self {
            id: draft.id,
            name: draft.name.clone(),
            price: draft.price,
            stock: draft.stock,
            category_id,
        }
    }
}

/// `categories` 表写模型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWrite {
    pub name: String,
}

impl CategoryWrite {
    /// 新分类统一以小写名称入库
    pub fn from_requested_name(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
        }
    }
}
