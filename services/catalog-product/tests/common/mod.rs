//! 测试用内存存储
//!
//! 事务在快照上暂存写入，提交时整体替换共享状态，回滚时直接丢弃。
//! 分类名称按小写唯一，与 `LOWER(name)` 唯一索引的行为一致。

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use catalog_common::Pagination;
use catalog_errors::{AppError, AppResult};
use catalog_product::application::ProductHandler;
use catalog_product::domain::{
    Category, CategoryId, CategoryRepository, CategoryWrite, Product, ProductId, ProductRepository,
    ProductWrite, ProductWriteRepository, RowCounter, UnitOfWork, UnitOfWorkFactory,
};

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub category_id: u32,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub categories: BTreeMap<u32, String>,
    pub products: BTreeMap<u64, StoredProduct>,
}

impl State {
    fn category_by_name(&self, name: &str) -> Option<u32> {
        let lowered = name.to_lowercase();
        self.categories
            .iter()
            .find(|(_, n)| n.to_lowercase() == lowered)
            .map(|(id, _)| *id)
    }

    fn next_category_id(&self) -> u32 {
        self.categories.keys().next_back().map_or(1, |id| id + 1)
    }

    fn next_product_id(&self) -> u64 {
        self.products.keys().next_back().map_or(1, |id| id + 1)
    }

    fn to_product(&self, id: u64, stored: &StoredProduct) -> Product {
        // 左连接：分类不存在时取零值
        let category = self
            .categories
            .get(&stored.category_id)
            .map(|name| Category {
                id: CategoryId(stored.category_id),
                name: name.clone(),
            })
            .unwrap_or_default();

        Product {
            id: ProductId(id),
            name: stored.name.clone(),
            price: stored.price,
            stock: stored.stock,
            category,
        }
    }
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    fail_reads: AtomicBool,
    fail_product_writes: AtomicBool,
    /// 下一次插入分类前由另一个事务抢先提交的分类名
    competing_category: Mutex<Option<String>>,
    undecodable: Mutex<Vec<u64>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.shared.state()
    }

    /// 直接写入已提交的商品，绕过事务；`category` 为 None 时引用不存在的分类
    pub fn seed_product(&self, name: &str, category: Option<&str>) -> u64 {
        let mut state = self.state();
        let category_id = match category {
            Some(c) => match state.category_by_name(c) {
                Some(id) => id,
                None => {
                    let id = state.next_category_id();
                    state.categories.insert(id, c.to_lowercase());
                    id
                }
            },
            None => 999,
        };
        let id = state.next_product_id();
        state.products.insert(
            id,
            StoredProduct {
                name: name.to_string(),
                price: 1.0,
                stock: 1,
                category_id,
            },
        );
        id
    }

    pub fn seed_products(&self, count: usize) {
        for i in 0..count {
            self.seed_product(&format!("product-{}", i + 1), Some("bulk"));
        }
    }

    pub fn fail_reads(&self) {
        self.shared.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_product_writes(&self) {
        self.shared.fail_product_writes.store(true, Ordering::SeqCst);
    }

    pub fn race_category_insert(&self, name: &str) {
        *self.shared.competing_category.lock().unwrap() = Some(name.to_string());
    }

    pub fn mark_undecodable(&self, id: u64) {
        self.shared.undecodable.lock().unwrap().push(id);
    }

    pub fn commits(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.shared.rollbacks.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.shared.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset by peer"));
        }
        Ok(())
    }
}

#[async_trait]
impl RowCounter for InMemoryStore {
    async fn count_rows(&self) -> AppResult<u64> {
        self.check_reads()?;
        Ok(self.state().products.len() as u64)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self, pagination: &Pagination) -> AppResult<Vec<Product>> {
        self.check_reads()?;
        let state = self.state();
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);

        Ok(state
            .products
            .iter()
            .skip(offset)
            .take(pagination.limit() as usize)
            .map(|(id, p)| state.to_product(*id, p))
            .collect())
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        self.check_reads()?;
        if self.shared.undecodable.lock().unwrap().contains(&id.0) {
            return Err(AppError::not_found(format!("failed to decode product {}", id)));
        }
        let state = self.state();
        Ok(state.products.get(&id.0).map(|p| state.to_product(id.0, p)))
    }

    async fn delete(&self, id: ProductId) -> AppResult<u64> {
        self.check_reads()?;
        Ok(self.state().products.remove(&id.0).map_or(0, |_| 1))
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let staged = self.state().clone();
        Ok(Box::new(InMemoryUnitOfWork {
            shared: self.shared.clone(),
            staged: Mutex::new(staged),
        }))
    }
}

pub struct InMemoryUnitOfWork {
    shared: Arc<Shared>,
    staged: Mutex<State>,
}

impl InMemoryUnitOfWork {
    fn staged(&self) -> MutexGuard<'_, State> {
        self.staged.lock().unwrap()
    }

    fn check_product_writes(&self) -> AppResult<()> {
        if self.shared.fail_product_writes.load(Ordering::SeqCst) {
            return Err(AppError::validation(
                "new row violates check constraint \"products_stock_check\"",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryUnitOfWork {
    async fn find_id_by_name(&self, name: &str) -> AppResult<Option<CategoryId>> {
        Ok(self.staged().category_by_name(name).map(CategoryId))
    }

    async fn insert(&self, category: &CategoryWrite) -> AppResult<CategoryId> {
        if let Some(name) = self.shared.competing_category.lock().unwrap().take() {
            let mut committed = self.shared.state();
            let id = committed.next_category_id();
            committed.categories.insert(id, name);
        }

        // 唯一索引同时约束已提交的行与本事务暂存的行
        if self.shared.state().category_by_name(&category.name).is_some()
            || self.staged().category_by_name(&category.name).is_some()
        {
            return Err(AppError::conflict(format!(
                "duplicate key value violates unique constraint: {}",
                category.name
            )));
        }

        let mut staged = self.staged();
        let id = staged.next_category_id().max(self.shared.state().next_category_id());
        staged.categories.insert(id, category.name.clone());
        Ok(CategoryId(id))
    }
}

#[async_trait]
impl ProductWriteRepository for InMemoryUnitOfWork {
    async fn insert(&self, product: &ProductWrite) -> AppResult<ProductId> {
        self.check_product_writes()?;
        let mut staged = self.staged();
        let id = match product.id {
            Some(id) if staged.products.contains_key(&id.0) => {
                return Err(AppError::conflict(format!("product {} already exists", id)));
            }
            Some(id) => id.0,
            None => staged.next_product_id(),
        };

        staged.products.insert(
            id,
            StoredProduct {
                name: product.name.clone(),
                price: product.price,
                stock: product.stock,
                category_id: product.category_id.0,
            },
        );
        Ok(ProductId(id))
    }

    async fn update(&self, id: ProductId, product: &ProductWrite) -> AppResult<u64> {
        self.check_product_writes()?;
        let mut staged = self.staged();
        match staged.products.get_mut(&id.0) {
            Some(row) => {
                *row = StoredProduct {
                    name: product.name.clone(),
                    price: product.price,
                    stock: product.stock,
                    category_id: product.category_id.0,
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn categories(&self) -> &dyn CategoryRepository {
        self
    }

    fn products(&self) -> &dyn ProductWriteRepository {
        self
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemoryUnitOfWork { shared, staged } = *self;
        *shared.state() = staged.into_inner().unwrap();
        shared.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.shared.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn handler(store: &Arc<InMemoryStore>) -> ProductHandler {
    ProductHandler::new(store.clone(), store.clone(), PAGE_SIZE)
}
