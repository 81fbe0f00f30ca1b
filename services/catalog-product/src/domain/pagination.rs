//! 分页计算
//!
//! 先对未过滤的商品范围计数，再由请求页码推导 offset/limit 与总页数。

use async_trait::async_trait;
use catalog_common::Pagination;
use catalog_errors::AppResult;

/// 行数来源
///
/// 计数必须走独立的语句，不能改动随后用于取数的查询。
#[async_trait]
pub trait RowCounter: Send + Sync {
    async fn count_rows(&self) -> AppResult<u64>;
}

/// 一次列表请求的分页窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub pagination: Pagination,
    pub total: u64,
}

impl PageWindow {
    pub fn page(&self) -> u64 {
        self.pagination.page
    }

    pub fn offset(&self) -> u64 {
        self.pagination.offset()
    }

    pub fn limit(&self) -> u32 {
        self.pagination.limit()
    }

    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages(self.total)
    }
}

/// 分页计算器，页大小在进程生命周期内固定
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: u32,
}

impl Paginator {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn compute<C>(&self, counter: &C, requested_page: i64) -> AppResult<PageWindow>
    where
        C: RowCounter + ?Sized,
    {
        let pagination = Pagination::from_requested(requested_page, self.page_size);
        let total = counter.count_rows().await?;

        Ok(PageWindow { pagination, total })
    }
}
