//! Proto <-> Domain conversions

use catalog_common::PagedResult;

use crate::domain::{Product, ProductDraft, ProductId};
use crate::proto;

/// 写请求转为草稿；id 为 0 表示未指定，分类缺省时名称为空串
pub fn draft_from_proto(product: proto::Product) -> ProductDraft {
    ProductDraft {
        id: (product.id != 0).then_some(ProductId(product.id)),
        name: product.name,
        price: product.price,
        stock: product.stock,
        category_name: product.category.map(|c| c.name).unwrap_or_default(),
    }
}

pub fn product_to_proto(product: Product) -> proto::Product {
    proto::Product {
        id: product.id.0,
        name: product.name,
        price: product.price,
        stock: product.stock,
        category: Some(proto::Category {
            id: product.category.id.0,
            name: product.category.name,
        }),
    }
}

pub fn products_to_proto(result: PagedResult<Product>) -> proto::Products {
    let total_page = result.total_pages();
    let page = result.map(product_to_proto);

    proto::Products {
        pagination: Some(proto::Pagination {
            page: page.page,
            total_page,
        }),
        data: page.items,
    }
}

/// 写操作的固定成功状态
pub fn ok_status() -> proto::Status {
    proto::Status { status: 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryId};
    use catalog_common::Pagination;

    fn sample() -> Product {
        Product {
            id: ProductId(3),
            name: "Widget".into(),
            price: 9.99,
            stock: 5,
            category: Category {
                id: CategoryId(2),
                name: "tools".into(),
            },
        }
    }

    #[test]
    fn test_zero_id_means_unspecified() {
        let draft = draft_from_proto(proto::Product {
            id: 0,
            name: "Widget".into(),
            price: 1.5,
            stock: 2,
            category: Some(proto::Category {
                id: 99,
                name: "Tools".into(),
            }),
        });

        assert_eq!(draft.id, None);
        assert_eq!(draft.category_name, "Tools");
    }

    #[test]
    fn test_missing_category_becomes_empty_name() {
        let draft = draft_from_proto(proto::Product {
            id: 4,
            name: "Widget".into(),
            price: 1.5,
            stock: 2,
            category: None,
        });

        assert_eq!(draft.id, Some(ProductId(4)));
        assert_eq!(draft.category_name, "");
    }

    #[test]
    fn test_product_to_proto_carries_category() {
        let message = product_to_proto(sample());
        assert_eq!(message.id, 3);
        assert_eq!(message.stock, 5);
        let category = message.category.unwrap();
        assert_eq!(category.id, 2);
        assert_eq!(category.name, "tools");
    }

    #[test]
    fn test_products_to_proto_reports_total_pages() {
        let pagination = Pagination::from_requested(2, 10);
        let result = PagedResult::new(vec![sample()], 25, &pagination);
        let message = products_to_proto(result);

        let meta = message.pagination.unwrap();
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_page, 3);
        assert_eq!(message.data.len(), 1);
    }

    #[test]
    fn test_empty_page_has_no_pages() {
        let pagination = Pagination::from_requested(1, 10);
        let message = products_to_proto(PagedResult::new(Vec::new(), 0, &pagination));

        assert_eq!(message.pagination.unwrap().total_page, 0);
        assert!(message.data.is_empty());
    }
}
