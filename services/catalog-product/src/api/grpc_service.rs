//! gRPC service implementation

use std::sync::Arc;

use catalog_telemetry::RpcTimer;
use tonic::{Request, Response};
use tracing::{debug, warn};

use crate::application::ProductHandler;
use crate::domain::ProductId;
use crate::error::CatalogResult;
use crate::proto;
use crate::proto::product_service_server::ProductService;

use super::conversions::*;

pub struct ProductServiceImpl {
    handler: Arc<ProductHandler>,
}

impl ProductServiceImpl {
    pub fn new(handler: Arc<ProductHandler>) -> Self {
        Self { handler }
    }
}

/// 记录耗时与结果，并把业务错误转换为 gRPC 状态
fn finish<T>(timer: RpcTimer, result: CatalogResult<T>) -> Result<Response<T>, tonic::Status> {
    let method = timer.method();
    timer.finish(result.is_ok());

    result.map(Response::new).map_err(|e| {
        warn!(method, error = %e, "RPC failed");
        tonic::Status::from(e)
    })
}

#[tonic::async_trait]
impl ProductService for ProductServiceImpl {
    async fn list_products(
        &self,
        request: Request<proto::Page>,
    ) -> Result<Response<proto::Products>, tonic::Status> {
        let timer = RpcTimer::start("ListProducts");
        let page = request.into_inner().page;
        debug!(page, "ListProducts");

        let result = self.handler.list_products(page).await.map(products_to_proto);
        finish(timer, result)
    }

    async fn get_product(
        &self,
        request: Request<proto::Id>,
    ) -> Result<Response<proto::Product>, tonic::Status> {
        let timer = RpcTimer::start("GetProduct");
        let id = ProductId(request.into_inner().id);
        debug!(product_id = %id, "GetProduct");

        let result = self.handler.get_product(id).await.map(product_to_proto);
        finish(timer, result)
    }

    async fn create_product(
        &self,
        request: Request<proto::Product>,
    ) -> Result<Response<proto::Id>, tonic::Status> {
        let timer = RpcTimer::start("CreateProduct");
        let draft = draft_from_proto(request.into_inner());

        let result = self
            .handler
            .create_product(&draft)
            .await
            .map(|id| proto::Id { id: id.0 });
        finish(timer, result)
    }

    async fn update_product(
        &self,
        request: Request<proto::Product>,
    ) -> Result<Response<proto::Status>, tonic::Status> {
        let timer = RpcTimer::start("UpdateProduct");
        let draft = draft_from_proto(request.into_inner());

        let result = self.handler.update_product(&draft).await.map(|_| ok_status());
        finish(timer, result)
    }

    async fn delete_product(
        &self,
        request: Request<proto::Id>,
    ) -> Result<Response<proto::Status>, tonic::Status> {
        let timer = RpcTimer::start("DeleteProduct");
        let id = ProductId(request.into_inner().id);

        let result = self.handler.delete_product(id).await.map(|_| ok_status());
        finish(timer, result)
    }
}
