//! catalog-product Service - Product Catalog

use std::sync::Arc;

use catalog_bootstrap::{Infrastructure, run_server};
use catalog_errors::AppError;
use tonic_reflection::server::Builder as ReflectionBuilder;
use tracing::info;

use catalog_product::FILE_DESCRIPTOR_SET;
use catalog_product::api::ProductServiceImpl;
use catalog_product::application::ProductHandler;
use catalog_product::infrastructure::persistence::{
    PostgresProductRepository, PostgresUnitOfWorkFactory,
};
use catalog_product::proto::product_service_server::ProductServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure, mut server| async move {
        info!("Initializing catalog-product Service...");

        let pool = infra.postgres_pool();
        let repo = Arc::new(PostgresProductRepository::new(pool.clone()));
        let uow_factory = Arc::new(PostgresUnitOfWorkFactory::new(pool));
        info!("Repositories initialized");

        let page_size = infra.config().catalog.page_size;
        let handler = Arc::new(ProductHandler::new(repo, uow_factory, page_size));
        let service = ProductServiceImpl::new(handler);
        info!(page_size, "Product handler initialized");

        let reflection_service = ReflectionBuilder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| AppError::internal(format!("Failed to build reflection service: {}", e)))?;

        Ok(server
            .add_service(ProductServiceServer::new(service))
            .add_service(reflection_service))
    })
    .await
}
