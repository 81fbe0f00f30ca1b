use catalog_errors::AppError;
use thiserror::Error;
use tonic::Status;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Data source error: {0}")]
    DataSource(String),
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl CatalogError {
    /// 读路径失败（列表、删除）
    pub fn data_source(err: AppError) -> Self {
        Self::DataSource(err.to_string())
    }

    /// 写事务失败，底层原因不区分（约束冲突、类型错误等一律视为内部错误）
    pub fn transaction(err: AppError) -> Self {
        Self::Transaction(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for Status {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::ProductNotFound(_) => Status::not_found(error.to_string()),
            CatalogError::DataSource(_) | CatalogError::Transaction(_) => {
                Status::internal(error.to_string())
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::ProductNotFound(msg) => AppError::NotFound(msg),
            CatalogError::DataSource(msg) => AppError::Database(msg),
            CatalogError::Transaction(msg) => AppError::Internal(msg),
        }
    }
}
