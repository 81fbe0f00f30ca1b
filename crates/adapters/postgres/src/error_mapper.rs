//! 数据库错误映射工具
//!
//! 统一的 SQLx 错误到 AppError 的转换

use catalog_errors::AppError;

/// PostgreSQL 唯一约束冲突
pub const UNIQUE_VIOLATION: &str = "23505";

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => match code.as_ref() {
                UNIQUE_VIOLATION => AppError::conflict(format!(
                    "Duplicate entry violates unique constraint: {}",
                    db_err
                )),
                "23503" => AppError::validation(format!("Foreign key constraint violation: {}", db_err)),
                "23514" => AppError::validation(format!("Check constraint violation: {}", db_err)),
                "23502" => AppError::validation(format!("Not null constraint violation: {}", db_err)),
                "22003" => AppError::validation(format!("Numeric value out of range: {}", db_err)),
                _ => AppError::database(format!("Database error ({}): {}", code, db_err)),
            },
            None => AppError::database(db_err.to_string()),
        },
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        sqlx::Error::ColumnDecode { index, source } => {
            AppError::internal(format!("Failed to decode column {}: {}", index, source))
        }
        _ => AppError::database(e.to_string()),
    }
}

/// 是否为唯一约束冲突
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}
