mod postgres;
mod queries;
mod rows;
mod unit_of_work;

pub use postgres::PostgresProductRepository;
pub use queries::*;
pub use rows::ProductRow;
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
