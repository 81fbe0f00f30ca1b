//! 领域层

pub mod pagination;
pub mod product;
pub mod repository;
pub mod unit_of_work;

pub use pagination::*;
pub use product::*;
pub use repository::*;
pub use unit_of_work::*;
