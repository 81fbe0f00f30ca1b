//! 应用层

mod handler;
mod upsert;

pub use handler::*;
pub use upsert::*;
