pub mod customer;
pub mod etl;
pub mod fields;
pub mod order;
pub mod product;

pub use crate::domain::model::{Record, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TransformResult};
pub use crate::utils::error::Result;
