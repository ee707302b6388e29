pub mod batch;
pub mod converter;
pub mod engine;

pub use crate::domain::model::{BinaryEntry, BinaryPayload, Record};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
