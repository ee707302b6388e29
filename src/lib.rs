pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::converter::{ConversionMode, ConverterSettings, Mode};
pub use crate::config::toml_config::TomlConfig;
pub use crate::config::RunConfig;
pub use crate::core::batch::{convert_batch, BatchOutcome, ErrorPolicy};
pub use crate::core::converter::{Converted, Converter};
pub use crate::core::engine::ConvertEngine;
pub use crate::domain::model::{BinaryEntry, BinaryMap, BinaryPayload, Record};
pub use crate::utils::error::{ConvertError, Result};
