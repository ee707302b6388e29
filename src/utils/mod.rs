pub mod encoding;
pub mod error;
pub mod logger;
pub mod path;
pub mod validation;
