use crate::utils::error::{ConvertError, Result};
use crate::utils::path::KeyPath;
use crate::utils::validation::{validate_key_path, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_KEY: &str = "data";
pub const DEFAULT_ENCODING: &str = "utf8";
pub const DEFAULT_MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    BinaryToStructured,
    StructuredToBinary,
}

impl FromStr for Mode {
    type Err = ConvertError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binarytojson" | "binarytostructured" | "binary-to-json" => Ok(Self::BinaryToStructured),
            "jsontobinary" | "structuredtobinary" | "json-to-binary" => Ok(Self::StructuredToBinary),
            _ => Err(ConvertError::UnknownMode {
                value: value.to_string(),
            }),
        }
    }
}

/// Converter options as they appear in configuration files and on the
/// command line. Fields that do not apply to the selected mode are ignored;
/// [`ConverterSettings::resolve`] turns them into a [`ConversionMode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    pub mode: String,
    pub set_all_data: bool,
    pub convert_all_data: bool,
    pub source_key: String,
    pub destination_key: String,
    pub encoding: String,
    pub json_parse: bool,
    pub use_raw_data: bool,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
    pub keep_source: bool,
    pub strip_bom: bool,
    pub keep_as_base64: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            mode: "binaryToJson".to_string(),
            set_all_data: true,
            convert_all_data: true,
            source_key: DEFAULT_KEY.to_string(),
            destination_key: DEFAULT_KEY.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            json_parse: false,
            use_raw_data: false,
            mime_type: None,
            file_name: None,
            keep_source: false,
            strip_bom: true,
            keep_as_base64: false,
        }
    }
}

/// How decoded payload text is stored under the destination key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHandling {
    Text,
    ParseJson,
    KeepBase64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredTarget {
    /// The parsed payload replaces the whole structured value.
    ReplaceAll,
    At { path: KeyPath, handling: TextHandling },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryToStructuredOptions {
    pub source_key: KeyPath,
    pub target: StructuredTarget,
    /// Resolved per record; unknown names fail the record, not the run.
    pub encoding: String,
    pub strip_bom: bool,
    pub keep_source: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredSource {
    All,
    At(KeyPath),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredToBinaryOptions {
    pub source: StructuredSource,
    pub destination_key: KeyPath,
    pub use_raw_data: bool,
    pub mime_type: String,
    pub file_name: Option<String>,
    pub keep_source: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMode {
    BinaryToStructured(BinaryToStructuredOptions),
    StructuredToBinary(StructuredToBinaryOptions),
}

impl ConversionMode {
    pub fn mode(&self) -> Mode {
        match self {
            Self::BinaryToStructured(_) => Mode::BinaryToStructured,
            Self::StructuredToBinary(_) => Mode::StructuredToBinary,
        }
    }
}

impl ConverterSettings {
    pub fn binary_to_json() -> Self {
        Self::default()
    }

    pub fn json_to_binary() -> Self {
        Self {
            mode: "jsonToBinary".to_string(),
            ..Self::default()
        }
    }

    pub fn resolve(&self) -> Result<ConversionMode> {
        match self.mode.parse::<Mode>()? {
            Mode::BinaryToStructured => {
                let target = if self.set_all_data {
                    StructuredTarget::ReplaceAll
                } else {
                    let handling = if self.keep_as_base64 {
                        TextHandling::KeepBase64
                    } else if self.json_parse {
                        TextHandling::ParseJson
                    } else {
                        TextHandling::Text
                    };
                    StructuredTarget::At {
                        path: validate_key_path("destination_key", &self.destination_key)?,
                        handling,
                    }
                };
                Ok(ConversionMode::BinaryToStructured(BinaryToStructuredOptions {
                    source_key: validate_key_path("source_key", &self.source_key)?,
                    target,
                    encoding: self.encoding.clone(),
                    strip_bom: self.strip_bom,
                    keep_source: self.keep_source,
                }))
            }
            Mode::StructuredToBinary => {
                let source = if self.convert_all_data {
                    StructuredSource::All
                } else {
                    StructuredSource::At(validate_key_path("source_key", &self.source_key)?)
                };
                let mime_type = self
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
                validate_non_empty_string("mime_type", &mime_type)?;
                Ok(ConversionMode::StructuredToBinary(StructuredToBinaryOptions {
                    source,
                    destination_key: validate_key_path("destination_key", &self.destination_key)?,
                    use_raw_data: self.use_raw_data,
                    mime_type,
                    file_name: self.file_name.clone(),
                    keep_source: self.keep_source,
                }))
            }
        }
    }
}

impl Validate for ConverterSettings {
    fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }
}
