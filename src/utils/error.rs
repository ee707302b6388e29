use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unknown conversion mode: '{value}' (expected binaryToJson or jsonToBinary)")]
    UnknownMode { value: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parsing error: {message}")]
    ConfigParse { message: String },

    #[error("Structured data parse failure: {0}")]
    ParseFailure(#[source] serde_json::Error),

    #[error("Encoding failure ({encoding}): {reason}")]
    EncodingFailure { encoding: String, reason: String },

    #[error("record {index} failed: {source}")]
    RecordFailed {
        index: usize,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn encoding(encoding: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EncodingFailure {
            encoding: encoding.into(),
            reason: reason.into(),
        }
    }

    pub fn at_record(self, index: usize) -> Self {
        Self::RecordFailed {
            index,
            source: Box::new(self),
        }
    }

    /// Whether the error belongs to a single record rather than the whole run.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::ParseFailure(_) | Self::EncodingFailure { .. } | Self::RecordFailed { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownMode { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ConfigParse { .. } => ErrorCategory::Configuration,
            Self::ParseFailure(_) | Self::EncodingFailure { .. } | Self::Serialization(_) => {
                ErrorCategory::Data
            }
            Self::RecordFailed { source, .. } => source.category(),
            Self::Io(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UnknownMode { .. } => "Use mode = \"binaryToJson\" or mode = \"jsonToBinary\"",
            Self::InvalidConfigValue { .. } => {
                "Check the converter section of the configuration file and the CLI flags"
            }
            Self::ConfigParse { .. } => "Fix the TOML syntax of the configuration file",
            Self::ParseFailure(_) => {
                "Disable json_parse or make sure the binary payload holds valid JSON"
            }
            Self::EncodingFailure { .. } => {
                "Pick an encoding matching the payload (utf8, ascii, latin1, utf16le, base64, hex)"
            }
            Self::RecordFailed { source, .. } => source.recovery_suggestion(),
            Self::Io(_) => "Check that the input file exists and the output directory is writable",
            Self::Serialization(_) => "Make sure the input file is a JSON array of records",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::RecordFailed { index, source } => {
                format!("Record {} could not be converted: {}", index, source)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
