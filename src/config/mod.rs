pub mod converter;
pub mod toml_config;

use crate::config::converter::ConverterSettings;
use crate::config::toml_config::TomlConfig;
use crate::core::batch::ErrorPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use crate::utils::validation::validate_path;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "move-binary-data")]
#[command(about = "Move data between the binary and JSON sides of a batch of records")]
pub struct CliConfig {
    #[arg(long, help = "JSON file holding an array of records")]
    pub input: String,

    #[arg(long, help = "Where to write the converted records")]
    pub output: String,

    #[arg(long, help = "TOML configuration file; flags below override it")]
    pub config: Option<String>,

    #[arg(long, help = "binaryToJson or jsonToBinary")]
    pub mode: Option<String>,

    #[arg(long, help = "Convert the whole opposite side instead of a single key")]
    pub all_data: Option<bool>,

    #[arg(long)]
    pub source_key: Option<String>,

    #[arg(long)]
    pub destination_key: Option<String>,

    #[arg(long, help = "Text encoding of binary payloads")]
    pub encoding: Option<String>,

    #[arg(long, help = "Mime type of produced payloads")]
    pub mime_type: Option<String>,

    #[arg(long, help = "File name stored on produced payloads")]
    pub file_name: Option<String>,

    #[arg(long, help = "Parse decoded payload text as JSON")]
    pub json_parse: bool,

    #[arg(long, help = "Write the source value verbatim instead of as JSON text")]
    pub use_raw_data: bool,

    #[arg(long, help = "Leave the source data in place")]
    pub keep_source: bool,

    #[arg(long, help = "Store payload data as base64 text without decoding")]
    pub keep_as_base64: bool,

    #[arg(long, help = "Keep a leading byte order mark in decoded text")]
    pub no_strip_bom: bool,

    #[arg(long, help = "Skip records that fail instead of stopping")]
    pub continue_on_fail: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

/// Effective settings for one run: file configuration with command line
/// overrides applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    pub settings: ConverterSettings,
    pub policy: ErrorPolicy,
}

impl From<TomlConfig> for RunConfig {
    fn from(config: TomlConfig) -> Self {
        Self {
            settings: config.converter,
            policy: config.batch.on_error,
        }
    }
}

impl ConfigProvider for RunConfig {
    fn converter_settings(&self) -> &ConverterSettings {
        &self.settings
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn to_run_config(&self) -> Result<RunConfig> {
        let mut run = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                RunConfig::from(TomlConfig::from_file(path)?)
            }
            None => RunConfig::default(),
        };
        self.apply_overrides(&mut run);
        run.validate()?;
        Ok(run)
    }

    fn apply_overrides(&self, run: &mut RunConfig) {
        let settings = &mut run.settings;
        if let Some(mode) = &self.mode {
            settings.mode = mode.clone();
        }
        if let Some(all_data) = self.all_data {
            settings.set_all_data = all_data;
            settings.convert_all_data = all_data;
        }
        if let Some(source_key) = &self.source_key {
            settings.source_key = source_key.clone();
        }
        if let Some(destination_key) = &self.destination_key {
            settings.destination_key = destination_key.clone();
        }
        if let Some(encoding) = &self.encoding {
            settings.encoding = encoding.clone();
        }
        if let Some(mime_type) = &self.mime_type {
            settings.mime_type = Some(mime_type.clone());
        }
        if let Some(file_name) = &self.file_name {
            settings.file_name = Some(file_name.clone());
        }
        settings.json_parse |= self.json_parse;
        settings.use_raw_data |= self.use_raw_data;
        settings.keep_source |= self.keep_source;
        settings.keep_as_base64 |= self.keep_as_base64;
        if self.no_strip_bom {
            settings.strip_bom = false;
        }
        if self.continue_on_fail {
            run.policy = ErrorPolicy::Continue;
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output", &self.output)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}
