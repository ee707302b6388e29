use crate::config::converter::{
    BinaryToStructuredOptions, ConversionMode, ConverterSettings, StructuredSource,
    StructuredTarget, StructuredToBinaryOptions, TextHandling,
};
use crate::domain::model::{BinaryEntry, BinaryMap, BinaryPayload, Record};
use crate::utils::encoding::{decode_base64, encode_base64, strip_bom, TextEncoding};
use crate::utils::error::{ConvertError, Result};
use crate::utils::path;
use serde_json::{Map, Value};

/// Result of converting one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Record(Record),
    /// The record had nothing at the source location and is left out of the
    /// output batch.
    Dropped,
}

impl Converted {
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Dropped => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Converter {
    mode: ConversionMode,
}

impl Converter {
    pub fn new(mode: ConversionMode) -> Self {
        Self { mode }
    }

    pub fn from_settings(settings: &ConverterSettings) -> Result<Self> {
        Ok(Self::new(settings.resolve()?))
    }

    pub fn mode(&self) -> &ConversionMode {
        &self.mode
    }

    /// Converts a record it takes ownership of. The side that is kept
    /// unchanged is moved into the output untouched; the consumed side is
    /// edited in place.
    pub fn convert(&self, record: Record) -> Result<Converted> {
        match &self.mode {
            ConversionMode::BinaryToStructured(options) => binary_to_structured(options, record),
            ConversionMode::StructuredToBinary(options) => structured_to_binary(options, record),
        }
    }
}

fn binary_to_structured(options: &BinaryToStructuredOptions, record: Record) -> Result<Converted> {
    let Record { structured, binary } = record;
    let Some(binary) = binary else {
        tracing::debug!("No binary data on record, dropping");
        return Ok(Converted::Dropped);
    };
    let mut binary_tree = BinaryEntry::Group(binary);

    let payload = match path::get(&binary_tree, &options.source_key) {
        Some(BinaryEntry::Payload(payload)) => payload,
        _ => {
            tracing::debug!("No binary payload at '{}', dropping", options.source_key);
            return Ok(Converted::Dropped);
        }
    };

    let structured = match &options.target {
        StructuredTarget::ReplaceAll => {
            let text = decode_payload_text(payload, options)?;
            serde_json::from_str(&text).map_err(ConvertError::ParseFailure)?
        }
        StructuredTarget::At { path: destination, handling } => {
            let value = match handling {
                TextHandling::KeepBase64 => Value::String(payload.data.clone()),
                TextHandling::ParseJson => {
                    let text = decode_payload_text(payload, options)?;
                    serde_json::from_str(&text).map_err(ConvertError::ParseFailure)?
                }
                TextHandling::Text => Value::String(decode_payload_text(payload, options)?),
            };
            let mut structured = structured;
            path::set(&mut structured, destination, value);
            structured
        }
    };

    if !options.keep_source {
        path::unset(&mut binary_tree, &options.source_key);
    }

    Ok(Converted::Record(Record {
        structured,
        binary: Some(into_binary_map(binary_tree)),
    }))
}

fn decode_payload_text(payload: &BinaryPayload, options: &BinaryToStructuredOptions) -> Result<String> {
    let bytes = decode_base64(&payload.data)?;
    let text = TextEncoding::from_name(&options.encoding)?.decode(&bytes)?;
    if options.strip_bom {
        Ok(strip_bom(&text).to_string())
    } else {
        Ok(text)
    }
}

fn structured_to_binary(options: &StructuredToBinaryOptions, record: Record) -> Result<Converted> {
    let Record {
        mut structured,
        binary,
    } = record;

    let source_value = match &options.source {
        StructuredSource::All => Some(&structured),
        StructuredSource::At(source_key) => path::get(&structured, source_key),
    };
    let Some(source_value) = source_value else {
        tracing::debug!("No structured value at source key, dropping");
        return Ok(Converted::Dropped);
    };

    let bytes = if options.use_raw_data {
        raw_bytes(source_value)?
    } else {
        serde_json::to_vec(source_value)?
    };

    let mut payload = BinaryPayload::new(encode_base64(&bytes), options.mime_type.clone());
    if let Some(file_name) = &options.file_name {
        payload = payload.with_file_name(file_name.clone());
    }

    let mut binary_tree = BinaryEntry::Group(binary.unwrap_or_default());
    path::set(&mut binary_tree, &options.destination_key, BinaryEntry::Payload(payload));

    if !options.keep_source {
        match &options.source {
            StructuredSource::All => structured = Value::Object(Map::new()),
            StructuredSource::At(source_key) => {
                path::unset(&mut structured, source_key);
            }
        }
    }

    Ok(Converted::Record(Record {
        structured,
        binary: Some(into_binary_map(binary_tree)),
    }))
}

/// Bytes of a value used verbatim: strings contribute their UTF-8 bytes and
/// sequences of small integers are taken as a byte array.
fn raw_bytes(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(text) => Ok(text.as_bytes().to_vec()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| raw_data_error(item))
            })
            .collect(),
        other => Err(raw_data_error(other)),
    }
}

fn raw_data_error(value: &Value) -> ConvertError {
    ConvertError::encoding(
        "raw",
        format!("value {} is not byte-representable", value),
    )
}

fn into_binary_map(tree: BinaryEntry) -> BinaryMap {
    match tree {
        BinaryEntry::Group(entries) => entries,
        BinaryEntry::Payload(_) => BinaryMap::new(),
    }
}

/// Source key as seen by log lines and reports.
pub fn describe_source(mode: &ConversionMode) -> String {
    match mode {
        ConversionMode::BinaryToStructured(options) => format!("binary.{}", options.source_key),
        ConversionMode::StructuredToBinary(options) => match &options.source {
            StructuredSource::All => "json".to_string(),
            StructuredSource::At(source_key) => format!("json.{}", source_key),
        },
    }
}
