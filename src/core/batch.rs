use crate::config::converter::ConverterSettings;
use crate::core::converter::{describe_source, Converted, Converter};
use crate::domain::model::Record;
use crate::utils::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// What to do when a single record fails to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failing record and return its error.
    #[default]
    Halt,
    /// Record the failure and carry on with the next record.
    Continue,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<Record>,
    /// Input indices of records that had nothing at the source location.
    pub dropped: Vec<usize>,
    /// `ConvertError::RecordFailed` entries, in input order.
    pub failures: Vec<ConvertError>,
}

impl BatchOutcome {
    pub fn converted_count(&self) -> usize {
        self.records.len()
    }
}

impl Converter {
    pub fn convert_batch(&self, records: Vec<Record>, policy: ErrorPolicy) -> Result<BatchOutcome> {
        let total = records.len();
        let mut outcome = BatchOutcome {
            records: Vec::with_capacity(total),
            ..BatchOutcome::default()
        };

        for (index, record) in records.into_iter().enumerate() {
            match self.convert(record) {
                Ok(Converted::Record(converted)) => outcome.records.push(converted),
                Ok(Converted::Dropped) => {
                    tracing::debug!("Record {} has no data at {}, dropped", index, describe_source(self.mode()));
                    outcome.dropped.push(index);
                }
                Err(e) => {
                    let failure = e.at_record(index);
                    match policy {
                        ErrorPolicy::Halt => {
                            tracing::error!("{}", failure);
                            return Err(failure);
                        }
                        ErrorPolicy::Continue => {
                            tracing::warn!("{}", failure);
                            outcome.failures.push(failure);
                        }
                    }
                }
            }
        }

        if !outcome.dropped.is_empty() {
            tracing::warn!(
                "{} of {} records had no data at {} and were dropped",
                outcome.dropped.len(),
                total,
                describe_source(self.mode())
            );
        }
        tracing::info!(
            "Converted {} records ({} dropped, {} failed)",
            outcome.converted_count(),
            outcome.dropped.len(),
            outcome.failures.len()
        );

        Ok(outcome)
    }
}

/// Resolves `settings` once and converts every record. Configuration errors
/// such as an unknown mode abort before any record is looked at.
pub fn convert_batch(
    records: Vec<Record>,
    settings: &ConverterSettings,
    policy: ErrorPolicy,
) -> Result<BatchOutcome> {
    let converter = Converter::from_settings(settings)?;
    tracing::debug!("Resolved converter mode: {:?}", converter.mode().mode());
    converter.convert_batch(records, policy)
}
