use crate::core::batch::{convert_batch, BatchOutcome};
use crate::core::{ConfigProvider, Record, Storage};
use crate::utils::error::Result;

/// Reads a batch of records from storage, converts it and writes the
/// surviving records back.
pub struct ConvertEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConvertEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub async fn run(&self, input_path: &str, output_path: &str) -> Result<BatchOutcome> {
        tracing::info!("Reading records from {}", input_path);
        let raw = self.storage.read_file(input_path).await?;
        let records: Vec<Record> = serde_json::from_slice(&raw)?;
        tracing::info!("Loaded {} records", records.len());

        let outcome = convert_batch(
            records,
            self.config.converter_settings(),
            self.config.error_policy(),
        )?;

        let output = serde_json::to_vec_pretty(&outcome.records)?;
        tracing::debug!("Writing {} bytes to {}", output.len(), output_path);
        self.storage.write_file(output_path, &output).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(outcome)
    }
}
