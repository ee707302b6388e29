use crate::config::converter::ConverterSettings;
use crate::core::batch::ErrorPolicy;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn converter_settings(&self) -> &ConverterSettings;
    fn error_policy(&self) -> ErrorPolicy;
}
