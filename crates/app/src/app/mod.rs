use crate::config::Secrets;
use crate::error::Result;
use crate::services::AppServices;

pub use crate::config::AppConfig;

/// Application state handed to the presentation shell.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    /// Reads the secrets file once and wires the report service.
    pub fn load(config: AppConfig) -> Result<Self> {
        let secrets = Secrets::load(&config.secrets_path)?;
        let services = AppServices::new(&config, secrets);
        Ok(Self { config, services })
    }

    pub fn from_env() -> Result<Self> {
        Self::load(AppConfig::from_env())
    }
}
