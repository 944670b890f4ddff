use std::path::{Path, PathBuf};

use report_core::Credentials;
use serde::Deserialize;

use crate::error::{AppError, Result};

pub const SECRETS_PATH_ENV: &str = "REPORT_SECRETS_PATH";
pub const S3_ENDPOINT_ENV: &str = "REPORT_S3_ENDPOINT_URL";
pub const LOCAL_ROOT_ENV: &str = "REPORT_LOCAL_ROOT";
const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Where report objects are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3 { endpoint_url: Option<String> },
    /// Bucket `b` is the directory `<root>/b`.
    Local { root: PathBuf },
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::S3 { endpoint_url: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub secrets_path: PathBuf,
    pub storage: StorageBackend,
}

impl AppConfig {
    pub fn new(secrets_path: PathBuf, storage: StorageBackend) -> Self {
        Self {
            secrets_path,
            storage,
        }
    }

    pub fn from_env() -> Self {
        let storage = if let Ok(root) = std::env::var(LOCAL_ROOT_ENV) {
            StorageBackend::Local {
                root: PathBuf::from(root),
            }
        } else {
            StorageBackend::S3 {
                endpoint_url: std::env::var(S3_ENDPOINT_ENV).ok(),
            }
        };
        Self::new(default_secrets_path(), storage)
    }
}

pub fn default_secrets_path() -> PathBuf {
    if let Ok(path) = std::env::var(SECRETS_PATH_ENV) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_SECRETS_FILE)
}

/// Contents of the secrets file. Keys are looked up when a session connects.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub aws: AwsSecrets,
}

#[derive(Clone, Default, Deserialize)]
pub struct AwsSecrets {
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: Option<String>,
    pub s3_bucket_name: Option<String>,
}

impl std::fmt::Debug for AwsSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecrets")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field(
                "aws_secret_access_key",
                &self.aws_secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("aws_region", &self.aws_region)
            .field("s3_bucket_name", &self.s3_bucket_name)
            .finish()
    }
}

impl Secrets {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads the secrets file; a missing file reads as empty secrets.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "secrets file not found");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let aws = &self.aws;
        Ok(Credentials {
            access_key_id: require(&aws.aws_access_key_id, "aws_access_key_id")?,
            secret_access_key: require(&aws.aws_secret_access_key, "aws_secret_access_key")?,
            region: require(&aws.aws_region, "aws_region")?,
            bucket: require(&aws.s3_bucket_name, "s3_bucket_name")?,
        })
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| AppError::Config(format!("missing secret aws.{}", key)))
}
