use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{context}. Error: {source}")]
    SourceRead {
        context: String,
        #[source]
        source: ingest::IngestError,
    },
    #[error("ingest error: {0}")]
    Ingest(#[from] ingest::IngestError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("secrets parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// User-visible form of a failed report load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let code = match err {
            AppError::InvalidInput(_) => Some("invalid_input".to_string()),
            AppError::Config(_) | AppError::Toml(_) => Some("config".to_string()),
            AppError::SourceRead { .. } | AppError::Ingest(_) => Some("source_read".to_string()),
            AppError::Io(_) => None,
        };
        Self {
            message: err.to_string(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_category_code() {
        let cases = [
            (AppError::InvalidInput("bad".to_string()), Some("invalid_input")),
            (AppError::Config("missing".to_string()), Some("config")),
            (
                AppError::SourceRead {
                    context: "could not read".to_string(),
                    source: ingest::IngestError::Storage("down".to_string()),
                },
                Some("source_read"),
            ),
            (
                AppError::Io(std::io::Error::other("disk")),
                None,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError::from(err).code.as_deref(), code);
        }
    }

    #[test]
    fn source_read_message_keeps_context_and_cause() {
        let err = AppError::SourceRead {
            context: "could not read the employee info files".to_string(),
            source: ingest::IngestError::Storage("down".to_string()),
        };
        let api = ApiError::from(err);
        assert!(api.message.starts_with("could not read the employee info files. Error: "));
        assert!(api.message.contains("down"));
    }
}
