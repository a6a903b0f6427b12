#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("ConfigError: {0}")]
    ConfigError(String),

    /// STS call failed; `operation` names what we were trying to do.
    #[error("{operation}: {source}")]
    ProviderError {
        operation: String,
        #[source]
        source: crate::sts::Error,
    },

    #[error("EncodingError: {0}")]
    EncodingError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn provider(operation: impl Into<String>, source: crate::sts::Error) -> Self {
        Error::ProviderError {
            operation: operation.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
