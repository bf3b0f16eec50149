use thiserror::Error;

use pushlink_provider::ProviderError;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("dispatch queue closed")]
    QueueClosed,

    #[error("invoking {topic} failed: {source}")]
    Invoke {
        topic: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("gateway rejected invocation for {topic}: {status}")]
    Gateway {
        topic: String,
        status: reqwest::StatusCode,
    },
}
