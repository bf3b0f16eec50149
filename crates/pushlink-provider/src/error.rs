use thiserror::Error;

/// Errors produced by the provider client.
///
/// `Connect`, `Read`, `Closed` and `Decode` are connection-level: the stream
/// is unusable afterwards and a supervising layer must reconnect. The rest
/// abort only the reconciliation cycle they occurred in.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("websocket connect failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("websocket read failed: {0}")]
    Read(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("stream closed")]
    Closed,

    #[error("stream idle too long, assuming dead connection")]
    IdleTimeout,

    #[error("malformed stream frame: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("request to {resource} failed: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("no active subscription for channel {0}")]
    ChannelNotFound(String),

    #[error("failed to serialize push {iden}: {source}")]
    Serialize {
        iden: String,
        #[source]
        source: serde_json::Error,
    },
}
