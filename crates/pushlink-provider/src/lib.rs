//! Pushbullet client for the pushlink connector: wire types, the REST
//! client used for checkpointed reconciliation, and the realtime stream
//! connection.

pub mod error;
pub mod rest;
pub mod stream;
pub mod types;

pub use error::ProviderError;
pub use rest::{DEFAULT_API_BASE, RestClient};
pub use stream::{DEFAULT_STREAM_BASE, StreamConnection};
pub use types::*;
