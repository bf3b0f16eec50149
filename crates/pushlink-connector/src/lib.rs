//! Connector core: the checkpointed dispatch bridge between the provider's
//! realtime stream and the function gateway.

pub mod bridge;
pub mod checkpoint;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod supervisor;

pub use bridge::DispatchBridge;
pub use checkpoint::Checkpoint;
pub use config::Config;
pub use dispatch::{
    DispatchMessage, Dispatcher, GatewayDispatcher, MESSAGE_ID_HEADER, ORIGIN_HEADER,
    ORIGIN_VALUE, run_dispatch_worker,
};
pub use error::ConnectorError;
