use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pushlink_provider::ResolvedPush;

use crate::config::Config;
use crate::error::ConnectorError;

/// Dedupe hint header: the push's globally-unique identifier, letting the
/// downstream recognize redelivery of the same logical push.
pub const MESSAGE_ID_HEADER: &str = "X-Message-Id";

/// Fixed origin marker identifying this pipeline as the message source.
pub const ORIGIN_HEADER: &str = "X-Connector";
pub const ORIGIN_VALUE: &str = "pushlink-connector";

/// One message handed across the reader/dispatcher boundary. Constructed
/// per resolved push, consumed exactly once.
#[derive(Debug, Clone)]
pub struct DispatchMessage {
    pub topic: String,
    pub message_id: String,
    pub payload: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl DispatchMessage {
    pub fn from_resolved(resolved: &ResolvedPush) -> Self {
        let message_id = resolved.push.guid.clone();
        let mut headers = HashMap::new();
        headers.insert(MESSAGE_ID_HEADER.to_string(), message_id.clone());
        headers.insert(ORIGIN_HEADER.to_string(), ORIGIN_VALUE.to_string());

        Self {
            topic: resolved.topic.clone(),
            message_id,
            payload: resolved.payload().to_vec(),
            headers,
        }
    }
}

/// Downstream invocation boundary. Topic-to-function routing, retries and
/// response handling live behind this trait.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn invoke(&self, message: &DispatchMessage) -> Result<(), ConnectorError>;
}

/// Invokes functions through an OpenFaaS-style gateway, addressing them by
/// topic at `/function/<topic>` (or `/async-function/<topic>`).
pub struct GatewayDispatcher {
    http: reqwest::Client,
    gateway: String,
    username: String,
    password: String,
    content_type: String,
    async_invoke: bool,
}

impl GatewayDispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway: config.gateway.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            content_type: config.content_type.clone(),
            async_invoke: config.async_invoke,
        }
    }

    fn invoke_url(&self, topic: &str) -> String {
        let route = if self.async_invoke {
            "async-function"
        } else {
            "function"
        };
        format!("{}/{}/{}", self.gateway, route, topic)
    }
}

#[async_trait]
impl Dispatcher for GatewayDispatcher {
    async fn invoke(&self, message: &DispatchMessage) -> Result<(), ConnectorError> {
        let mut request = self
            .http
            .post(self.invoke_url(&message.topic))
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", &self.content_type);

        for (key, value) in &message.headers {
            request = request.header(key, value);
        }

        let response = request
            .body(message.payload.clone())
            .send()
            .await
            .map_err(|source| ConnectorError::Invoke {
                topic: message.topic.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            info!(
                topic = %message.topic,
                message_id = %message.message_id,
                status = %status,
                "function invoked"
            );
            Ok(())
        } else {
            Err(ConnectorError::Gateway {
                topic: message.topic.clone(),
                status,
            })
        }
    }
}

/// Drain the hand-off queue and invoke downstream per message.
///
/// Invocation is fire-and-forget from the pipeline's perspective: failures
/// are logged, never propagated back to the reader. Runs until the sending
/// side is dropped, so pending messages drain on shutdown.
pub async fn run_dispatch_worker(
    mut queue: mpsc::Receiver<DispatchMessage>,
    dispatcher: Arc<dyn Dispatcher>,
) {
    while let Some(message) = queue.recv().await {
        if let Err(e) = dispatcher.invoke(&message).await {
            warn!(
                topic = %message.topic,
                message_id = %message.message_id,
                error = %e,
                "invocation failed"
            );
        }
    }
    debug!("dispatch queue drained");
}
