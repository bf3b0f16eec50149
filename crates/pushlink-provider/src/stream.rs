use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::error::ProviderError;
use crate::types::StreamEvent;

/// Default realtime endpoint base. The API token is appended as the final
/// path segment.
pub const DEFAULT_STREAM_BASE: &str = "wss://stream.pushbullet.com/websocket";

// The provider heartbeats roughly every 30s; a silent connection this long
// is dead and must be replaced.
const IDLE_TIMEOUT: Duration = Duration::from_secs(120);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A long-lived realtime connection producing a lazy, infinite,
/// non-restartable sequence of classified stream events.
///
/// Once `next_event` returns an error the connection is spent; callers
/// reconnect by constructing a new `StreamConnection`.
pub struct StreamConnection {
    socket: Option<Socket>,
}

impl StreamConnection {
    pub async fn connect(base_url: &str, token: &str) -> Result<Self, ProviderError> {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), token);
        let (socket, response) = connect_async(url).await.map_err(ProviderError::Connect)?;
        debug!(status = ?response.status(), "stream connected");

        Ok(Self {
            socket: Some(socket),
        })
    }

    /// Decode the next inbound frame into a stream event.
    ///
    /// Ping/pong and binary frames are transparent. A close frame, transport
    /// error, malformed frame, or idle timeout terminates the sequence.
    pub async fn next_event(&mut self) -> Result<StreamEvent, ProviderError> {
        let socket = self.socket.as_mut().ok_or(ProviderError::Closed)?;

        loop {
            let frame = tokio::time::timeout(IDLE_TIMEOUT, socket.next())
                .await
                .map_err(|_| ProviderError::IdleTimeout)?;
            match frame {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(&text).map_err(ProviderError::Decode);
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // tungstenite queues the pong reply itself
                    continue;
                }
                Some(Ok(Message::Binary(_) | Message::Frame(_))) => {
                    debug!("ignoring non-text stream frame");
                    continue;
                }
                Some(Ok(Message::Close(_))) | None => return Err(ProviderError::Closed),
                Some(Err(e)) => return Err(ProviderError::Read(e)),
            }
        }
    }

    /// Release the underlying connection. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None).await;
            debug!("stream connection closed");
        }
    }
}
