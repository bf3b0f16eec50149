use time::OffsetDateTime;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use pushlink_provider::{
    RestClient, StreamConnection, StreamEvent, StreamEventSubtype, StreamEventType,
};

use crate::checkpoint::Checkpoint;
use crate::dispatch::DispatchMessage;
use crate::error::ConnectorError;

/// Bridges classified stream events to the dispatch queue.
///
/// Sole owner of the checkpoint: every mutation happens on the reader task
/// that drives `run`. On a pushes tickle it fetches everything modified
/// since the checkpoint, enqueues one message per resolved push, and only
/// then advances the checkpoint to the instant captured before the fetch.
pub struct DispatchBridge {
    rest: RestClient,
    checkpoint: Checkpoint,
    queue: mpsc::Sender<DispatchMessage>,
}

impl DispatchBridge {
    pub fn new(rest: RestClient, queue: mpsc::Sender<DispatchMessage>) -> Self {
        Self {
            rest,
            checkpoint: Checkpoint::now(),
            queue,
        }
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    /// Drain the connection until it fails or shutdown is signalled.
    ///
    /// Returns `Ok` on clean shutdown; a connection-level error propagates
    /// so a supervising layer can reconnect. Reconciliation failures only
    /// abort their own cycle.
    pub async fn run(
        &mut self,
        connection: &mut StreamConnection,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<(), ConnectorError> {
        loop {
            tokio::select! {
                biased;

                result = shutdown.changed() => {
                    match result {
                        Ok(()) if !*shutdown.borrow() => continue,
                        _ => {
                            info!("stream reader shutting down");
                            connection.close().await;
                            return Ok(());
                        }
                    }
                }

                event = connection.next_event() => {
                    match self.handle_event(&event?).await {
                        Ok(()) => {}
                        Err(e @ ConnectorError::QueueClosed) => {
                            connection.close().await;
                            return Err(e);
                        }
                        Err(e) => {
                            // Cycle failed: checkpoint untouched, the next
                            // tickle retries the same window
                            error!(error = %e, "reconciliation cycle failed");
                        }
                    }
                }
            }
        }
    }

    /// Classify one stream event. Only a pushes tickle triggers
    /// reconciliation; everything else is logged and dropped.
    pub async fn handle_event(&mut self, event: &StreamEvent) -> Result<(), ConnectorError> {
        match event.kind {
            StreamEventType::Nop => {
                debug!("heartbeat received");
            }
            StreamEventType::Push => {
                debug!(subtype = ?event.subtype, "ephemeral push ignored");
            }
            StreamEventType::Tickle => match event.subtype {
                Some(StreamEventSubtype::Push) => {
                    let forwarded = self.reconcile().await?;
                    if forwarded > 0 {
                        info!(count = forwarded, "reconciliation cycle complete");
                    }
                }
                other => {
                    debug!(subtype = ?other, "unsupported tickle resource ignored");
                }
            },
            StreamEventType::Unknown => {
                debug!("unsupported stream event ignored");
            }
        }
        Ok(())
    }

    async fn reconcile(&mut self) -> Result<usize, ConnectorError> {
        // Captured before the fetch so pushes modified mid-cycle fall into
        // the next window
        let cycle_start = OffsetDateTime::now_utc();

        let resolved = self
            .rest
            .resolved_pushes_since(self.checkpoint.unix_timestamp())
            .await?;
        let count = resolved.len();

        for item in &resolved {
            info!(topic = %item.topic, push = %item.push.iden, "forwarding push");
            let message = DispatchMessage::from_resolved(item);
            self.queue
                .send(message)
                .await
                .map_err(|_| ConnectorError::QueueClosed)?;
        }

        self.checkpoint.advance(cycle_start);
        Ok(count)
    }
}
