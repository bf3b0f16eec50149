use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use pushlink_provider::StreamConnection;

use crate::bridge::DispatchBridge;
use crate::error::ConnectorError;

const BACKOFF_CAP: Duration = Duration::from_secs(60);

/// Reconnect-with-backoff loop around connect+read.
///
/// The bridge (and with it the checkpoint) outlives every connection, so
/// after an outage the next cycle re-fetches everything modified since the
/// last successful one: nothing in the gap is lost, redelivery across it is
/// possible and left to the downstream dedupe hint.
pub async fn run_supervised(
    stream_url: &str,
    api_token: &str,
    bridge: &mut DispatchBridge,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ConnectorError> {
    let mut attempt: u32 = 0;

    loop {
        if *shutdown.borrow() {
            return Ok(());
        }

        match StreamConnection::connect(stream_url, api_token).await {
            Ok(mut connection) => {
                attempt = 0;
                info!("stream connected");

                match bridge.run(&mut connection, &mut shutdown).await {
                    Ok(()) => return Ok(()),
                    Err(ConnectorError::Provider(e)) => {
                        warn!(error = %e, "stream connection lost");
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => {
                warn!(error = %e, "stream connect failed");
            }
        }

        attempt += 1;
        let delay = backoff_delay(attempt);
        info!(attempt, delay_secs = delay.as_secs(), "reconnecting after backoff");

        tokio::select! {
            biased;
            _ = shutdown.changed() => {}
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// 1s doubling per attempt, capped at 60s.
fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(6);
    Duration::min(Duration::from_secs(1 << exp), BACKOFF_CAP)
}
