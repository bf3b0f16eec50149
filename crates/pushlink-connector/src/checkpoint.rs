use time::OffsetDateTime;

/// Timestamp boundary for "what changed since last time" queries.
///
/// Owned exclusively by the stream reader; never shared across tasks.
/// Advanced only after a reconciliation cycle completes, so a failed cycle
/// is retried over the same window on the next tickle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(OffsetDateTime);

impl Checkpoint {
    /// Start at the current instant: only pushes modified after process
    /// start are ever fetched.
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Move the checkpoint forward. A backward `to` is a no-op: the value
    /// never decreases.
    pub fn advance(&mut self, to: OffsetDateTime) {
        if to > self.0 {
            self.0 = to;
        }
    }

    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}
