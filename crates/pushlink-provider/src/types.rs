use serde::{Deserialize, Serialize};

/// Event kind delivered over the realtime stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventType {
    /// Liveness ping, no further action
    Nop,
    /// A resource changed server-side, go re-fetch
    Tickle,
    /// In-band push without a durable counterpart
    Push,
    #[serde(other)]
    Unknown,
}

/// Which resource a tickle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventSubtype {
    /// A change to the /v2/pushes resource
    Push,
    /// A change to the /v2/devices resource - not supported
    Device,
    #[serde(other)]
    Unknown,
}

/// A single decoded stream frame. Constructed per frame, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub kind: StreamEventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<StreamEventSubtype>,
}

/// Response envelope for GET /subscriptions.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriptions {
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub iden: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created: f64,
    #[serde(default)]
    pub modified: f64,
    #[serde(default)]
    pub channel: Channel,
}

/// A named broadcast target. `tag` is the logical topic used for dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Channel {
    pub iden: String,
    pub tag: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushKind {
    #[default]
    Note,
    Link,
}

/// Response envelope for GET /pushes.
#[derive(Debug, Clone, Deserialize)]
pub struct Pushes {
    pub pushes: Vec<Push>,
}

/// A single push record as returned by the pushes resource.
///
/// Timestamps are fractional unix seconds, as on the wire. Deleted pushes
/// arrive with most fields absent; everything except `iden` defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Push {
    pub iden: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created: f64,
    #[serde(default)]
    pub modified: f64,
    #[serde(rename = "type", default)]
    pub kind: PushKind,
    #[serde(default)]
    pub dismissed: bool,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub sender_iden: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_email_normalized: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub receiver_iden: String,
    #[serde(default)]
    pub receiver_email: String,
    #[serde(default)]
    pub receiver_email_normalized: String,
    #[serde(default)]
    pub target_device_iden: String,
    #[serde(default)]
    pub source_device_iden: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_iden: Option<String>,
}

/// A push paired with its resolved topic tag.
///
/// The payload is the push's canonical JSON encoding, computed exactly once
/// at construction and never recomputed.
#[derive(Debug, Clone)]
pub struct ResolvedPush {
    pub push: Push,
    pub topic: String,
    payload: Vec<u8>,
}

impl ResolvedPush {
    pub fn new(push: Push, topic: String) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_vec(&push)?;
        Ok(Self {
            push,
            topic,
            payload,
        })
    }

    /// The serialized payload. Idempotent: always returns the same bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
