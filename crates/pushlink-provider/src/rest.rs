use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ProviderError;
use crate::types::{Channel, Pushes, ResolvedPush, Subscriptions};

/// Default REST endpoint base.
pub const DEFAULT_API_BASE: &str = "https://api.pushbullet.com/v2";

const ACCESS_TOKEN_HEADER: &str = "Access-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the provider's REST resources: channel resolution against the
/// subscriptions resource and checkpointed fetches against the pushes
/// resource.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        resource: &'static str,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let response = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { resource, source })?
            .error_for_status()
            .map_err(|source| ProviderError::Transport { resource, source })?;

        response
            .json::<T>()
            .await
            .map_err(|source| ProviderError::Transport { resource, source })
    }

    /// Resolve a channel iden to its channel by scanning active
    /// subscriptions. First match wins, in resource-returned order.
    ///
    /// `ChannelNotFound` is an expected outcome (e.g. a since-unsubscribed
    /// channel), not a transport failure.
    pub async fn active_channel(&self, channel_iden: &str) -> Result<Channel, ProviderError> {
        let subscriptions: Subscriptions =
            self.get_json("/subscriptions", "subscriptions").await?;

        subscriptions
            .subscriptions
            .into_iter()
            .find(|s| s.active && s.channel.iden == channel_iden)
            .map(|s| s.channel)
            .ok_or_else(|| ProviderError::ChannelNotFound(channel_iden.to_string()))
    }

    /// Fetch every push modified after the given unix timestamp and pair
    /// each channelized push with its resolved topic tag.
    ///
    /// Pushes without a channel are skipped. A resolution failure fails the
    /// whole cycle: no partial batch is ever returned. Order is preserved as
    /// the resource returned it.
    pub async fn resolved_pushes_since(
        &self,
        since_epoch_secs: i64,
    ) -> Result<Vec<ResolvedPush>, ProviderError> {
        let pushes: Pushes = self
            .get_json(
                &format!("/pushes?modified_after={since_epoch_secs}"),
                "pushes",
            )
            .await?;

        let mut resolved = Vec::new();
        for push in pushes.pushes {
            let Some(channel_iden) = push.channel_iden.clone() else {
                debug!(push = %push.iden, "skipping push without channel");
                continue;
            };

            let channel = self.active_channel(&channel_iden).await?;
            let iden = push.iden.clone();
            resolved.push(
                ResolvedPush::new(push, channel.tag)
                    .map_err(|source| ProviderError::Serialize { iden, source })?,
            );
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "test-token";

    fn subscriptions_body() -> serde_json::Value {
        json!({
            "subscriptions": [
                {
                    "iden": "sub-0",
                    "active": false,
                    "created": 1712000000.0,
                    "modified": 1712000000.0,
                    "channel": {"iden": "chan1", "tag": "stale", "name": "Stale"}
                },
                {
                    "iden": "sub-1",
                    "active": true,
                    "created": 1712000000.0,
                    "modified": 1712000000.0,
                    "channel": {"iden": "chan1", "tag": "garden", "name": "Garden"}
                },
                {
                    "iden": "sub-2",
                    "active": true,
                    "created": 1712000000.0,
                    "modified": 1712000000.0,
                    "channel": {"iden": "chan2", "tag": "kitchen", "name": "Kitchen"}
                }
            ]
        })
    }

    async fn mount_subscriptions(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(header(ACCESS_TOKEN_HEADER, TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(subscriptions_body()))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> RestClient {
        RestClient::new(server.uri(), TOKEN).expect("client builds")
    }

    #[tokio::test]
    async fn active_channel_returns_first_active_match() {
        let server = MockServer::start().await;
        mount_subscriptions(&server).await;

        let channel = client(&server)
            .active_channel("chan1")
            .await
            .expect("chan1 resolves");
        // The inactive sub-0 binding for chan1 is skipped
        assert_eq!(channel.tag, "garden");
        assert_eq!(channel.iden, "chan1");
    }

    #[tokio::test]
    async fn active_channel_reports_not_found() {
        let server = MockServer::start().await;
        mount_subscriptions(&server).await;

        let err = client(&server)
            .active_channel("chanX")
            .await
            .expect_err("chanX has no active subscription");
        assert!(matches!(err, ProviderError::ChannelNotFound(ref iden) if iden == "chanX"));
    }

    #[tokio::test]
    async fn fetch_pairs_channelized_pushes_with_tags() {
        let server = MockServer::start().await;
        mount_subscriptions(&server).await;
        Mock::given(method("GET"))
            .and(path("/pushes"))
            .and(query_param("modified_after", "1712000000"))
            .and(header(ACCESS_TOKEN_HEADER, TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pushes": [
                    {"iden": "p1", "active": true, "type": "note", "guid": "g1",
                     "body": "first", "channel_iden": "chan1"},
                    {"iden": "p2", "active": true, "type": "link", "guid": "g2",
                     "url": "https://example.com", "channel_iden": "chan2"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resolved = client(&server)
            .resolved_pushes_since(1712000000)
            .await
            .expect("cycle succeeds");

        assert_eq!(resolved.len(), 2);
        // Resource order is preserved
        assert_eq!(resolved[0].push.iden, "p1");
        assert_eq!(resolved[0].topic, "garden");
        assert_eq!(resolved[1].push.iden, "p2");
        assert_eq!(resolved[1].topic, "kitchen");
    }

    #[tokio::test]
    async fn fetch_skips_pushes_without_channel() {
        let server = MockServer::start().await;
        mount_subscriptions(&server).await;
        Mock::given(method("GET"))
            .and(path("/pushes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pushes": [
                    {"iden": "p1", "active": true, "type": "note", "guid": "g1",
                     "body": "direct push"},
                    {"iden": "p2", "active": true, "type": "note", "guid": "g2",
                     "body": "channel push", "channel_iden": "chan1"}
                ]
            })))
            .mount(&server)
            .await;

        let resolved = client(&server)
            .resolved_pushes_since(0)
            .await
            .expect("cycle succeeds");

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].push.iden, "p2");
    }

    #[tokio::test]
    async fn fetch_fails_fast_when_any_channel_is_unresolvable() {
        let server = MockServer::start().await;
        mount_subscriptions(&server).await;
        Mock::given(method("GET"))
            .and(path("/pushes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pushes": [
                    {"iden": "p1", "active": true, "type": "note", "guid": "g1",
                     "channel_iden": "chan1"},
                    {"iden": "p2", "active": true, "type": "note", "guid": "g2",
                     "channel_iden": "chanX"}
                ]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .resolved_pushes_since(0)
            .await
            .expect_err("unresolvable channel fails the cycle");
        assert!(matches!(err, ProviderError::ChannelNotFound(ref iden) if iden == "chanX"));
    }

    #[tokio::test]
    async fn fetch_with_no_pushes_is_valid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pushes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pushes": []})))
            .mount(&server)
            .await;

        let resolved = client(&server)
            .resolved_pushes_since(0)
            .await
            .expect("empty cycle succeeds");
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn rest_failure_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pushes"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server)
            .resolved_pushes_since(0)
            .await
            .expect_err("server error aborts the cycle");
        assert!(matches!(
            err,
            ProviderError::Transport {
                resource: "pushes",
                ..
            }
        ));
    }
}
