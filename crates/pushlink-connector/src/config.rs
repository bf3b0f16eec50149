use clap::Parser;

use pushlink_provider::{DEFAULT_API_BASE, DEFAULT_STREAM_BASE};

/// Connector configuration, from flags or environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "pushlink-connector")]
#[command(about = "Bridges Pushbullet channel pushes to OpenFaaS function invocations")]
#[command(version)]
pub struct Config {
    /// Gateway username
    #[arg(short = 'u', long, env = "PUSHLINK_GATEWAY_USER", default_value = "admin")]
    pub username: String,

    /// Gateway password
    #[arg(short = 'p', long, env = "PUSHLINK_GATEWAY_PASSWORD", default_value = "")]
    pub password: String,

    /// Gateway base URL
    #[arg(
        short = 'g',
        long,
        env = "PUSHLINK_GATEWAY",
        default_value = "http://127.0.0.1:8080"
    )]
    pub gateway: String,

    /// Pushbullet API token
    #[arg(long, env = "PUSHLINK_API_TOKEN")]
    pub api_token: String,

    /// Content type sent with each invocation
    #[arg(
        long,
        env = "PUSHLINK_CONTENT_TYPE",
        default_value = "application/json"
    )]
    pub content_type: String,

    /// Invoke via the gateway's async endpoint
    #[arg(long, env = "PUSHLINK_ASYNC_INVOKE")]
    pub async_invoke: bool,

    /// Capacity of the hand-off queue between the stream reader and the
    /// dispatch worker
    #[arg(long, env = "PUSHLINK_QUEUE_CAPACITY", default_value_t = 32)]
    pub queue_capacity: usize,

    /// Realtime stream endpoint base
    #[arg(
        long,
        env = "PUSHLINK_STREAM_URL",
        default_value = DEFAULT_STREAM_BASE,
        hide = true
    )]
    pub stream_url: String,

    /// REST endpoint base
    #[arg(
        long,
        env = "PUSHLINK_API_URL",
        default_value = DEFAULT_API_BASE,
        hide = true
    )]
    pub api_url: String,
}
