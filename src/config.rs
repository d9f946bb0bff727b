// src/config.rs
use crate::constants::{DEFAULT_FETCH_DEPTH, IMAGE_RETRY_DELAY_MS, IMAGE_RETRY_MAX};
use crate::error::AppError;
use crate::images::RetryPolicy;
use crate::types::ApiKey;
use clap::Parser;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Maximum recursion depth when fetching block children
    #[arg(long, default_value_t = DEFAULT_FETCH_DEPTH)]
    pub depth: usize,

    /// Timeout for each outbound request, in seconds
    #[arg(long, default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    /// Client-side retry attempts emitted on proxied images
    #[arg(long, default_value_t = IMAGE_RETRY_MAX)]
    pub retry_max: u32,

    /// Delay between client-side image retries, in milliseconds
    #[arg(long, default_value_t = IMAGE_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved service configuration — validated and ready to serve.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub api_key: ApiKey,
    pub depth: usize,
    pub fetch_timeout: Duration,
    pub retry: RetryPolicy,
    pub verbose: bool,
}

impl ServiceConfig {
    /// Resolves a complete service configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let api_key = ApiKey::new(api_key_str)?;

        Ok(ServiceConfig {
            host: cli.host,
            port: cli.port,
            api_key,
            depth: cli.depth,
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
            retry: RetryPolicy {
                max_attempts: cli.retry_max,
                delay_ms: cli.retry_delay_ms,
            },
            verbose: cli.verbose,
        })
    }
}
