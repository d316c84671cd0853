//! X-Booker delegated API sample
//!
//! Single-binary walkthrough of the delegated-app flow:
//! 1. Loads credentials from `.env`, environment, and optional TOML config
//! 2. Exchanges them for a refresh token, then an access token
//! 3. Calls one delegated API resource (default `GET /organization`)
//! 4. Prints the response `data` as pretty JSON

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use delegated_client::{DelegatedApiClient, HttpTransport, Method};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const DEFAULT_RESOURCE_PATH: &str = "/organization";

/// Command-line arguments
#[derive(Debug, PartialEq)]
struct Args {
    config: Option<String>,
    path: String,
    method: Method,
    body: Option<Value>,
}

impl Args {
    /// Simple `--flag value` parsing; unknown flags are ignored. A known flag
    /// without a value is an error.
    fn parse(args: &[String]) -> Result<Self> {
        let flag = |name: &str| -> Result<Option<String>> {
            let Some(i) = args.iter().position(|a| a == name) else {
                return Ok(None);
            };
            match args.get(i + 1) {
                Some(value) if !value.starts_with("--") => Ok(Some(value.clone())),
                _ => anyhow::bail!("{name} requires a value"),
            }
        };

        let method = match flag("--method")? {
            Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid --method {m}"))?,
            None => Method::GET,
        };

        let body = flag("--body")?
            .map(|b| serde_json::from_str(&b).context("--body must be valid JSON"))
            .transpose()?;

        Ok(Self {
            config: flag("--config")?,
            path: flag("--path")?.unwrap_or_else(|| DEFAULT_RESOURCE_PATH.to_string()),
            method,
            body,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the subscriber so LOG_LEVEL can come from it
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => info!("no .env file, using process environment"),
        Err(e) => return Err(e).context("failed to read .env"),
    }

    let argv: Vec<String> = std::env::args().collect();
    let args = Args::parse(&argv)?;

    let config_path = Config::resolve_path(args.config.as_deref());
    match &config_path {
        Some(path) => info!(path = %path.display(), "loading configuration"),
        None => info!("no config file, using defaults and environment"),
    }

    let config = Config::load(config_path.as_deref()).context("failed to load configuration")?;

    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        method = %args.method,
        path = %args.path,
        "configuration loaded"
    );

    let data = run(&config, &args).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Run the full exchange and return the resource `data`.
async fn run(config: &Config, args: &Args) -> Result<Value> {
    let credentials = config
        .credentials
        .resolve()
        .context("delegated app credentials are incomplete")?;
    let transport =
        HttpTransport::with_timeout(config.api.timeout()).context("failed to build transport")?;

    let mut client = DelegatedApiClient::new(credentials, Arc::new(transport))
        .with_endpoints(config.api.endpoints());

    client
        .acquire_refresh_token()
        .await
        .context("failed to acquire refresh token")?;
    info!("refresh token acquired");

    client
        .acquire_access_token()
        .await
        .context("failed to acquire access token")?;
    info!("access token acquired");

    let data = client
        .request::<Value, Value>(args.method.clone(), &args.path, args.body.as_ref())
        .await
        .with_context(|| format!("{} {} failed", args.method, args.path))?;

    Ok(data)
}
