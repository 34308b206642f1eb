//! cronlytic-mcp - stdio front end for the Cronlytic job operations
//!
//! Reads one JSON request per stdin line, runs requests concurrently, and
//! writes one JSON response per stdout line. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use cronlytic_api::{handle_line, AppContext};
use cronlytic_infra::api::JobCacheConfig;
use cronlytic_infra::{ApiClientConfig, ConfigOverrides, Jitter};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// Cronlytic job operations over line-delimited JSON.
#[derive(Parser)]
#[command(name = "cronlytic-mcp")]
#[command(version)]
struct Cli {
    /// Cronlytic API key (overrides CRONLYTIC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Cronlytic user ID (overrides CRONLYTIC_USER_ID)
    #[arg(long)]
    user_id: Option<String>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Retries after the first attempt for transient failures
    #[arg(long)]
    max_retries: Option<u32>,

    /// Base delay in seconds before the first retry; doubles per retry
    #[arg(long)]
    retry_delay: Option<f64>,

    /// Config file to use instead of the standard locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Randomize retry delays between zero and the computed backoff
    #[arg(long)]
    retry_jitter: bool,

    /// Cache job lookups for this many seconds
    #[arg(long)]
    cache_ttl: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            user_id: self.user_id.clone(),
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout,
            max_retries: self.max_retries,
            retry_delay_seconds: self.retry_delay,
            config_file: self.config.clone(),
        }
    }

    fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            cache: self.cache_ttl.map(|secs| JobCacheConfig::with_ttl(Duration::from_secs(secs))),
            jitter: if self.retry_jitter { Jitter::Full } else { Jitter::None },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    cronlytic_api::utils::logging::init_tracing(cli.log_json)?;

    let ctx = match AppContext::new(&cli.overrides(), cli.client_config()) {
        Ok(ctx) => Arc::new(ctx),
        Err(err) => {
            error!(kind = %err.kind(), error = %err, "Startup failed");
            return Ok(ExitCode::from(1));
        }
    };

    let shutdown = ctx.shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, cancelling in-flight operations");
                shutdown.cancel();
            }
            Err(err) => error!(error = %err, "Failed to listen for interrupt"),
        }
    });

    info!(base_url = %ctx.config.base_url(), "cronlytic-mcp ready");
    serve(ctx).await?;
    Ok(ExitCode::SUCCESS)
}

async fn serve(ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut in_flight = FuturesUnordered::new();
    let mut input_open = true;

    while input_open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next_line(), if input_open && !ctx.shutdown.is_cancelled() => {
                match line.context("failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let ctx = Arc::clone(&ctx);
                        in_flight.push(async move { handle_line(&ctx, &line).await });
                    }
                    None => input_open = false,
                }
            }
            Some(response) = in_flight.next(), if !in_flight.is_empty() => {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                stdout.write_all(&encoded).await.context("failed to write stdout")?;
                stdout.flush().await.context("failed to flush stdout")?;
            }
            () = ctx.shutdown.cancelled(), if input_open => input_open = false,
        }
    }

    info!("Input closed, shutting down");
    Ok(())
}
