// BRB Designer - backend entry point
//
// Speaks newline-delimited JSON over stdin/stdout: one request per line in,
// one response per line out. Logs go to stderr.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use brb_designer::commands::dispatch_line;
use brb_designer::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let state = AppState::new();
    if let Err(e) = state.initialize().await {
        // init_app can retry once the cause is fixed
        warn!("[Main] Initialization failed: {}", e);
    }
    info!("[Main] brb-designer {} ready", env!("CARGO_PKG_VERSION"));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("reading request")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = dispatch_line(&state, line).await;
        stdout
            .write_all(response.as_bytes())
            .await
            .context("writing response")?;
        stdout.write_all(b"\n").await.context("writing response")?;
        stdout.flush().await.context("flushing response")?;
    }

    info!("[Main] stdin closed, shutting down");
    Ok(())
}
