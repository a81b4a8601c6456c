//! NutriEdu Cognitive Monitor - Main Entry Point
//!
//! Usage: `nutriedu-monitor <frames.jsonl> [config.toml]`

use anyhow::Context;
use monitor::{init_logging, JsonLinesSource, MonitorLoop};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(
        args.next()
            .context("usage: nutriedu-monitor <frames.jsonl> [config.toml]")?,
    );
    let config_path = args.next().map(PathBuf::from);

    let config = monitor::config::load(config_path.as_deref()).context("failed to load configuration")?;
    init_logging(&config.log_level)?;

    info!("=== NutriEdu Cognitive Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Stop requested");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let source = JsonLinesSource::open(&input)
        .with_context(|| format!("failed to open {}", input.display()))?;
    let mut monitor = MonitorLoop::new(&config)?;
    monitor.run(source, &stop).await?;

    let summary = monitor.summarize();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
