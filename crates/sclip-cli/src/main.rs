//! ScribeClip command-line binary.

use anyhow::{anyhow, Context};
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};

use sclip_asr::AsrConfig;
use sclip_cli::cli::{Cli, Commands};
use sclip_cli::{
    apply_plan, init_tracing, probe_and_plan_defaults, transcribe, CliError, ClipConfig,
};
use sclip_models::{ProgressCallback, ProgressUpdate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();

    // Ctrl-C flips the cancel signal; the running operation stops at its
    // next checkpoint and kills any child process.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received interrupt, cancelling");
            cancel_tx.send(true).ok();
        }
    });

    if let Err(e) = run(cli.command, cancel_rx).await {
        // Surface FFmpeg/FFprobe stderr for failed runs.
        if let Some(stderr) = e.downcast_ref::<CliError>().and_then(CliError::diagnostics) {
            eprintln!("{}", stderr.trim_end());
        }
        return Err(e);
    }

    info!("Done");
    Ok(())
}

async fn run(command: Commands, cancel_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
    match command {
        Commands::Transcribe { file } => {
            let config = AsrConfig::from_env().context("transcription service is not configured")?;
            let text = transcribe(config, &file, Some(cancel_rx), progress_logger()).await?;
            println!("{}", text);
        }
        Commands::Probe { file } => {
            let defaults = probe_and_plan_defaults(&file).await?;
            println!("{}", serde_json::to_string_pretty(&defaults)?);
        }
        Commands::Clip(args) => {
            let mut config = ClipConfig::from_env();
            if let Some(dir) = &args.work_dir {
                config.work_dir = dir.clone();
            }

            let defaults = probe_and_plan_defaults(&args.file).await?;
            let plan = args.plan_over(defaults.plan);
            let output = apply_plan(&args.file, &plan, &config, Some(cancel_rx), &progress_logger())
                .await?;
            println!("{}", output.display());
        }
    }
    Ok(())
}

fn progress_logger() -> ProgressCallback {
    Box::new(|update: ProgressUpdate| {
        info!(
            progress = update.fraction,
            "{:>3.0}% {}",
            update.fraction * 100.0,
            update.description
        );
    })
}
