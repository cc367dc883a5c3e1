use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use newsclf_replay::Replayer;

#[derive(Parser, Debug)]
#[command(name = "newsclf-replay")]
#[command(author, version, about = "Replay recorded prediction requests", long_about = None)]
struct Cli {
    /// Newline-delimited JSON request bodies
    #[arg(short, long, default_value = "data/requests.json")]
    input: PathBuf,

    /// Server base URL
    #[arg(short, long, env = "NEWSCLF_TARGET", default_value = "http://127.0.0.1:8000")]
    target: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let replayer = Replayer::new(&cli.target)?;
    info!("Replaying {} against {}", cli.input.display(), replayer.endpoint());

    let report = replayer.replay_file(&cli.input).await?;

    println!(
        "Finished making predictions: {} sent, {} succeeded, {} failed. Check the server's request log for output predictions.",
        report.sent, report.succeeded, report.failed
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("newsclf=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsclf=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
