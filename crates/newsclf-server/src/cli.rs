use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "newsclf-server")]
#[command(author, version, about = "News category inference endpoint", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "NEWSCLF_CONFIG", default_value = "newsclf.yaml")]
    pub config: PathBuf,

    /// Model artifact to load at startup
    #[arg(short, long, env = "NEWSCLF_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Request log file (opened in append mode)
    #[arg(long, env = "NEWSCLF_LOG_PATH")]
    pub log_file: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long, env = "NEWSCLF_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "NEWSCLF_PORT")]
    pub port: Option<u16>,

    /// Emit diagnostics as JSON
    #[arg(long, env = "NEWSCLF_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
