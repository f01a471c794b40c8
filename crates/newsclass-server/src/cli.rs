use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "newsclass-server")]
#[command(author, version, about = "Newsgroup text-classification inference service")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model and serve predictions over HTTP
    Serve(ServeArgs),

    /// Load the model, classify one text and print the category
    Classify(ClassifyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", env = "NEWSCLASS_CONFIG")]
    pub config: PathBuf,

    /// Model artifact path (relative paths resolve against the executable's directory)
    #[arg(short, long, env = "NEWSCLASS_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// Listen address
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Exit instead of starting degraded when the model cannot be loaded
    #[arg(long)]
    pub require_model: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Text to classify
    #[arg(short, long)]
    pub text: String,

    /// Configuration file path, read for `artifact_path`
    #[arg(short, long, default_value = "config.yaml", env = "NEWSCLASS_CONFIG")]
    pub config: PathBuf,

    /// Model artifact path (relative paths resolve against the executable's directory)
    #[arg(short, long, env = "NEWSCLASS_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
