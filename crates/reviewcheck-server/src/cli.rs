use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewcheck")]
#[command(
    author,
    version,
    about = "Detect computer-generated product reviews with pre-trained models"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server with the review form
    Serve(ServeArgs),

    /// Classify a single review and print the result
    Predict(PredictArgs),
}

/// Options shared by every command that loads models
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Configuration file path (defaults apply when it does not exist)
    #[arg(short, long, default_value = "./reviewcheck.yaml")]
    pub config: PathBuf,

    /// Directory containing the model artifacts
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// NLTK data directory searched for the stopword corpus (repeatable)
    #[arg(long = "nltk-data")]
    pub nltk_data: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub models: ModelArgs,

    /// Listen address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Load the page template from this directory instead of the built-in one
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub models: ModelArgs,

    /// Model to use: rf, svc or lr
    #[arg(short, long)]
    pub model: String,

    /// Review text
    pub text: String,
}
