use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::artifact::default_artifact_path;
use crate::config::{
    ServeConfig, TrainConfig, DEFAULT_ADDRESS, DEFAULT_MIN_ACCURACY, DEFAULT_PORT, DEFAULT_SEED,
    DEFAULT_TEST_SIZE,
};

#[derive(Parser, Debug)]
#[command(name = "spam-detector")]
#[command(author, version, about = "SMS spam detector web form")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web form
    Serve(ServeArgs),

    /// Fit a classifier artifact from a labelled SMS corpus
    Train(TrainArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Listen address
    #[arg(short, long, default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Classifier artifact (defaults to one next to the executable)
    #[arg(long)]
    pub artifact: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            address: DEFAULT_ADDRESS.to_string(),
            artifact: None,
            verbose: false,
        }
    }
}

impl ServeArgs {
    pub fn to_config(&self) -> Result<ServeConfig, std::net::AddrParseError> {
        let addr: SocketAddr = format!("{}:{}", self.address, self.port).parse()?;
        Ok(ServeConfig {
            addr,
            artifact_path: self.artifact.clone().unwrap_or_else(default_artifact_path),
        })
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Tab-separated corpus (SMS Spam Collection format)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output artifact (defaults to one next to the executable)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fraction held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    pub test_size: f32,

    /// Split seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Minimum held-out accuracy required to write the artifact
    #[arg(long, default_value_t = DEFAULT_MIN_ACCURACY)]
    pub min_accuracy: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl TrainArgs {
    pub fn to_config(&self) -> TrainConfig {
        let mut config = TrainConfig::new(&self.data);
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        config.test_size = self.test_size;
        config.seed = self.seed;
        config.min_accuracy = self.min_accuracy;
        config
    }
}
