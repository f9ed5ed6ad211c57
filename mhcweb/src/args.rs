use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Subcommand)]
pub enum SubCommands {
    #[command(about = "Serve the prediction web front-end and API")]
    Serve(ServeArgs),
    #[command(about = "Print the supported alleles and peptide lengths, as served at /alleles")]
    Alleles(AllelesArgs),
}

#[derive(Parser)]
#[command(name = "mhcweb")]
#[command(about = "A web front-end for MHC class I binding-affinity predictions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PredictorArgs {
    /// The predictor executable
    #[arg(long = "predictor-command", value_name = "PATH")]
    pub command: Option<PathBuf>,

    /// The directory holding the trained models, passed through to the predictor
    #[arg(long = "models", value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// A JSON configuration file; flags given here override its values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// The address to listen on
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// The port to listen on
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// The number of HTTP worker threads
    #[arg(short = 't', long = "workers", value_name = "n")]
    pub workers: Option<usize>,

    /// Peptide/protein input beyond this many bytes is truncated
    #[arg(long = "max-input-bytes", value_name = "N")]
    pub max_input_bytes: Option<usize>,

    /// Arguments that locate the predictor
    #[command(flatten)]
    pub predictor_args: PredictorArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AllelesArgs {
    /// A JSON configuration file; only its predictor section is used
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Arguments that locate the predictor
    #[command(flatten)]
    pub predictor_args: PredictorArgs,
}
