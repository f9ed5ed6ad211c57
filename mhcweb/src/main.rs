mod args;
mod config;
mod server;

use std::sync::Arc;

use args::{Cli, SubCommands};
use config::{PredictorConfig, ServerConfig};
use libmhcweb::output::allele_listing;
use libmhcweb::predictor::CommandPredictor;

use clap::Parser;

#[cfg(test)]
#[ctor::ctor]
fn init_backtrace() {
    color_backtrace::install();
}

fn load_predictor(config: &PredictorConfig) -> anyhow::Result<CommandPredictor> {
    CommandPredictor::load(&config.command, config.models_dir.as_deref())
}

fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        SubCommands::Serve(args) => {
            let config = ServerConfig::resolve(&args)?;
            let predictor = load_predictor(&config.predictor)?;

            actix_web::rt::System::new().block_on(server::run(config, Arc::new(predictor)))?;
        }
        SubCommands::Alleles(args) => {
            let config = args
                .predictor_args
                .resolve_with_config(args.config_path.as_ref())?;
            let predictor = load_predictor(&config)?;

            println!("{}", allele_listing(&predictor));
        }
    }
    Ok(())
}
