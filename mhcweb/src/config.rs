use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use derive_builder::Builder;
use libmhcweb::pipeline::DEFAULT_MAX_INPUT_BYTES;
use serde::{Deserialize, Serialize};

use crate::args::{PredictorArgs, ServeArgs};

pub const DEFAULT_PREDICTOR_COMMAND: &str = "mhcflurry-predict";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub command: PathBuf,
    pub models_dir: Option<PathBuf>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from(DEFAULT_PREDICTOR_COMMAND),
            models_dir: None,
        }
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_input_bytes: usize,
    pub predictor: PredictorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            predictor: PredictorConfig::default(),
        }
    }
}

impl ServerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.workers {
            return Err("workers must be at least 1".to_string());
        }
        if let Some(0) = self.max_input_bytes {
            return Err("max_input_bytes must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ServerConfig {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = File::open(path.as_ref()).context(format!(
            "failed to open config file: {}",
            path.as_ref().to_string_lossy()
        ))?;

        serde_json::from_reader(BufReader::new(file)).context(format!(
            "failed to parse config file: {}",
            path.as_ref().to_string_lossy()
        ))
    }

    fn from_optional_path(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// The config file (or the defaults) with any command line overrides applied.
    pub fn resolve(args: &ServeArgs) -> anyhow::Result<Self> {
        let file = Self::from_optional_path(args.config_path.as_ref())?;

        ServerConfigBuilder::default()
            .host(args.host.clone().unwrap_or(file.host))
            .port(args.port.unwrap_or(file.port))
            .workers(args.workers.unwrap_or(file.workers))
            .max_input_bytes(args.max_input_bytes.unwrap_or(file.max_input_bytes))
            .predictor(args.predictor_args.resolve(file.predictor))
            .build()
            .context("invalid server configuration")
    }
}

impl PredictorArgs {
    pub fn resolve(&self, file: PredictorConfig) -> PredictorConfig {
        PredictorConfig {
            command: self.command.clone().unwrap_or(file.command),
            models_dir: self.models_dir.clone().or(file.models_dir),
        }
    }

    pub fn resolve_with_config(
        &self,
        config_path: Option<&PathBuf>,
    ) -> anyhow::Result<PredictorConfig> {
        let file = ServerConfig::from_optional_path(config_path)?;
        Ok(self.resolve(file.predictor))
    }
}
