//! Server configuration

use crate::cli::{ModelArgs, ServeArgs};
use reviewcheck_classifiers::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub address: String,

    /// Listen port
    pub port: u16,

    /// Maximum accepted request body size
    pub body_limit_bytes: usize,

    /// Directory holding `index.html`; the built-in template is used when unset
    pub templates_dir: Option<PathBuf>,

    /// Model artifacts and stopword corpus
    pub classifiers: ClassifierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
            body_limit_bytes: 1024 * 1024,
            templates_dir: None,
            classifiers: ClassifierConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the YAML file at `path`, or use defaults when it does not exist
    pub fn from_file_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Load configuration for `serve` and apply CLI overrides
    pub fn load(args: &ServeArgs) -> anyhow::Result<Self> {
        let mut config = Self::from_file_or_default(&args.models.config)?;
        config.apply_model_args(&args.models);

        if let Some(address) = &args.address {
            config.address = address.clone();
        }

        if let Some(port) = args.port {
            config.port = port;
        }

        if let Some(dir) = &args.templates_dir {
            config.templates_dir = Some(dir.clone());
        }

        Ok(config)
    }

    /// Apply the model-related CLI overrides
    pub fn apply_model_args(&mut self, args: &ModelArgs) {
        if let Some(dir) = &args.models_dir {
            self.classifiers.models_dir = dir.clone();
        }

        if !args.nltk_data.is_empty() {
            self.classifiers.nltk_data = args.nltk_data.clone();
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.address, self.port).parse()?)
    }
}
