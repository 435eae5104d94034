//! Node configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file (`--config`, default `devlink.yaml`)
//! 3. `DEVLINK_*` environment variables (`DEVLINK_API_ADDR`, `DEVLINK_PERSIST`, ...)
//! 4. command-line flags

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::observability::LogFormat;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DEVLINK";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a Devlink node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// HTTP listen address.
    pub api_addr: SocketAddr,
    /// Directory holding the snapshot file.
    pub data_dir: PathBuf,
    /// Write a snapshot after every change and load it on startup.
    pub persist: bool,
    /// HMAC secret for signing tokens.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// Log level for the devlink crates.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Allow cross-origin requests.
    pub cors: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir: PathBuf::from("./data"),
            persist: false,
            jwt_secret: String::new(),
            token_ttl_secs: devlink_accounts::DEFAULT_TOKEN_TTL_SECS,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cors: true,
        }
    }
}

/// Devlink Node - developer network API server
#[derive(Parser, Debug, Default)]
#[command(name = "devlink-node")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "devlink.yaml")]
    pub config: PathBuf,

    /// API listen address
    #[arg(long)]
    pub api_addr: Option<SocketAddr>,

    /// Data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Persist data to <data-dir>/devlink.json
    #[arg(long)]
    pub persist: bool,

    /// Token signing secret
    #[arg(long)]
    pub jwt_secret: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Run in local development mode (generates a token secret if none is set)
    #[arg(long)]
    pub dev: bool,
}

impl NodeConfig {
    /// Load defaults, then `path` if it exists, then the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&NodeConfig::default())?)
            .add_source(::config::File::from(path).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Apply command-line flags on top of the loaded values.
    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(addr) = args.api_addr {
            self.api_addr = addr;
        }
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if args.persist {
            self.persist = true;
        }
        if let Some(secret) = &args.jwt_secret {
            self.jwt_secret = secret.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(format) = &args.log_format {
            self.log_format = LogFormat::parse(format);
        }
    }

    /// Check the final configuration.
    ///
    /// An empty token secret is an error, except in dev mode where a random
    /// one is generated. Tokens signed with it do not survive a restart.
    pub fn finalize(&mut self, dev: bool) -> Result<(), ConfigError> {
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "token_ttl_secs must be greater than zero".to_string(),
            ));
        }

        if self.jwt_secret.trim().is_empty() {
            if !dev {
                return Err(ConfigError::Invalid(format!(
                    "jwt_secret is required (set {ENV_PREFIX}_JWT_SECRET or pass --dev)"
                )));
            }
            self.jwt_secret = hex::encode(rand::random::<[u8; 32]>());
            tracing::warn!("No jwt_secret configured, using a random secret for this run");
        }

        Ok(())
    }
}
