pub mod toml_config;

use crate::adapters::credibank::DEFAULT_CREDENTIAL_PREFIX;
use crate::adapters::confirmation::DEFAULT_TAG_PATTERN;
use crate::core::key_encoder::DEFAULT_KEY_DOMAIN_SIZE;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::*;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GRPC_SERVER: &str = "localhost:9091";
pub const DEFAULT_FRONTEND_DIR: &str = "./frontend";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "euromil-bet")]
#[command(about = "EuroMillions betting gateway backed by CrediBank and EuroMilRegister")]
pub struct CliConfig {
    /// Path to a TOML configuration file; replaces all other settings when given
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// host:port of the remote services
    #[arg(long, env = "GRPC_SERVER", default_value = DEFAULT_GRPC_SERVER)]
    pub grpc_server: String,

    /// Overrides --grpc-server for CrediBank only
    #[arg(long, env = "CREDIBANK_SERVER")]
    pub credibank_server: Option<String>,

    /// Overrides --grpc-server for EuroMilRegister only
    #[arg(long, env = "EUROMIL_SERVER")]
    pub euromil_server: Option<String>,

    #[arg(long, env = "GRPC_USE_TLS")]
    pub use_tls: bool,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "FRONTEND_DIR", default_value = DEFAULT_FRONTEND_DIR)]
    pub frontend_dir: String,

    #[arg(long, default_value = DEFAULT_CREDENTIAL_PREFIX)]
    pub credential_prefix: String,

    #[arg(long, default_value_t = DEFAULT_KEY_DOMAIN_SIZE)]
    pub key_domain_size: u32,

    #[arg(long, default_value = DEFAULT_TAG_PATTERN)]
    pub registration_tag_pattern: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "JSON_LOGS", help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn port(&self) -> u16 {
        self.port
    }

    fn credibank_server(&self) -> &str {
        self.credibank_server.as_deref().unwrap_or(&self.grpc_server)
    }

    fn euromil_server(&self) -> &str {
        self.euromil_server.as_deref().unwrap_or(&self.grpc_server)
    }

    fn use_tls(&self) -> bool {
        self.use_tls
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn frontend_dir(&self) -> &str {
        &self.frontend_dir
    }

    fn credential_prefix(&self) -> &str {
        &self.credential_prefix
    }

    fn key_domain_size(&self) -> u32 {
        self.key_domain_size
    }

    fn registration_tag_pattern(&self) -> &str {
        &self.registration_tag_pattern
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// (verbose, json_logs) when a TOML file is loaded: either source can turn a flag on.
    pub fn log_flags_with(&self, toml: &toml_config::TomlConfig) -> (bool, bool) {
        (
            self.verbose || toml.verbose(),
            self.json_logs || toml.json_logs(),
        )
    }
}

/// 所有設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_positive_number("port", config.port() as usize, 1)?;
    validate_server_address("credibank_server", config.credibank_server())?;
    validate_server_address("euromil_server", config.euromil_server())?;
    validate_range(
        "request_timeout_secs",
        config.request_timeout().as_secs(),
        1,
        600,
    )?;
    validate_non_empty_string("credential_prefix", config.credential_prefix())?;
    validate_range("key_domain_size", config.key_domain_size(), 1, 50)?;
    validate_regex(
        "registration_tag_pattern",
        config.registration_tag_pattern(),
    )?;
    Ok(())
}
