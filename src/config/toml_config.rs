use crate::adapters::confirmation::DEFAULT_TAG_PATTERN;
use crate::adapters::credibank::DEFAULT_CREDENTIAL_PREFIX;
use crate::config::{
    validate_provider, DEFAULT_FRONTEND_DIR, DEFAULT_GRPC_SERVER, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::core::key_encoder::DEFAULT_KEY_DOMAIN_SIZE;
use crate::core::ConfigProvider;
use crate::utils::error::{BetError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub betting: BettingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub frontend_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_grpc_server")]
    pub grpc_server: String,
    pub credibank_server: Option<String>,
    pub euromil_server: Option<String>,
    pub use_tls: Option<bool>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            grpc_server: default_grpc_server(),
            credibank_server: None,
            euromil_server: None,
            use_tls: None,
            request_timeout_secs: None,
        }
    }
}

fn default_grpc_server() -> String {
    DEFAULT_GRPC_SERVER.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BettingConfig {
    pub credential_prefix: Option<String>,
    pub key_domain_size: Option<u32>,
    pub registration_tag_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BetError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GRPC_SERVER})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BetError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    fn credibank_server(&self) -> &str {
        self.services
            .credibank_server
            .as_deref()
            .unwrap_or(&self.services.grpc_server)
    }

    fn euromil_server(&self) -> &str {
        self.services
            .euromil_server
            .as_deref()
            .unwrap_or(&self.services.grpc_server)
    }

    fn use_tls(&self) -> bool {
        self.services.use_tls.unwrap_or(false)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.services
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    fn frontend_dir(&self) -> &str {
        self.server
            .frontend_dir
            .as_deref()
            .unwrap_or(DEFAULT_FRONTEND_DIR)
    }

    fn credential_prefix(&self) -> &str {
        self.betting
            .credential_prefix
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_PREFIX)
    }

    fn key_domain_size(&self) -> u32 {
        self.betting
            .key_domain_size
            .unwrap_or(DEFAULT_KEY_DOMAIN_SIZE)
    }

    fn registration_tag_pattern(&self) -> &str {
        self.betting
            .registration_tag_pattern
            .as_deref()
            .unwrap_or(DEFAULT_TAG_PATTERN)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
port = 8080
frontend_dir = "/srv/euromil"

[services]
grpc_server = "ken01.utad.pt:9091"
euromil_server = "register.local:7000"
use_tls = true
request_timeout_secs = 10

[betting]
credential_prefix = "CHQ-"
key_domain_size = 5
registration_tag_pattern = "Bucket ([A-E])"

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.port(), 8080);
        assert_eq!(config.frontend_dir(), "/srv/euromil");
        assert_eq!(config.credibank_server(), "ken01.utad.pt:9091");
        assert_eq!(config.euromil_server(), "register.local:7000");
        assert!(config.use_tls());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.credential_prefix(), "CHQ-");
        assert_eq!(config.key_domain_size(), 5);
        assert!(config.json_logs());
        assert!(!config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.credibank_server(), DEFAULT_GRPC_SERVER);
        assert_eq!(config.credential_prefix(), "CRED-");
        assert_eq!(config.key_domain_size(), 3);
        assert!(!config.use_tls());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EUROMIL_TEST_GRPC_SERVER", "bank.example.com:9091");

        let toml_content = r#"
[services]
grpc_server = "${EUROMIL_TEST_GRPC_SERVER}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.credibank_server(), "bank.example.com:9091");

        std::env::remove_var("EUROMIL_TEST_GRPC_SERVER");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[betting]
key_domain_size = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let with_scheme = TomlConfig::from_toml_str(
            r#"
[services]
grpc_server = "https://ken01.utad.pt:9091"
"#,
        )
        .unwrap();
        assert!(with_scheme.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
port = 4000
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.port(), 4000);
    }
}
