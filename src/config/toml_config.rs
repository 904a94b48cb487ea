use crate::utils::error::{EasyShipError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub marketplace_id: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub seller_id: String,
    pub access_key_id: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EasyShipError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EasyShipError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with values from the environment.
    /// Unset variables are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("service.endpoint", &self.service.endpoint)?;
        crate::utils::validation::validate_non_empty_string(
            "credentials.seller_id",
            &self.credentials.seller_id,
        )?;
        crate::utils::validation::validate_non_empty_string(
            "credentials.access_key_id",
            &self.credentials.access_key_id,
        )?;

        if let Some(timeout) = self.service.timeout_seconds {
            crate::utils::validation::validate_positive_number(
                "service.timeout_seconds",
                timeout,
                1,
            )?;
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    pub fn marketplace_id(&self) -> Option<&str> {
        self.service.marketplace_id.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.service
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[service]
endpoint = "https://mws.amazonservices.in"
marketplace_id = "A21TJRUUN4KGV"
timeout_seconds = 45

[credentials]
seller_id = "A2SELLER"
access_key_id = "AKIATEST"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.endpoint(), "https://mws.amazonservices.in");
        assert_eq!(config.marketplace_id(), Some("A21TJRUUN4KGV"));
        assert_eq!(config.timeout(), Duration::from_secs(45));
        assert_eq!(config.credentials.seller_id, "A2SELLER");
    }

    #[test]
    fn test_timeout_defaults_when_absent() {
        let toml_content = r#"
[service]
endpoint = "https://mws.amazonservices.in"

[credentials]
seller_id = "A2SELLER"
access_key_id = "AKIATEST"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.marketplace_id(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_EASYSHIP_ACCESS_KEY", "AKIAFROMENV");

        let toml_content = r#"
[service]
endpoint = "https://mws.amazonservices.in"

[credentials]
seller_id = "A2SELLER"
access_key_id = "${TEST_EASYSHIP_ACCESS_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.credentials.access_key_id, "AKIAFROMENV");

        std::env::remove_var("TEST_EASYSHIP_ACCESS_KEY");
    }

    #[test]
    fn test_config_validation_rejects_bad_endpoint() {
        let toml_content = r#"
[service]
endpoint = "not-a-url"

[credentials]
seller_id = "A2SELLER"
access_key_id = "AKIATEST"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_empty_credentials() {
        let toml_content = r#"
[service]
endpoint = "https://mws.amazonservices.in"

[credentials]
seller_id = ""
access_key_id = "AKIATEST"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[service]
endpoint = "https://mws.amazonservices.in"

[credentials]
seller_id = "A2SELLER"
access_key_id = "AKIATEST"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.endpoint(), "https://mws.amazonservices.in");
    }
}
