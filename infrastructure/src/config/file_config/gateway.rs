//! DataForSEO connection settings from TOML (`[gateway]` section)
//!
//! Credentials never live in the file; it only names the environment
//! variables they are read from.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// API root, overridable for sandboxes and tests
    pub base_url: String,
    /// Environment variable holding the API login
    pub login_env: String,
    /// Environment variable holding the API password
    pub password_env: String,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_env: "DATAFORSEO_LOGIN".to_string(),
            password_env: "DATAFORSEO_PASSWORD".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml_str = r#"
[gateway]
login_env = "DFS_USER"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.login_env, "DFS_USER");
        assert_eq!(config.gateway.password_env, "DATAFORSEO_PASSWORD");
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
    }
}
