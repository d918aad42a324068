use std::path::Path;

use common::config::{
    ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
    config_path_next_to_executable, validate_address,
};
use common::protocol::DEFAULT_MAX_LINE_BYTES;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "tictactoe_relay_config.yaml";

pub type RelayConfigManager = ConfigManager<FileContentConfigProvider, RelayConfig, YamlConfigSerializer>;

pub fn get_config_manager(path: Option<&Path>) -> RelayConfigManager {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(config_path_next_to_executable(CONFIG_FILE_NAME)),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RelayConfig {
    pub tcp_address: String,
    pub web_address: String,
    pub max_rooms: usize,
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<(), String> {
        validate_address("tcp_address", &self.tcp_address)?;
        validate_address("web_address", &self.web_address)?;
        if self.max_rooms == 0 {
            return Err("max_rooms must be greater than 0".to_string());
        }
        if !(64..=65536).contains(&self.max_line_bytes) {
            return Err(format!(
                "max_line_bytes must be between 64 and 65536, got {}",
                self.max_line_bytes
            ));
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            tcp_address: "0.0.0.0:5051".to_string(),
            web_address: "0.0.0.0:5052".to_string(),
            max_rooms: 1024,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigSerializer, MemoryContentConfigProvider};

    #[test]
    fn test_default_config_is_valid() {
        assert!(RelayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_survives_yaml() {
        let serializer = YamlConfigSerializer::new();
        let text = serializer.serialize(&RelayConfig::default()).unwrap();
        let parsed: RelayConfig = serializer.deserialize(&text).unwrap();
        assert_eq!(parsed, RelayConfig::default());
    }

    #[test]
    fn test_missing_line_limit_uses_default() {
        let content = "tcp_address: 127.0.0.1:6000\nweb_address: 127.0.0.1:6001\nmax_rooms: 4\n";
        let manager: ConfigManager<_, RelayConfig> = ConfigManager::new(
            MemoryContentConfigProvider::new(Some(content.to_string())),
            YamlConfigSerializer::new(),
        );
        let config = manager.get_config().unwrap();
        assert_eq!(config.max_rooms, 4);
        assert_eq!(config.max_line_bytes, DEFAULT_MAX_LINE_BYTES);
    }

    #[test]
    fn test_zero_rooms_is_invalid() {
        let config = RelayConfig {
            max_rooms: 0,
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
