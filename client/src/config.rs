use std::path::Path;

use common::config::{
    ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
    config_path_next_to_executable, validate_address,
};
use common::games::tictactoe::{Difficulty, Mark};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "tictactoe_client_config.yaml";

pub type ClientConfigManager = ConfigManager<FileContentConfigProvider, ClientConfig, YamlConfigSerializer>;

pub fn get_config_manager(path: Option<&Path>) -> ClientConfigManager {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(config_path_next_to_executable(CONFIG_FILE_NAME)),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    pub port: u16,
    pub join_address: String,
    pub relay_address: String,
    pub connect_timeout_ms: u64,
}

impl Validate for NetworkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be non-zero".to_string());
        }
        validate_address("join_address", &self.join_address)?;
        validate_address("relay_address", &self.relay_address)?;
        if !(100..=60000).contains(&self.connect_timeout_ms) {
            return Err(format!(
                "connect_timeout_ms must be between 100 and 60000, got {}",
                self.connect_timeout_ms
            ));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: 5050,
            join_address: "127.0.0.1:5050".to_string(),
            relay_address: "127.0.0.1:5051".to_string(),
            connect_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub difficulty: Difficulty,
    pub human_mark: Mark,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<(), String> {
        self.network.validate()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            human_mark: Mark::X,
            network: NetworkConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_tictactoe_client_config_{}.yaml", random_number));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_file() {
        let default_config = ClientConfig::default();
        let serializer = YamlConfigSerializer::new();
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(&file_path);

        let serialized = serializer.serialize(&default_config).unwrap();
        content_provider.set_config_content(&serialized).unwrap();
        let read_back = content_provider.get_config_content().unwrap().unwrap();
        let deserialized: ClientConfig = serializer.deserialize(&read_back).unwrap();
        assert_eq!(default_config, deserialized);

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_manager_persists_changes() {
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(Path::new(&file_path)));
        assert_eq!(manager.get_config().unwrap(), ClientConfig::default());

        manager
            .update(|config| {
                config.difficulty = Difficulty::Easy;
                config.human_mark = Mark::O;
            })
            .unwrap();

        let reloaded = get_config_manager(Some(Path::new(&file_path))).get_config().unwrap();
        assert_eq!(reloaded.difficulty, Difficulty::Easy);
        assert_eq!(reloaded.human_mark, Mark::O);

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_missing_network_section_uses_defaults() {
        let serializer = YamlConfigSerializer::new();
        let config: ClientConfig = serializer.deserialize("difficulty: Medium\nhuman_mark: O\n").unwrap();
        assert_eq!(config.network, NetworkConfig::default());
        assert_eq!(config.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let mut config = ClientConfig::default();
        config.network.connect_timeout_ms = 10;
        assert!(config.validate().is_err());
        config.network.connect_timeout_ms = 100;
        config.network.port = 0;
        assert!(config.validate().is_err());
    }
}
