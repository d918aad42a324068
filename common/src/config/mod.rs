mod config_content_provider;
mod config_manager;
mod config_serializer;
mod validate;

pub use config_content_provider::{
    ConfigContentProvider, FileContentConfigProvider, MemoryContentConfigProvider,
};
pub use config_manager::{ConfigManager, config_path_next_to_executable};
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use validate::{Validate, validate_address};
