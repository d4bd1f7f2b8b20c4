mod configuration;
mod configuration_error;
mod interface_config;

pub use configuration::Configuration;
pub use configuration::MaskFlag;
pub use configuration_error::ConfigurationError;
pub use interface_config::InterfaceConfig;
