use std::fs;
use tracing::{debug, error, info};

use crate::types::client_config::{AppConfig, ConfigError};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let mut config: AppConfig = toml::from_str(&contents)?;
    config.api.base_url = config.api.resolved_base_url();

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let base = config.api.base_url.trim();
    if base.is_empty() {
        return Err(ConfigError::InvalidConfig("api.base_url cannot be empty".into()));
    }

    // Absolute plain-HTTP only: the transport carries no TLS connector.
    if !base.starts_with("http://") {
        return Err(ConfigError::InvalidConfig(
            "api.base_url must be an absolute http:// URL".into(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "api.timeout_secs must be greater than 0".into(),
        ));
    }

    if config.storage.path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidConfig("storage.path cannot be empty".into()));
    }

    for (name, value) in [
        ("routes.login_path", &config.routes.login_path),
        ("routes.home_path", &config.routes.home_path),
    ] {
        if !value.starts_with('/') {
            return Err(ConfigError::InvalidConfig(format!("{} must start with '/'", name)));
        }
    }

    if config.routes.login_path == config.routes.home_path {
        return Err(ConfigError::InvalidConfig(
            "routes.login_path and routes.home_path must differ".into(),
        ));
    }

    Ok(())
}
