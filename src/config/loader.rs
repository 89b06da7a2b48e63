use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::config::settings::ClientConfig;
use crate::utils::constants::{
    DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_CACHE_VERSION, DEFAULT_HTTP_TIMEOUT_MS,
};

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
    let raw = fs::read_to_string(path)?;
    let mut config: ClientConfig = serde_yaml::from_str(&raw)?;

    // Apply defaults
    if config.api.timeout_ms.is_none() {
        config.api.timeout_ms = Some(DEFAULT_HTTP_TIMEOUT_MS);
    }
    if let Some(cache) = config.cache.as_mut() {
        if cache.version.is_none() {
            cache.version = Some(DEFAULT_CACHE_VERSION.to_owned());
        }
        if cache.max_age_seconds.is_none() {
            cache.max_age_seconds = Some(DEFAULT_CACHE_MAX_AGE_SECS);
        }
    }

    // Validate
    let base_url = config.api.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        bail!("api.base_url must be an http(s) URL, got '{}'", base_url);
    }

    Ok(config)
}
