pub mod feed;
pub mod import;
pub mod init;
pub mod serve;
pub mod status;

use feedmix_config::AppConfig;
use std::path::Path;

/// Load config from `--config` or the default path, with env overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_with_overrides(path),
        None => AppConfig::load(),
    };
    Ok(config.map_err(|e| format!("Failed to load config: {e}"))?)
}
