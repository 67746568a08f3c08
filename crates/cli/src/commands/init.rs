//! `feedmix init` — Write the default config file.

use feedmix_config::AppConfig;
use std::path::Path;

pub async fn run(path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_path = AppConfig::config_path();
    let config_path = path.unwrap_or(&default_path);

    if config_path.exists() && !force {
        println!("Config already exists at: {}", config_path.display());
        println!("Re-run with --force to overwrite it.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, AppConfig::default_toml())?;
    println!("Created config at: {}", config_path.display());

    Ok(())
}
