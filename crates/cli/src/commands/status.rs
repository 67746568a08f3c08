//! `feedmix status` — Show system status.

use feedmix_config::AppConfig;
use std::path::Path;

pub async fn run(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(path)?;
    let default_path = AppConfig::config_path();
    let config_path = path.unwrap_or(&default_path);

    println!("feedmix status");
    println!("==============");
    println!("  Config:       {}", config_path.display());
    println!(
        "  Store:        {:?} ({})",
        config.store.backend,
        config.store.resolved_path().display()
    );
    println!(
        "  Feed limit:   {} (interval {})",
        config.feed.default_limit, config.feed.default_sponsored_interval
    );
    println!(
        "  Fetch mode:   {:?}, on failure: {:?}",
        config.feed.fetch_mode, config.feed.on_source_failure
    );
    if config.feed.deadline_ms > 0 {
        println!("  Deadline:     {}ms", config.feed.deadline_ms);
    }
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    let metrics = if config.telemetry.enabled {
        format!("{:?}", config.telemetry.sink)
    } else {
        "disabled".into()
    };
    println!("  Metrics:      {metrics}");

    match feedmix_store::open_store(&config.store).await {
        Ok(store) => match store.count().await {
            Ok(count) => println!("  Items:        {count} in {}", store.name()),
            Err(e) => println!("  Items:        unavailable ({e})"),
        },
        Err(e) => println!("  Items:        store unavailable ({e})"),
    }

    if config_path.exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file — run `feedmix init` first");
    }

    Ok(())
}
