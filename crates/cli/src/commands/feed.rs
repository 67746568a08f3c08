//! `feedmix feed` — Assemble one feed and print it as JSON.

use feedmix_config::AppConfig;
use feedmix_core::{FeedRequest, FeedResult};
use feedmix_engine::{FeedPipeline, PipelineOptions};
use feedmix_telemetry::MetricsEngine;
use std::path::Path;
use std::sync::Arc;

pub struct FeedArgs {
    pub company: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub interval: Option<i64>,
}

impl FeedArgs {
    /// Fill in configured defaults for anything not given on the command line.
    pub fn into_request(self, config: &AppConfig) -> FeedRequest {
        let mut request = FeedRequest::new(self.limit.unwrap_or(config.feed.default_limit))
            .with_sponsored_interval(
                self.interval
                    .unwrap_or(config.feed.default_sponsored_interval),
            );
        if let Some(company) = self.company {
            request = request.with_company(company);
        }
        if let Some(category) = self.category {
            request = request.with_category(category);
        }
        request
    }
}

pub async fn run(path: Option<&Path>, args: FeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(path)?;
    let result = assemble(&config, args.into_request(&config)).await?;

    let output = serde_json::json!({
        "count": result.len(),
        "items": result.items,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

async fn assemble(
    config: &AppConfig,
    request: FeedRequest,
) -> Result<FeedResult, Box<dyn std::error::Error>> {
    let store = feedmix_store::open_store(&config.store).await?;
    let metrics = Arc::new(MetricsEngine::with_capacity(config.telemetry.max_records));
    let reporter = feedmix_telemetry::build_reporter(&config.telemetry, metrics)?;
    let pipeline = FeedPipeline::new(store, reporter, PipelineOptions::from_config(&config.feed));

    Ok(pipeline.assemble_feed(&request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedmix_config::StoreBackend;

    fn args() -> FeedArgs {
        FeedArgs {
            company: None,
            category: None,
            limit: None,
            interval: None,
        }
    }

    #[test]
    fn defaults_come_from_config() {
        let mut config = AppConfig::default();
        config.feed.default_limit = 12;
        config.feed.default_sponsored_interval = 3;

        let request = args().into_request(&config);
        assert_eq!(request.limit, 12);
        assert_eq!(request.sponsored_interval, 3);
        assert_eq!(request.company_id, None);
    }

    #[test]
    fn arguments_override_defaults() {
        let request = FeedArgs {
            company: Some("acme".into()),
            category: Some("news".into()),
            limit: Some(500),
            interval: Some(0),
        }
        .into_request(&AppConfig::default());

        assert_eq!(request.company_id.as_deref(), Some("acme"));
        assert_eq!(request.category_id.as_deref(), Some("news"));
        assert_eq!(request.effective_limit(), 100);
        assert_eq!(request.effective_sponsored_interval(), 4);
    }

    #[tokio::test]
    async fn empty_store_gives_empty_feed() {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::None;

        let result = assemble(&config, args().into_request(&config)).await.unwrap();
        assert!(result.is_empty());
    }
}
