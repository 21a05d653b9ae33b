//! Source registry wiring for the DataForSEO variants

use super::error::Result;
use super::gateway::{DataForSeoConfig, DataForSeoGateway, SourceVariant};
use crate::config::FileConfig;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};
use tracker_application::SourceRegistry;
use tracker_domain::SourceId;

/// Register a gateway for every DataForSEO-backed source.
///
/// All three variants are registered so `-p` can name a source that is not
/// in `sources.enabled`. Enabled custom sources have no adapter; they are
/// reported as unavailable when queried.
pub fn build_registry(config: &FileConfig, connection: DataForSeoConfig) -> Result<SourceRegistry> {
    let client = Client::builder().build()?;
    let connection = Arc::new(connection);
    let (default_models, _) = config.sources.parse_default_models();

    let mut registry = SourceRegistry::new();
    for source in SourceId::default_sources() {
        let Some(variant) = SourceVariant::from_source(&source) else {
            continue;
        };

        let mut gateway = DataForSeoGateway::new(variant, client.clone(), Arc::clone(&connection));
        if let Some(model) = default_models.get(&source) {
            debug!("Default model for {}: {}", source, model);
            gateway = gateway.with_default_model(model.clone());
        }
        registry.register(Arc::new(gateway));
    }

    for source in config.sources.parse_enabled().0 {
        if SourceVariant::from_source(&source).is_none() {
            warn!("No adapter for source '{}'; it will report as unavailable", source);
        }
    }

    Ok(registry)
}
