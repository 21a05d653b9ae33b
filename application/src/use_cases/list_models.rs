//! List Models use case

use crate::ports::source_gateway::{ModelInfo, SourceRegistry};
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;
use tracker_domain::SourceId;

/// Model listing of one source, or the reason it could not be fetched
#[derive(Debug, Clone, PartialEq)]
pub struct SourceModels {
    pub source: SourceId,
    pub models: Result<Vec<ModelInfo>, String>,
}

pub struct ListModelsUseCase {
    registry: Arc<SourceRegistry>,
}

impl ListModelsUseCase {
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// Fetch the model lists of all given sources concurrently.
    pub async fn execute(&self, sources: &[SourceId]) -> Vec<SourceModels> {
        let futures = sources.iter().map(|source| {
            let gateway = self.registry.get(source);
            async move {
                let models = match gateway {
                    Ok(gateway) => gateway.list_models().await,
                    Err(e) => Err(e),
                };
                if let Err(e) = &models {
                    warn!("Could not list models for {}: {}", source, e);
                }
                SourceModels {
                    source: source.clone(),
                    models: models.map_err(|e| e.to_string()),
                }
            }
        });

        join_all(futures).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::source_gateway::GatewayError;
    use crate::use_cases::shared::test_support::StubGateway;

    #[tokio::test]
    async fn test_lists_each_source_independently() {
        let registry = Arc::new(
            SourceRegistry::new()
                .with(Arc::new(
                    StubGateway::new(SourceId::ChatGpt, "").with_models(&["gpt-a", "gpt-b"]),
                ))
                .with(Arc::new(StubGateway::new(SourceId::Gemini, "").failing(
                    GatewayError::AuthenticationFailed("bad credentials".to_string()),
                ))),
        );
        let use_case = ListModelsUseCase::new(registry);

        let listing = use_case
            .execute(&[SourceId::ChatGpt, SourceId::Gemini, SourceId::Perplexity])
            .await;

        assert_eq!(listing.len(), 3);
        let names: Vec<String> = listing[0]
            .models
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.name.clone())
            .collect();
        assert_eq!(names, vec!["gpt-a", "gpt-b"]);
        assert_eq!(
            listing[1].models,
            Err("Authentication failed: bad credentials".to_string())
        );
        assert_eq!(
            listing[2].models,
            Err("Source not available: perplexity".to_string())
        );
    }
}
