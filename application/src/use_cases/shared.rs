//! Shared utilities for use cases.
//!
//! Contains the timeout-bounded single-source query used by both the
//! per-source fan-out (RunRanking) and the per-model sweep (ModelSweep).

use crate::config::ExecutionParams;
use crate::ports::run_logger::{RunEvent, RunLogger};
use crate::ports::source_gateway::{GatewayError, SourceGateway, SourceQuery};
use std::sync::Arc;
use tracing::{info, warn};
use tracker_domain::{PromptTemplate, RankingQuery, RawSourceResponse, SourceId};

/// Build the request sent to one source.
pub(crate) fn build_request(
    query: &RankingQuery,
    model: Option<String>,
    params: &ExecutionParams,
) -> SourceQuery {
    SourceQuery {
        prompt: PromptTemplate::ranking_query(query.keyword()),
        system_message: PromptTemplate::ranking_system().to_string(),
        model,
        web_search: params.web_search,
        max_tokens: params.max_tokens,
    }
}

/// Query one source, turning every failure (lookup, gateway, timeout) into an
/// error-flagged response.
pub(crate) async fn query_source(
    gateway: Result<Arc<dyn SourceGateway>, GatewayError>,
    source: SourceId,
    request: SourceQuery,
    timeout: std::time::Duration,
) -> RawSourceResponse {
    let requested_model = request.model.clone().unwrap_or_default();

    let gateway = match gateway {
        Ok(gateway) => gateway,
        Err(e) => {
            warn!("Source {} unavailable: {}", source, e);
            return RawSourceResponse::failure(source, requested_model, e.to_string());
        }
    };

    match tokio::time::timeout(timeout, gateway.query(&request)).await {
        Ok(Ok(response)) => {
            info!(
                "Source {} answered with model {} (cost: {:.4})",
                source, response.model, response.usage.cost
            );
            RawSourceResponse::success(source, response.model, response.text, response.usage)
        }
        Ok(Err(e)) => {
            warn!("Source {} failed: {}", source, e);
            RawSourceResponse::failure(source, requested_model, e.to_string())
        }
        Err(_) => {
            let e = GatewayError::Timeout(timeout);
            warn!("Source {} failed: {}", source, e);
            RawSourceResponse::failure(source, requested_model, e.to_string())
        }
    }
}

/// Record a source response to the run log.
pub(crate) fn log_response(logger: &dyn RunLogger, keyword: &str, response: &RawSourceResponse) {
    logger.log(RunEvent::new(
        "source_response",
        serde_json::json!({
            "keyword": keyword,
            "source": response.source.as_str(),
            "model": response.model,
            "text": response.text,
            "input_tokens": response.usage.input_tokens,
            "output_tokens": response.usage.output_tokens,
            "cost": response.usage.cost,
            "web_search_used": response.usage.web_search_used,
            "error": response.error,
        }),
    ));
}

/// Collapse repeated source ids, keeping first occurrences in order.
pub(crate) fn dedup_sources(sources: &[SourceId]) -> Vec<SourceId> {
    let mut unique: Vec<SourceId> = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.contains(source) {
            unique.push(source.clone());
        }
    }
    unique
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Stub gateways shared by use case tests.

    use crate::ports::source_gateway::{
        GatewayError, GatewayResponse, ModelInfo, SourceGateway, SourceQuery,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tracker_domain::{SourceId, UsageMetadata};

    /// Gateway returning canned text, optionally after a delay.
    pub struct StubGateway {
        pub source: SourceId,
        pub text: String,
        pub cost: f64,
        pub delay: Duration,
        pub fail_with: Option<GatewayError>,
        pub models: Vec<String>,
        pub seen: Mutex<Vec<SourceQuery>>,
    }

    impl StubGateway {
        pub fn new(source: impl Into<SourceId>, text: &str) -> Self {
            Self {
                source: source.into(),
                text: text.to_string(),
                cost: 0.01,
                delay: Duration::ZERO,
                fail_with: None,
                models: vec!["default-model".to_string()],
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn failing(mut self, error: GatewayError) -> Self {
            self.fail_with = Some(error);
            self
        }

        pub fn with_models(mut self, models: &[&str]) -> Self {
            self.models = models.iter().map(|m| m.to_string()).collect();
            self
        }

        pub fn requests(&self) -> Vec<SourceQuery> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SourceGateway for StubGateway {
        fn source(&self) -> SourceId {
            self.source.clone()
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            Ok(self
                .models
                .iter()
                .map(|name| ModelInfo {
                    name: name.clone(),
                    web_search_supported: true,
                })
                .collect())
        }

        async fn query(&self, request: &SourceQuery) -> Result<GatewayResponse, GatewayError> {
            self.seen.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            Ok(GatewayResponse {
                text: self.text.clone(),
                model: request
                    .model
                    .clone()
                    .unwrap_or_else(|| "default-model".to_string()),
                usage: UsageMetadata {
                    input_tokens: 10,
                    output_tokens: 20,
                    cost: self.cost,
                    web_search_used: request.web_search,
                },
            })
        }
    }
}
