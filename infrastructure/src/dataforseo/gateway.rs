//! DataForSEO Source Gateway implementation

use super::error::{DataForSeoError, Result};
use super::protocol::{LiveResult, LiveTask, ModelEntry, decode};
use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracker_application::{GatewayError, GatewayResponse, ModelInfo, SourceGateway, SourceQuery};
use tracker_domain::{SourceId, UsageMetadata};

const TEMPERATURE: f64 = 0.2;
const LISTING_TIMEOUT: Duration = Duration::from_secs(30);

/// The AI platforms DataForSEO fronts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceVariant {
    ChatGpt,
    Perplexity,
    Gemini,
}

impl SourceVariant {
    pub fn from_source(source: &SourceId) -> Option<Self> {
        match source {
            SourceId::ChatGpt => Some(SourceVariant::ChatGpt),
            SourceId::Perplexity => Some(SourceVariant::Perplexity),
            SourceId::Gemini => Some(SourceVariant::Gemini),
            SourceId::Custom(_) => None,
        }
    }

    pub fn source(&self) -> SourceId {
        match self {
            SourceVariant::ChatGpt => SourceId::ChatGpt,
            SourceVariant::Perplexity => SourceId::Perplexity,
            SourceVariant::Gemini => SourceId::Gemini,
        }
    }

    /// Path segment under `/v3/ai_optimization/`
    pub fn segment(&self) -> &'static str {
        match self {
            SourceVariant::ChatGpt => "chat_gpt",
            SourceVariant::Perplexity => "perplexity",
            SourceVariant::Gemini => "gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            SourceVariant::ChatGpt => "gpt-4o-mini-2024-07-18",
            SourceVariant::Perplexity => "sonar",
            SourceVariant::Gemini => "gemini-2.5-flash",
        }
    }

    fn live_task(&self, request: &SourceQuery, model: &str) -> LiveTask {
        let (web_search, country) = match self {
            // Perplexity localizes instead of toggling search.
            SourceVariant::Perplexity => (None, Some("us".to_string())),
            _ => (Some(request.web_search), None),
        };

        LiveTask {
            user_prompt: request.prompt.clone(),
            model_name: model.to_string(),
            system_message: request.system_message.clone(),
            max_output_tokens: request.max_tokens,
            temperature: TEMPERATURE,
            web_search,
            web_search_country_iso_code: country,
        }
    }

    fn usage(&self, result: &LiveResult, model: &str) -> UsageMetadata {
        let reported = result.web_search.unwrap_or(false);
        UsageMetadata {
            input_tokens: result.input_tokens.unwrap_or(0),
            output_tokens: result.output_tokens.unwrap_or(0),
            cost: result.money_spent.unwrap_or(0.0),
            web_search_used: match self {
                SourceVariant::Perplexity => model.contains("online") || reported,
                _ => reported,
            },
        }
    }
}

/// Connection settings shared by every variant
#[derive(Debug, Clone)]
pub struct DataForSeoConfig {
    pub base_url: String,
    pub login: String,
    pub password: String,
    /// HTTP timeout for live queries
    pub timeout: Duration,
}

impl DataForSeoConfig {
    /// Resolve credentials from the environment variables the config names.
    pub fn from_env(gateway: &FileGatewayConfig, timeout: Duration) -> Result<Self> {
        Self::from_lookup(gateway, timeout, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        gateway: &FileGatewayConfig,
        timeout: Duration,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let read = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DataForSeoError::MissingCredentials(name.to_string()))
        };

        Ok(Self {
            base_url: gateway.base_url.trim_end_matches('/').to_string(),
            login: read(&gateway.login_env)?,
            password: read(&gateway.password_env)?,
            timeout,
        })
    }
}

/// Source gateway for one DataForSEO-backed platform
pub struct DataForSeoGateway {
    variant: SourceVariant,
    client: Client,
    config: Arc<DataForSeoConfig>,
    default_model: String,
}

impl DataForSeoGateway {
    pub fn new(variant: SourceVariant, client: Client, config: Arc<DataForSeoConfig>) -> Self {
        Self {
            variant,
            client,
            config,
            default_model: variant.default_model().to_string(),
        }
    }

    /// Override the model used when a query names none.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn variant(&self) -> SourceVariant {
        self.variant
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v3/ai_optimization/{}/llm_responses/{}",
            self.config.base_url,
            self.variant.segment(),
            action
        )
    }

    /// Read the body, turning non-2xx statuses into errors.
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DataForSeoError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(body)
    }

    async fn live(&self, request: &SourceQuery) -> Result<GatewayResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let task = self.variant.live_task(request, &model);

        debug!(
            "POST {} (model: {}, max_tokens: {})",
            self.endpoint("live"),
            model,
            request.max_tokens
        );

        let response = self
            .client
            .post(self.endpoint("live"))
            .basic_auth(&self.config.login, Some(&self.config.password))
            .timeout(self.config.timeout)
            .json(&[task])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let result = decode::<LiveResult>(&body)?
            .into_results()?
            .into_iter()
            .next()
            .unwrap_or_default();

        let text = result.text();
        info!(
            "{} returned {} chars (model: {})",
            self.variant.source().display_name(),
            text.len(),
            model
        );

        let usage = self.variant.usage(&result, &model);
        Ok(GatewayResponse {
            text,
            model: result.model_name.filter(|m| !m.is_empty()).unwrap_or(model),
            usage,
        })
    }

    async fn models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .basic_auth(&self.config.login, Some(&self.config.password))
            .timeout(LISTING_TIMEOUT)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(decode::<ModelEntry>(&body)?
            .into_results()?
            .into_iter()
            .map(|entry| ModelInfo {
                name: entry.model_name,
                web_search_supported: entry.web_search_supported.unwrap_or(false),
            })
            .collect())
    }
}

#[async_trait]
impl SourceGateway for DataForSeoGateway {
    fn source(&self) -> SourceId {
        self.variant.source()
    }

    async fn list_models(&self) -> std::result::Result<Vec<ModelInfo>, GatewayError> {
        self.models().await.map_err(GatewayError::from)
    }

    async fn query(&self, request: &SourceQuery) -> std::result::Result<GatewayResponse, GatewayError> {
        self.live(request).await.map_err(|e| match e {
            DataForSeoError::Http(ref inner) if inner.is_timeout() => {
                GatewayError::Timeout(self.config.timeout)
            }
            other => GatewayError::from(other),
        })
    }
}
