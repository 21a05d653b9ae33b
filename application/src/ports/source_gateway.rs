//! Source Query Gateway port
//!
//! Defines the capability interface every source variant implements, and the
//! registry that selects a variant by [`SourceId`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracker_domain::{SourceId, UsageMetadata};

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    Api(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Source not available: {0}")]
    SourceNotAvailable(String),

    #[error("Request timed out after {}", describe_timeout(.0))]
    Timeout(Duration),

    #[error("Other error: {0}")]
    Other(String),
}

/// Whole seconds when exact, milliseconds below one second.
fn describe_timeout(timeout: &Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else if timeout.as_secs() == 0 {
        format!("{}ms", timeout.as_millis())
    } else {
        format!("{:.1}s", timeout.as_secs_f64())
    }
}

/// A model a source can be asked to answer with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub web_search_supported: bool,
}

/// One query sent to one source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceQuery {
    pub prompt: String,
    pub system_message: String,
    /// Model to use; `None` lets the source pick its default
    pub model: Option<String>,
    pub web_search: bool,
    pub max_tokens: u32,
}

/// Successful gateway answer
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub text: String,
    /// Model that actually answered
    pub model: String,
    pub usage: UsageMetadata,
}

/// Gateway for one source
///
/// Implementations (adapters) live in the infrastructure layer. The core only
/// distinguishes "answered with text and usage" from "failed with a message".
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// The source this gateway talks to
    fn source(&self) -> SourceId;

    /// Models selectable on this source
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError>;

    /// Run a ranking query
    async fn query(&self, request: &SourceQuery) -> Result<GatewayResponse, GatewayError>;
}

/// Lookup of source gateways keyed by [`SourceId`]
#[derive(Clone, Default)]
pub struct SourceRegistry {
    gateways: HashMap<SourceId, Arc<dyn SourceGateway>>,
    order: Vec<SourceId>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gateway under its own source id, replacing any previous one.
    pub fn register(&mut self, gateway: Arc<dyn SourceGateway>) {
        let source = gateway.source();
        if !self.order.contains(&source) {
            self.order.push(source.clone());
        }
        self.gateways.insert(source, gateway);
    }

    pub fn with(mut self, gateway: Arc<dyn SourceGateway>) -> Self {
        self.register(gateway);
        self
    }

    pub fn get(&self, source: &SourceId) -> Result<Arc<dyn SourceGateway>, GatewayError> {
        self.gateways
            .get(source)
            .cloned()
            .ok_or_else(|| GatewayError::SourceNotAvailable(source.to_string()))
    }

    /// Registered sources in registration order
    pub fn sources(&self) -> &[SourceId] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.order)
            .finish()
    }
}
