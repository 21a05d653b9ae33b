//! Infrastructure layer for rank-tracker
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod dataforseo;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileExtractionConfig, FileGatewayConfig, FileMatchingConfig,
    FileOutputConfig, FileQueryConfig, FileSourcesConfig,
};
pub use dataforseo::{
    error::{DataForSeoError, Result},
    gateway::{DataForSeoConfig, DataForSeoGateway, SourceVariant},
    registry::build_registry,
};
pub use logging::JsonlRunLogger;
