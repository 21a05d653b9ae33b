//! DataForSEO adapter
//!
//! Implements [`SourceGateway`](tracker_application::SourceGateway) for the
//! ChatGPT, Perplexity and Gemini endpoints of the DataForSEO AI optimization API.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod registry;
