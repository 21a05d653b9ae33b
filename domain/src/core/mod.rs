//! Core domain concepts shared across all subdomains.
//!
//! - [`source::SourceId`] - identifies one independent information source
//! - [`query::RankingQuery`] - a validated keyword to pose to every source
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod query;
pub mod source;
