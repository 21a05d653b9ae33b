//! Prompt domain
//!
//! Templates for the ranking question posed to every source.

mod template;

pub use template::PromptTemplate;
