//! Source identifier value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An independent information source asked the ranking question (Value Object)
///
/// Known sources get their own variant; anything else is kept verbatim as
/// [`SourceId::Custom`] so new providers can be registered from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    ChatGpt,
    Perplexity,
    Gemini,
    Custom(String),
}

impl SourceId {
    /// Get the string identifier for this source
    pub fn as_str(&self) -> &str {
        match self {
            SourceId::ChatGpt => "chatgpt",
            SourceId::Perplexity => "perplexity",
            SourceId::Gemini => "gemini",
            SourceId::Custom(s) => s,
        }
    }

    /// Human-readable name used in console output
    pub fn display_name(&self) -> &str {
        match self {
            SourceId::ChatGpt => "ChatGPT",
            SourceId::Perplexity => "Perplexity",
            SourceId::Gemini => "Gemini",
            SourceId::Custom(s) => s,
        }
    }

    /// Sources queried when the caller does not choose any
    pub fn default_sources() -> Vec<SourceId> {
        vec![SourceId::ChatGpt, SourceId::Perplexity, SourceId::Gemini]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Ok(match normalized.as_str() {
            "chatgpt" | "chat_gpt" => SourceId::ChatGpt,
            "perplexity" => SourceId::Perplexity,
            "gemini" => SourceId::Gemini,
            _ => SourceId::Custom(normalized),
        })
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

impl Serialize for SourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SourceId::from(s.as_str()))
    }
}
