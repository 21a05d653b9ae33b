//! Prompt templates for ranking queries

/// Templates for the prompt sent to every source
pub struct PromptTemplate;

impl PromptTemplate {
    /// System message asking for names only
    pub fn ranking_system() -> &'static str {
        "You are a product ranking assistant. Follow the exact format requested. \
List only product names, no descriptions or features."
    }

    /// User prompt requesting a strict numbered list
    pub fn ranking_query(keyword: &str) -> String {
        format!(
            "List top 10 {} with URLs. Format: '1. Product Name - URL'. \
Include source URL for each product. One per line, no descriptions.",
            keyword
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_query_format() {
        let prompt = PromptTemplate::ranking_query("best coffee jar");
        assert!(prompt.starts_with("List top 10 best coffee jar with URLs."));
        assert!(prompt.contains("'1. Product Name - URL'"));
    }

    #[test]
    fn test_system_message_forbids_descriptions() {
        assert!(PromptTemplate::ranking_system().contains("no descriptions"));
    }
}
