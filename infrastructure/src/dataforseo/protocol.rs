//! DataForSEO wire types for the AI optimization endpoints.
//!
//! Every response is an envelope:
//!
//! ```text
//! { status_code, status_message, tasks: [ { status_code, status_message, result: [..] } ] }
//! ```
//!
//! Both status codes must be [`STATUS_OK`] for the result to be trusted.

use super::error::{DataForSeoError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: u32 = 20000;

/// One `llm_responses/live` task; the request body is a one-element array of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTask {
    pub user_prompt: String,
    pub model_name: String,
    pub system_message: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_country_iso_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub tasks: Option<Vec<Task<T>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Task<T> {
    #[serde(default)]
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<T>>,
}

impl<T> Envelope<T> {
    /// Check both status levels and return the first task's results.
    pub fn into_results(self) -> Result<Vec<T>> {
        if self.status_code != STATUS_OK {
            return Err(DataForSeoError::Api(message_or_code(
                self.status_message,
                self.status_code,
            )));
        }

        let task = self
            .tasks
            .and_then(|tasks| tasks.into_iter().next())
            .ok_or_else(|| DataForSeoError::Task("response contained no task".to_string()))?;

        if task.status_code != STATUS_OK {
            return Err(DataForSeoError::Task(message_or_code(
                task.status_message,
                task.status_code,
            )));
        }

        Ok(task.result.unwrap_or_default())
    }
}

fn message_or_code(message: Option<String>, code: u32) -> String {
    message.unwrap_or_else(|| format!("status {}", code))
}

/// Result object of a live query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveResult {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<Value>>,
    /// Older response shape
    #[serde(default)]
    pub content: Option<Vec<Value>>,
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub money_spent: Option<f64>,
    #[serde(default)]
    pub web_search: Option<bool>,
}

impl LiveResult {
    /// Concatenate every text section, separated by blank lines.
    ///
    /// An element's `sections` are used when present; otherwise the element
    /// itself is treated as a section. A section counts when its `type` is
    /// `"text"` or missing and it carries a string `text`.
    pub fn text(&self) -> String {
        let elements: &[Value] = match (&self.items, &self.content) {
            (Some(items), _) if !items.is_empty() => items.as_slice(),
            (_, Some(content)) => content.as_slice(),
            _ => &[],
        };

        let mut parts: Vec<&str> = Vec::new();
        for element in elements {
            let sections = match element.get("sections").and_then(Value::as_array) {
                Some(sections) if !sections.is_empty() => sections.iter().collect::<Vec<_>>(),
                _ => vec![element],
            };

            for section in sections {
                let is_text = match section.get("type").and_then(Value::as_str) {
                    Some(kind) => kind == "text",
                    None => section.get("type").is_none(),
                };
                if is_text && let Some(text) = section.get("text").and_then(Value::as_str) {
                    parts.push(text);
                }
            }
        }

        parts.join("\n\n").trim().to_string()
    }
}

/// One entry of a `llm_responses/models` listing
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub model_name: String,
    #[serde(default)]
    pub web_search_supported: Option<bool>,
}

/// Decode a response body, keeping a short excerpt when it is not valid JSON.
pub fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    serde_json::from_str(body).map_err(|e| {
        let excerpt: String = body.chars().take(200).collect();
        DataForSeoError::MalformedPayload(format!("{} (body: {})", e, excerpt))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn live(result: Value) -> LiveResult {
        serde_json::from_value(result).unwrap()
    }

    #[test]
    fn test_text_from_sections() {
        let result = live(json!({
            "items": [
                {"type": "message", "sections": [
                    {"type": "text", "text": "1. OXO POP"},
                    {"type": "annotation", "text": "ignored"},
                    {"type": "text", "text": "2. Airscape"}
                ]}
            ]
        }));
        assert_eq!(result.text(), "1. OXO POP\n\n2. Airscape");
    }

    #[test]
    fn test_text_from_flat_items_and_content() {
        let result = live(json!({"items": [{"text": " 1. Fellow Atmos "}]}));
        assert_eq!(result.text(), "1. Fellow Atmos");

        let result = live(json!({
            "items": [],
            "content": [{"type": "text", "text": "1. Coffee Gator"}]
        }));
        assert_eq!(result.text(), "1. Coffee Gator");

        assert_eq!(live(json!({"items": null})).text(), "");
    }

    #[test]
    fn test_envelope_status_checks() {
        let ok: Envelope<ModelEntry> = decode(
            &json!({
                "status_code": 20000,
                "tasks": [{"status_code": 20000, "result": [{"model_name": "sonar"}]}]
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(ok.into_results().unwrap()[0].model_name, "sonar");

        let api: Envelope<ModelEntry> = decode(
            &json!({"status_code": 40100, "status_message": "You are not authorized"}).to_string(),
        )
        .unwrap();
        assert_eq!(
            api.into_results().unwrap_err().to_string(),
            "DataForSEO API error: You are not authorized"
        );

        let task: Envelope<ModelEntry> = decode(
            &json!({
                "status_code": 20000,
                "tasks": [{"status_code": 40501, "status_message": "Invalid Field"}]
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(
            task.into_results().unwrap_err().to_string(),
            "Task error: Invalid Field"
        );
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = decode::<ModelEntry>("<html>gateway</html>").unwrap_err();
        assert!(matches!(err, DataForSeoError::MalformedPayload(_)));
    }

    #[test]
    fn test_live_task_omits_unset_fields() {
        let task = LiveTask {
            user_prompt: "p".to_string(),
            model_name: "sonar".to_string(),
            system_message: "s".to_string(),
            max_output_tokens: 800,
            temperature: 0.2,
            web_search: None,
            web_search_country_iso_code: Some("us".to_string()),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("web_search").is_none());
        assert_eq!(value["web_search_country_iso_code"], "us");
    }
}
