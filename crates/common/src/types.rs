//! Core types for the tool surface

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A named, schema-described operation exposed to a calling agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A single tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Map::new(),
        }
    }

    /// Replace the arguments; `null` means none, anything but an object is rejected
    pub fn with_arguments(mut self, arguments: Value) -> Result<Self> {
        match arguments {
            Value::Object(map) => self.arguments = map,
            Value::Null => self.arguments = Map::new(),
            other => {
                return Err(Error::InvalidArguments(format!(
                    "arguments must be an object, got {}",
                    json_kind(&other)
                )))
            }
        }
        Ok(self)
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Content block of a tool response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Content::Text { text } => text,
        }
    }
}

/// Uniform response envelope for every tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }

    /// Concatenated text of all content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_wire_shape() {
        let resp = ToolResponse::error("Error executing foo: Unknown tool: foo");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "content": [{"type": "text", "text": "Error executing foo: Unknown tool: foo"}],
                "isError": true
            })
        );
    }

    #[test]
    fn test_request_defaults_missing_arguments() {
        let req: ToolRequest = serde_json::from_value(json!({"name": "get_test_config"})).unwrap();
        assert_eq!(req.name, "get_test_config");
        assert!(req.arguments.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let req = ToolRequest::new("list_test_files").arg("folder", "login");
        assert_eq!(req.arguments.get("folder"), Some(&json!("login")));

        let req = ToolRequest::new("analyze_test_logs")
            .with_arguments(json!({"limit": 5}))
            .unwrap();
        assert_eq!(req.arguments.get("limit"), Some(&json!(5)));

        let req = ToolRequest::new("get_test_config")
            .with_arguments(Value::Null)
            .unwrap();
        assert!(req.arguments.is_empty());
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        for bad in [json!("playwright"), json!([1, 2]), json!(3), json!(true)] {
            let err = ToolRequest::new("get_test_results")
                .with_arguments(bad)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArguments(_)));
        }
        let err = ToolRequest::new("get_test_results")
            .with_arguments(json!("playwright"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments: arguments must be an object, got a string"
        );
    }
}
