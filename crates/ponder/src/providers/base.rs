use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::message::Message;
use crate::models::tool::Tool;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// How the model may choose among the advertised tools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
}

/// Everything a provider needs for one completion
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    /// The full transcript, starting with the system turn
    pub messages: &'a [Message],
    pub tools: &'a [Tool],
    pub tool_choice: ToolChoice,
    pub parallel_tool_calls: bool,
}

/// Base trait for AI providers (OpenAI, etc)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next assistant message for the given transcript
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<(Message, Usage)>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usage_creation() {
        let usage = Usage::new(Some(10), Some(20), Some(30));
        assert_eq!(usage.input_tokens, Some(10));
        assert_eq!(usage.output_tokens, Some(20));
        assert_eq!(usage.total_tokens, Some(30));
        assert_eq!(Usage::default().total_tokens, None);
    }

    #[test]
    fn test_tool_choice_wire_names() -> Result<()> {
        assert_eq!(serde_json::to_value(ToolChoice::Auto)?, json!("auto"));
        assert_eq!(ToolChoice::default(), ToolChoice::Auto);
        Ok(())
    }
}
