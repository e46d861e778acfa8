use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

/// Convert the transcript to OpenAI's API message specification
///
/// Each tool response becomes its own `tool` message, so a tool turn that
/// carries several responses expands into several wire messages in order.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role
        });
        let mut tool_calls = Vec::new();
        let mut output = Vec::new();

        if let Some(text) = message.text() {
            converted["content"] = json!(text);
        }

        for content in &message.content {
            match content {
                MessageContent::Text(_) => {}
                MessageContent::ToolRequest(request) => {
                    tool_calls.push(json!({
                        "id": request.id,
                        "type": "function",
                        "function": {
                            "name": request.tool_call.name,
                            "arguments": request.tool_call.arguments,
                        }
                    }));
                }
                MessageContent::ToolResponse(response) => {
                    output.push(json!({
                        "role": "tool",
                        "tool_call_id": response.id,
                        "name": response.name,
                        "content": response.output.to_content(),
                    }));
                }
            }
        }

        if !tool_calls.is_empty() {
            if converted.get("content").is_none() {
                converted["content"] = Value::Null;
            }
            converted["tool_calls"] = json!(tool_calls);
        }

        if message.role != Role::Tool {
            messages_spec.push(converted);
        }
        messages_spec.extend(output);
    }

    messages_spec
}

/// Convert the tool catalog to OpenAI's API tool specification
pub fn tools_to_openai_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.input_schema(),
            }
        }));
    }

    Ok(result)
}

/// Convert OpenAI's API response to an assistant message
///
/// Tool call arguments are kept as the raw string the API returned; decoding
/// them is the registry's job.
pub fn openai_response_to_message(response: Value) -> Result<Message> {
    let original = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| anyhow!("No message in response: {}", response))?;

    let mut message = Message::assistant();

    if let Some(text) = original.get("content").and_then(|t| t.as_str()) {
        if !text.is_empty() {
            message = message.with_text(text);
        }
    }

    if let Some(tool_calls) = original.get("tool_calls").and_then(|t| t.as_array()) {
        for tool_call in tool_calls {
            let id = tool_call["id"]
                .as_str()
                .ok_or_else(|| anyhow!("Tool call without an id: {}", tool_call))?;
            let function_name = tool_call["function"]["name"]
                .as_str()
                .ok_or_else(|| anyhow!("Tool call {} without a function name", id))?;
            let arguments = tool_call["function"]["arguments"]
                .as_str()
                .unwrap_or_default();

            message = message.with_tool_request(id, ToolCall::new(function_name, arguments));
        }
    }

    Ok(message)
}

#[derive(Debug, thiserror::Error)]
#[error("Context length exceeded. Message: {0}")]
pub struct ContextLengthExceededError(String);

pub fn check_openai_context_length_error(error: &Value) -> Option<ContextLengthExceededError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ContextLengthExceededError(message))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tool::{ParameterType, ToolOutput};

    const OPENAI_TOOL_USE_RESPONSE: &str = r#"{
        "choices": [{
            "role": "assistant",
            "message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "calculate_combinations",
                        "arguments": "{\"n\": 10, \"m\": 3}"
                    }
                }, {
                    "id": "call_2",
                    "type": "function",
                    "function": {
                        "name": "calculate_permutations",
                        "arguments": "{\"n\": 10, \"m\": 3}"
                    }
                }]
            }
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 25,
            "total_tokens": 35
        }
    }"#;

    #[test]
    fn test_messages_to_openai_spec() -> Result<()> {
        let messages = vec![
            Message::system().with_text("Be helpful"),
            Message::user().with_text("Hello"),
        ];
        let spec = messages_to_openai_spec(&messages);

        assert_eq!(spec.len(), 2);
        assert_eq!(spec[0], json!({"role": "system", "content": "Be helpful"}));
        assert_eq!(spec[1], json!({"role": "user", "content": "Hello"}));
        Ok(())
    }

    #[test]
    fn test_messages_to_openai_spec_tool_round() -> Result<()> {
        let messages = vec![
            Message::assistant().with_tool_request(
                "call_1",
                ToolCall::new("calculate_combinations", r#"{"n":10,"m":3}"#),
            ),
            Message::tool().with_tool_response(
                "call_1",
                "calculate_combinations",
                ToolOutput::success(json!({"n": 10, "m": 3, "combinations": 120})),
            ),
            Message::tool().with_tool_response(
                "call_2",
                "calculate_combinations",
                ToolOutput::failure("Invalid input"),
            ),
        ];
        let spec = messages_to_openai_spec(&messages);

        assert_eq!(spec.len(), 3);
        assert_eq!(spec[0]["role"], "assistant");
        assert_eq!(spec[0]["content"], Value::Null);
        assert_eq!(spec[0]["tool_calls"][0]["id"], "call_1");
        assert_eq!(spec[0]["tool_calls"][0]["type"], "function");
        assert_eq!(
            spec[0]["tool_calls"][0]["function"]["arguments"],
            r#"{"n":10,"m":3}"#
        );

        assert_eq!(spec[1]["role"], "tool");
        assert_eq!(spec[1]["tool_call_id"], "call_1");
        assert_eq!(spec[1]["name"], "calculate_combinations");
        let content: Value = serde_json::from_str(spec[1]["content"].as_str().unwrap())?;
        assert_eq!(content["combinations"], 120);

        assert_eq!(spec[2]["content"], r#"{"error":"Invalid input"}"#);
        Ok(())
    }

    #[test]
    fn test_tools_to_openai_spec() -> Result<()> {
        let tool = Tool::new("test_tool", "A test tool").with_required(
            "input",
            ParameterType::String,
            "Test parameter",
        );

        let spec = tools_to_openai_spec(&[tool])?;

        assert_eq!(spec.len(), 1);
        assert_eq!(spec[0]["type"], "function");
        assert_eq!(spec[0]["function"]["name"], "test_tool");
        assert_eq!(spec[0]["function"]["parameters"]["required"], json!(["input"]));
        Ok(())
    }

    #[test]
    fn test_tools_to_openai_spec_duplicate() -> Result<()> {
        let tool = Tool::new("test_tool", "A test tool");
        let result = tools_to_openai_spec(&[tool.clone(), tool]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate tool name"));
        Ok(())
    }

    #[test]
    fn test_openai_response_to_message_text() -> Result<()> {
        let response = json!({
            "choices": [{
                "role": "assistant",
                "message": {
                    "content": "Hello from John Cena!"
                }
            }],
        });

        let message = openai_response_to_message(response)?;
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text().as_deref(), Some("Hello from John Cena!"));
        assert!(!message.has_tool_requests());
        Ok(())
    }

    #[test]
    fn test_openai_response_to_message_tool_calls() -> Result<()> {
        let response: Value = serde_json::from_str(OPENAI_TOOL_USE_RESPONSE)?;
        let message = openai_response_to_message(response)?;

        assert_eq!(message.text(), None);
        let requests = message.tool_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, "call_1");
        assert_eq!(requests[0].tool_call.name, "calculate_combinations");
        assert_eq!(requests[0].tool_call.arguments, r#"{"n": 10, "m": 3}"#);
        assert_eq!(requests[1].tool_call.name, "calculate_permutations");
        Ok(())
    }

    #[test]
    fn test_openai_response_to_message_empty() -> Result<()> {
        let response = json!({"choices": [{"message": {"content": null}}]});
        let message = openai_response_to_message(response)?;
        assert!(message.content.is_empty());

        let result = openai_response_to_message(json!({"choices": []}));
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_check_openai_context_length_error() {
        let error = json!({
            "code": "context_length_exceeded",
            "message": "This message is too long"
        });
        let result = check_openai_context_length_error(&error);
        assert!(result.is_some());
        assert_eq!(
            result.unwrap().to_string(),
            "Context length exceeded. Message: This message is too long"
        );

        let error = json!({
            "code": "other_error",
            "message": "Some other error"
        });
        assert!(check_openai_context_length_error(&error).is_none());
    }
}
