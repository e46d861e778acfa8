use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum_macros::{AsRefStr, Display};

/// Primitive types a tool parameter can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterType {
    Integer,
    Number,
    String,
    Boolean,
}

/// A single named parameter in a tool signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: ParameterType,
    pub description: String,
    pub required: bool,
}

/// A tool that can be used by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// Parameters that the tool accepts, in declaration order
    pub parameters: Vec<Parameter>,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a required parameter
    pub fn with_required<N, D>(self, name: N, param_type: ParameterType, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        self.with_parameter(name, param_type, description, true)
    }

    /// Add an optional parameter
    pub fn with_optional<N, D>(self, name: N, param_type: ParameterType, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        self.with_parameter(name, param_type, description, false)
    }

    fn with_parameter<N, D>(
        mut self,
        name: N,
        param_type: ParameterType,
        description: D,
        required: bool,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        self.parameters.push(Parameter {
            name: name.into(),
            param_type,
            description: description.into(),
            required,
        });
        self
    }

    /// Render the parameters as a JSON schema object
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for parameter in &self.parameters {
            properties.insert(
                parameter.name.clone(),
                json!({
                    "type": parameter.param_type,
                    "description": parameter.description,
                }),
            );
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A tool call request that the registry can execute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// The name of the tool to execute
    pub name: String,
    /// The raw JSON arguments, exactly as the provider sent them
    pub arguments: String,
}

impl ToolCall {
    pub fn new<N: Into<String>, A: Into<String>>(name: N, arguments: A) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The payload a tool hands back to the model.
///
/// A failure is the object `{"error": "<message>"}`; anything else is a success.
/// Both are ordinary tool results as far as the transcript is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Failure { error: String },
    Success(Value),
}

impl ToolOutput {
    pub fn success(value: Value) -> Self {
        ToolOutput::Success(value)
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        ToolOutput::Failure {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Failure { .. })
    }

    pub fn to_value(&self) -> Value {
        match self {
            ToolOutput::Failure { error } => json!({ "error": error }),
            ToolOutput::Success(value) => value.clone(),
        }
    }

    /// The serialized form sent back to the model as tool result content
    pub fn to_content(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_schema() {
        let tool = Tool::new("lookup", "Look something up")
            .with_required("query", ParameterType::String, "What to look up")
            .with_optional("limit", ParameterType::Integer, "How many results");

        assert_eq!(
            tool.input_schema(),
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "What to look up"},
                    "limit": {"type": "integer", "description": "How many results"}
                },
                "required": ["query"]
            })
        );
    }

    #[test]
    fn test_tool_output_shapes() {
        let failure = ToolOutput::failure("bad input");
        assert!(failure.is_error());
        assert_eq!(failure.to_content(), r#"{"error":"bad input"}"#);

        let success = ToolOutput::success(json!({"n": 5, "m": 2, "permutations": 20}));
        assert!(!success.is_error());
        assert_eq!(success.to_value()["permutations"], 20);
    }

    #[test]
    fn test_tool_output_deserialize_marker() {
        let failure: ToolOutput = serde_json::from_value(json!({"error": "nope"})).unwrap();
        assert_eq!(failure, ToolOutput::failure("nope"));

        let success: ToolOutput = serde_json::from_value(json!({"count": 3})).unwrap();
        assert!(!success.is_error());
    }
}
