//! The closed set of tools the agent can run.
//!
//! Each [`ToolKind`] owns its wire name, its advertised descriptor and the
//! typed arguments it decodes into. Adding a tool means adding a variant here
//! and a matching [`Invocation`]; the agent loop only ever talks to the
//! [`ToolRegistry`].
pub mod combinatorics;
mod registry;

pub use registry::ToolRegistry;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolOutput};
use combinatorics::SelectionArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, IntoStaticStr)]
pub enum ToolKind {
    #[strum(serialize = "calculate_combinations")]
    Combinations,
    #[strum(serialize = "calculate_permutations")]
    Permutations,
}

impl ToolKind {
    /// The name advertised to the model
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn descriptor(self) -> Tool {
        match self {
            ToolKind::Combinations => combinatorics::combinations_tool(),
            ToolKind::Permutations => combinatorics::permutations_tool(),
        }
    }

    /// Decode a raw JSON argument payload into this tool's typed arguments
    pub fn decode(self, arguments: &str) -> AgentResult<Invocation> {
        match self {
            ToolKind::Combinations => decode_args(self, arguments).map(Invocation::Combinations),
            ToolKind::Permutations => decode_args(self, arguments).map(Invocation::Permutations),
        }
    }
}

/// A decoded call, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Combinations(SelectionArgs),
    Permutations(SelectionArgs),
}

impl Invocation {
    pub fn kind(&self) -> ToolKind {
        match self {
            Invocation::Combinations(_) => ToolKind::Combinations,
            Invocation::Permutations(_) => ToolKind::Permutations,
        }
    }

    /// Run the tool. Domain errors come back as a failure payload; only a result
    /// that cannot be represented as JSON is an error.
    pub fn execute(self) -> AgentResult<ToolOutput> {
        let kind = self.kind();
        match self {
            Invocation::Combinations(args) => into_output(kind, combinatorics::combinations(args)),
            Invocation::Permutations(args) => into_output(kind, combinatorics::permutations(args)),
        }
    }
}

fn decode_args<T: DeserializeOwned>(kind: ToolKind, arguments: &str) -> AgentResult<T> {
    serde_json::from_str(arguments).map_err(|e| AgentError::MalformedToolArguments {
        tool: kind.to_string(),
        reason: e.to_string(),
    })
}

fn into_output<T, E>(kind: ToolKind, result: Result<T, E>) -> AgentResult<ToolOutput>
where
    T: Serialize,
    E: std::fmt::Display,
{
    match result {
        Ok(value) => serde_json::to_value(value)
            .map(ToolOutput::success)
            .map_err(|e| AgentError::ExecutionError(format!("{}: {}", kind, e))),
        Err(e) => Ok(ToolOutput::failure(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_round_trip_through_descriptor() {
        for kind in ToolKind::iter() {
            assert_eq!(kind.descriptor().name, kind.name());
            assert_eq!(ToolKind::from_str(kind.name()).unwrap(), kind);
        }
        assert!(ToolKind::from_str("calculate_factorial").is_err());
    }

    #[test]
    fn test_decode_and_execute() {
        let invocation = ToolKind::Combinations.decode(r#"{"n": 10, "m": 3}"#).unwrap();
        assert_eq!(invocation.kind(), ToolKind::Combinations);
        assert_eq!(
            invocation.execute().unwrap(),
            ToolOutput::success(json!({"n": 10, "m": 3, "combinations": 120}))
        );

        let invocation = ToolKind::Permutations.decode(r#"{"m": 2, "n": 5}"#).unwrap();
        assert_eq!(
            invocation.execute().unwrap(),
            ToolOutput::success(json!({"n": 5, "m": 2, "permutations": 20}))
        );
    }

    #[test]
    fn test_domain_error_is_payload() {
        let output = ToolKind::Combinations
            .decode(r#"{"n": 3, "m": 5}"#)
            .unwrap()
            .execute()
            .unwrap();
        assert_eq!(
            output,
            ToolOutput::failure("Invalid input: n and m must be non-negative integers with m <= n")
        );
    }

    #[test]
    fn test_malformed_arguments() {
        for raw in [
            "not json",
            r#"{"n": 3}"#,
            r#"{"n": "3", "m": 1}"#,
            r#"{"n": 3, "m": 1, "extra": true}"#,
            r#"{"n": 3.5, "m": 1}"#,
        ] {
            let err = ToolKind::Permutations.decode(raw).unwrap_err();
            assert!(
                matches!(err, AgentError::MalformedToolArguments { ref tool, .. } if tool == "calculate_permutations"),
                "{raw}: {err}"
            );
        }
    }
}
