use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::str::FromStr;
use strum::IntoEnumIterator;

use super::ToolKind;
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolOutput};

lazy_static! {
    static ref FUNCTION_NAME: Regex = Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").unwrap();
}

/// The fixed catalog of tools offered to the model during a run
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    kinds: Vec<ToolKind>,
    catalog: Vec<Tool>,
}

impl ToolRegistry {
    /// Register the given tools, in the order they will be advertised
    pub fn new<I>(kinds: I) -> AgentResult<Self>
    where
        I: IntoIterator<Item = ToolKind>,
    {
        let mut seen = HashSet::new();
        let mut registered = Vec::new();
        let mut catalog = Vec::new();

        for kind in kinds {
            let tool = kind.descriptor();
            if !FUNCTION_NAME.is_match(&tool.name) {
                return Err(AgentError::InvalidToolName(tool.name));
            }
            if !seen.insert(kind) {
                return Err(AgentError::DuplicateTool(tool.name));
            }
            registered.push(kind);
            catalog.push(tool);
        }

        Ok(Self {
            kinds: registered,
            catalog,
        })
    }

    /// Every known tool, in declaration order
    pub fn all() -> Self {
        Self {
            kinds: ToolKind::iter().collect(),
            catalog: ToolKind::iter().map(ToolKind::descriptor).collect(),
        }
    }

    /// The tool signatures to advertise to the model
    pub fn describe(&self) -> &[Tool] {
        &self.catalog
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Find a registered tool by its advertised name
    pub fn lookup(&self, name: &str) -> AgentResult<ToolKind> {
        ToolKind::from_str(name)
            .ok()
            .filter(|kind| self.kinds.contains(kind))
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))
    }

    /// Decode the raw arguments for `name` and run the tool
    pub fn invoke(&self, name: &str, arguments: &str) -> AgentResult<ToolOutput> {
        let kind = self.lookup(name)?;
        kind.decode(arguments)?.execute()
    }
}
