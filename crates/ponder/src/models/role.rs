use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// The author of a turn in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::Tool).unwrap(), "tool");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::System.as_ref(), "system");
    }
}
