use serde::Serialize;

use super::message::{Message, MessageContent, ToolRequest};
use super::role::Role;
use crate::errors::{AgentError, AgentResult};

/// The ordered, append-only history of a run.
///
/// A transcript always starts with a system turn. Appends are checked so that
/// an assistant turn asking for tools is followed by exactly one tool response
/// per request, in request order, before any other turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with the given system prompt
    pub fn new<S: Into<String>>(system_prompt: S) -> Self {
        Self {
            messages: vec![Message::system().with_text(system_prompt)],
        }
    }

    /// Append a user turn, builder style
    pub fn with_user<S: Into<String>>(mut self, text: S) -> AgentResult<Self> {
        self.push(Message::user().with_text(text))?;
        Ok(self)
    }

    /// Build a transcript from existing messages, validating every append
    pub fn from_messages(messages: Vec<Message>) -> AgentResult<Self> {
        let mut iter = messages.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| AgentError::InvalidTranscript("transcript is empty".to_string()))?;
        if first.role != Role::System {
            return Err(AgentError::InvalidTranscript(format!(
                "transcript must begin with a system turn, found {}",
                first.role
            )));
        }
        check_content_roles(&first)?;

        let mut transcript = Self {
            messages: vec![first],
        };
        for message in iter {
            transcript.push(message)?;
        }
        Ok(transcript)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Requests from the most recent assistant turn that have no response yet, in order
    pub fn pending_tool_requests(&self) -> Vec<&ToolRequest> {
        let answered = self
            .messages
            .iter()
            .rev()
            .take_while(|m| m.role == Role::Tool)
            .map(|m| m.tool_responses().len())
            .sum::<usize>();

        let Some(asker) = self.messages.iter().rev().find(|m| m.role != Role::Tool) else {
            return Vec::new();
        };
        if asker.role != Role::Assistant {
            return Vec::new();
        }

        asker.tool_requests().into_iter().skip(answered).collect()
    }

    /// Append a turn, enforcing the request/response alternation
    pub fn push(&mut self, message: Message) -> AgentResult<()> {
        check_content_roles(&message)?;

        let pending: Vec<String> = self
            .pending_tool_requests()
            .iter()
            .map(|r| r.id.clone())
            .collect();

        if message.role == Role::Tool {
            let responses = message.tool_responses();
            if responses.is_empty() {
                return Err(AgentError::ProtocolViolation(
                    "tool turn carries no tool response".to_string(),
                ));
            }
            if responses.len() > pending.len() {
                return Err(AgentError::ProtocolViolation(format!(
                    "tool turn answers {} requests but only {} are outstanding",
                    responses.len(),
                    pending.len()
                )));
            }
            for (response, expected) in responses.iter().zip(pending.iter()) {
                if &response.id != expected {
                    return Err(AgentError::ProtocolViolation(format!(
                        "tool response {} does not match the next outstanding request {}",
                        response.id, expected
                    )));
                }
            }
        } else if !pending.is_empty() {
            return Err(AgentError::ProtocolViolation(format!(
                "cannot append a {} turn while tool requests are outstanding: {}",
                message.role,
                pending.join(", ")
            )));
        }

        self.messages.push(message);
        Ok(())
    }
}

impl TryFrom<Vec<Message>> for Transcript {
    type Error = AgentError;

    fn try_from(messages: Vec<Message>) -> AgentResult<Self> {
        Self::from_messages(messages)
    }
}

fn check_content_roles(message: &Message) -> AgentResult<()> {
    for content in &message.content {
        match content {
            MessageContent::ToolRequest(request) if message.role != Role::Assistant => {
                return Err(AgentError::ProtocolViolation(format!(
                    "tool request {} in a {} turn",
                    request.id, message.role
                )));
            }
            MessageContent::ToolResponse(response) if message.role != Role::Tool => {
                return Err(AgentError::ProtocolViolation(format!(
                    "tool response {} in a {} turn",
                    response.id, message.role
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
