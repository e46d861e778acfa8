use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, ToolRequest};
use crate::models::transcript::Transcript;
use crate::providers::base::{CompletionRequest, Provider, ToolChoice};
use crate::tools::ToolRegistry;

/// Returned in place of an answer when the iteration budget runs out
pub const EXHAUSTED_MESSAGE: &str =
    "Error: Maximum iterations reached without getting a final answer.";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,
    /// Upper bound on model calls per run
    pub max_iterations: usize,
    /// Whether the provider may return several tool calls in one turn.
    /// Calls in a turn are always executed one after another.
    pub parallel_tool_calls: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel_tool_calls: false,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model produced a final answer
    Done(String),
    /// The iteration budget ran out before a final answer
    Exhausted,
}

impl Outcome {
    /// The final answer, or the exhaustion sentinel
    pub fn text(&self) -> &str {
        match self {
            Outcome::Done(text) => text,
            Outcome::Exhausted => EXHAUSTED_MESSAGE,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}

enum State {
    AwaitingModel,
    DispatchingTools(Vec<ToolRequest>),
    Done(String),
    Exhausted,
}

/// Agent drives a model through a reason / act / observe loop over a fixed set of tools
pub struct Agent {
    provider: Box<dyn Provider>,
    registry: ToolRegistry,
    config: AgentConfig,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider>, registry: ToolRegistry, config: AgentConfig) -> Self {
        Self {
            provider,
            registry,
            config,
        }
    }

    /// Run the loop until the model answers or the budget is spent.
    ///
    /// Every turn produced along the way is appended to `transcript`, including
    /// the turns that preceded a fatal error.
    pub async fn run(&self, transcript: &mut Transcript) -> AgentResult<Outcome> {
        let mut iteration = 0;
        let mut state = State::AwaitingModel;

        loop {
            state = match state {
                State::AwaitingModel if iteration >= self.config.max_iterations => {
                    State::Exhausted
                }
                State::AwaitingModel => {
                    iteration += 1;
                    info!(iteration, "calling model");
                    self.next_state(transcript).await?
                }
                State::DispatchingTools(requests) => {
                    for request in &requests {
                        self.dispatch(transcript, request)?;
                    }
                    State::AwaitingModel
                }
                State::Done(text) => {
                    info!(iterations = iteration, "final answer: {}", text);
                    return Ok(Outcome::Done(text));
                }
                State::Exhausted => {
                    warn!(
                        max_iterations = self.config.max_iterations,
                        "iteration budget exhausted without a final answer"
                    );
                    return Ok(Outcome::Exhausted);
                }
            };
        }
    }

    /// Ask the model for the next turn and record it
    async fn next_state(&self, transcript: &mut Transcript) -> AgentResult<State> {
        let pending = transcript.pending_tool_requests();
        if !pending.is_empty() {
            return Err(AgentError::ProtocolViolation(format!(
                "{} tool requests are unanswered before the next model call",
                pending.len()
            )));
        }

        let request = CompletionRequest {
            model: &self.config.model,
            messages: transcript.messages(),
            tools: self.registry.describe(),
            tool_choice: ToolChoice::Auto,
            parallel_tool_calls: self.config.parallel_tool_calls,
        };
        let (response, usage) = self.provider.complete(request).await?;
        debug!(?usage, "model responded");

        let requests: Vec<ToolRequest> = response.tool_requests().into_iter().cloned().collect();

        if requests.is_empty() {
            let text = response.text().unwrap_or_default();
            if text.is_empty() {
                warn!("model returned neither text nor tool calls, treating as an empty answer");
            }
            transcript.push(Message::assistant().with_text(text.clone()))?;
            Ok(State::Done(text))
        } else {
            transcript.push(response)?;
            Ok(State::DispatchingTools(requests))
        }
    }

    /// Execute one tool request and append its result
    fn dispatch(&self, transcript: &mut Transcript, request: &ToolRequest) -> AgentResult<()> {
        let call = &request.tool_call;
        info!(id = %request.id, tool = %call.name, arguments = %call.arguments, "executing tool");

        let output = self.registry.invoke(&call.name, &call.arguments)?;
        info!(id = %request.id, result = %output.to_content(), "tool result");

        transcript.push(Message::tool().with_tool_response(&request.id, &call.name, output))
    }
}
