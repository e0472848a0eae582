//! Converts runner output items into the client-facing message list and
//! event trail, and tracks which agent is active at the end of the turn.
//!
//! Classification never mutates session context. Context changes happen only
//! inside tools and handoff hooks, which the runner has already executed.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use vitalis_contracts::{
    conversation::RunItem,
    event::{AgentEvent, EventKind, MessageResponse},
};

use crate::{config::OrchestratorConfig, registry::AgentRegistry};

/// What one turn produced, in runner order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub messages: Vec<MessageResponse>,
    pub events: Vec<AgentEvent>,
    /// The agent holding control after the last handoff.
    pub active_agent: String,
}

/// Walk `items` in order, starting with `starting_agent` in control.
///
/// A handoff is followed only along an edge `registry` declares; anything
/// else is logged and dropped so the active agent always stays reachable
/// from the previous one.
pub fn classify_items(
    items: &[RunItem],
    registry: &AgentRegistry,
    starting_agent: &str,
    config: &OrchestratorConfig,
) -> Transcript {
    let mut messages = Vec::new();
    let mut events = Vec::new();
    let mut active_agent = starting_agent.to_string();

    for item in items {
        match item {
            RunItem::Message { agent, content } => {
                messages.push(MessageResponse::new(content.clone(), agent.clone()));
                events.push(AgentEvent::new(EventKind::Message, agent.clone(), content.clone()));
            }

            RunItem::Handoff { source_agent, target_agent } => {
                if *source_agent != active_agent {
                    warn!(
                        from = %source_agent,
                        to = %target_agent,
                        active = %active_agent,
                        "runner reported a handoff from an inactive agent, ignoring"
                    );
                    continue;
                }
                let Some(edge) = registry.edge(&active_agent, target_agent) else {
                    warn!(
                        from = %source_agent,
                        to = %target_agent,
                        "runner reported an undeclared handoff, ignoring"
                    );
                    continue;
                };

                let mut metadata = Map::new();
                metadata.insert("source_agent".to_string(), Value::String(source_agent.clone()));
                metadata.insert("target_agent".to_string(), Value::String(target_agent.clone()));
                events.push(
                    AgentEvent::new(
                        EventKind::Handoff,
                        source_agent.clone(),
                        format!("{} -> {}", source_agent, target_agent),
                    )
                    .with_metadata(metadata),
                );

                if let Some(hook) = edge.hook {
                    events.push(AgentEvent::new(EventKind::ToolCall, target_agent.clone(), hook.name));
                }

                debug!(from = %source_agent, to = %target_agent, "active agent changed");
                active_agent = target_agent.clone();
            }

            RunItem::ToolCall { agent, tool, arguments } => {
                let mut metadata = Map::new();
                metadata.insert("tool_args".to_string(), parse_tool_arguments(tool, arguments));
                events.push(
                    AgentEvent::new(EventKind::ToolCall, agent.clone(), tool.clone())
                        .with_metadata(metadata),
                );

                if *tool == config.workout_selector_tool {
                    messages.push(MessageResponse::new(
                        config.workout_selector_sentinel.clone(),
                        agent.clone(),
                    ));
                }
            }

            RunItem::ToolOutput { agent, output } => {
                let mut metadata = Map::new();
                metadata.insert("tool_result".to_string(), Value::String(output.clone()));
                events.push(
                    AgentEvent::new(EventKind::ToolOutput, agent.clone(), output.clone())
                        .with_metadata(metadata),
                );
            }
        }
    }

    Transcript { messages, events, active_agent }
}

/// Decode JSON-encoded string arguments for display. Anything that does not
/// parse is passed through unchanged.
fn parse_tool_arguments(tool: &str, arguments: &Value) -> Value {
    match arguments {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(tool = %tool, error = %e, "tool arguments are not valid JSON, keeping raw form");
                arguments.clone()
            }
        },
        other => other.clone(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
