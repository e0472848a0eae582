//! Agent personas and the handoff graph between them.
//!
//! The registry is built once at startup and never changes. Its graph is a
//! star: the root agent has an edge to every specialist, and each specialist
//! has exactly one edge, back to the root. Construction rejects any other
//! shape, so a handoff chain can only alternate root → specialist → root.

use std::{collections::HashSet, fmt, sync::Arc};

use tracing::{info, warn};

use vitalis_contracts::{
    context::SessionContext,
    error::{VitalisError, VitalisResult},
    turn::AgentSummary,
};

use crate::traits::{Guardrail, Tool};

/// Builds an agent's system prompt from the current session facts.
pub type InstructionsFn = fn(&SessionContext) -> String;

/// Side effect attached to a handoff edge, run once when the edge is taken
/// and before the target agent sees any input.
#[derive(Clone, Copy)]
pub struct HandoffHook {
    /// Reported as the content of the synthesized tool-call event.
    pub name: &'static str,
    pub apply: fn(&mut SessionContext),
}

impl HandoffHook {
    pub const fn new(name: &'static str, apply: fn(&mut SessionContext)) -> Self {
        Self { name, apply }
    }
}

impl fmt::Debug for HandoffHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandoffHook").field("name", &self.name).finish()
    }
}

/// A permitted transition to `target`.
#[derive(Debug, Clone)]
pub struct HandoffEdge {
    pub target: String,
    pub hook: Option<HandoffHook>,
}

impl HandoffEdge {
    pub fn to(target: impl Into<String>) -> Self {
        Self { target: target.into(), hook: None }
    }

    pub fn with_hook(mut self, hook: HandoffHook) -> Self {
        self.hook = Some(hook);
        self
    }
}

/// One agent persona and its capabilities.
#[derive(Clone)]
pub struct AgentDescriptor {
    pub name: String,
    pub model: String,
    /// One-line summary shown in the roster.
    pub description: String,
    pub instructions: InstructionsFn,
    pub tools: Vec<Arc<dyn Tool>>,
    /// Evaluated in order before this agent runs.
    pub input_guardrails: Vec<Arc<dyn Guardrail>>,
    pub handoffs: Vec<HandoffEdge>,
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>, model: impl Into<String>, instructions: InstructionsFn) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            description: String::new(),
            instructions,
            tools: Vec::new(),
            input_guardrails: Vec::new(),
            handoffs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_guardrail(mut self, guardrail: Arc<dyn Guardrail>) -> Self {
        self.input_guardrails.push(guardrail);
        self
    }

    pub fn with_handoff(mut self, edge: HandoffEdge) -> Self {
        self.handoffs.push(edge);
        self
    }

    /// Render this agent's instructions for `context`.
    pub fn instructions_for(&self, context: &SessionContext) -> String {
        (self.instructions)(context)
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn edge_to(&self, target: &str) -> Option<&HandoffEdge> {
        self.handoffs.iter().find(|e| e.target == target)
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            handoffs: self.handoffs.iter().map(|e| e.target.clone()).collect(),
            tools: self.tools.iter().map(|t| t.name().to_string()).collect(),
            input_guardrails: self
                .input_guardrails
                .iter()
                .map(|g| g.name().to_string())
                .collect(),
        }
    }
}

impl fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field(
                "input_guardrails",
                &self.input_guardrails.iter().map(|g| g.name()).collect::<Vec<_>>(),
            )
            .field("handoffs", &self.handoffs)
            .finish()
    }
}

/// The static roster plus its validated handoff graph.
#[derive(Debug)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
    root: usize,
}

impl AgentRegistry {
    /// Build a registry rooted at `root`.
    ///
    /// Returns `ConfigError` if names repeat, `root` is missing, an edge
    /// targets an unknown agent, the root cannot reach some specialist, or a
    /// specialist has anything other than a single edge back to the root.
    pub fn new(root: &str, agents: Vec<AgentDescriptor>) -> VitalisResult<Self> {
        let mut names = HashSet::new();
        for agent in &agents {
            if !names.insert(agent.name.as_str()) {
                return Err(config_error(format!("duplicate agent name '{}'", agent.name)));
            }
        }

        let root_idx = agents
            .iter()
            .position(|a| a.name == root)
            .ok_or_else(|| config_error(format!("root agent '{}' is not registered", root)))?;

        for agent in &agents {
            for edge in &agent.handoffs {
                if !names.contains(edge.target.as_str()) {
                    return Err(config_error(format!(
                        "agent '{}' hands off to unknown agent '{}'",
                        agent.name, edge.target
                    )));
                }
                if edge.target == agent.name {
                    return Err(config_error(format!("agent '{}' hands off to itself", agent.name)));
                }
            }
        }

        let root_agent = &agents[root_idx];
        for agent in agents.iter().filter(|a| a.name != root) {
            let back_to_root = agent.handoffs.len() == 1 && agent.handoffs[0].target == root;
            if !back_to_root {
                return Err(config_error(format!(
                    "agent '{}' must have exactly one handoff, back to '{}'",
                    agent.name, root
                )));
            }
            if root_agent.edge_to(&agent.name).is_none() {
                return Err(config_error(format!(
                    "root agent '{}' has no handoff to '{}'",
                    root, agent.name
                )));
            }
        }

        Ok(Self { agents, root: root_idx })
    }

    pub fn root(&self) -> &AgentDescriptor {
        &self.agents[self.root]
    }

    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Look up `name`, falling back to the root agent when it is unknown.
    pub fn resolve(&self, name: &str) -> &AgentDescriptor {
        match self.get(name) {
            Some(agent) => agent,
            None => {
                warn!(agent = %name, root = %self.root().name, "unknown agent, falling back to root");
                self.root()
            }
        }
    }

    /// The declared edge from `from` to `to`, if any.
    pub fn edge(&self, from: &str, to: &str) -> Option<&HandoffEdge> {
        self.get(from).and_then(|agent| agent.edge_to(to))
    }

    /// Take the edge `from` → `to`, running its hook against `context`.
    ///
    /// Returns the target descriptor. Fails with `IllegalHandoff` when the
    /// edge is not declared; `context` is untouched in that case.
    pub fn handoff(
        &self,
        from: &str,
        to: &str,
        context: &mut SessionContext,
    ) -> VitalisResult<&AgentDescriptor> {
        let edge = self.edge(from, to).ok_or_else(|| VitalisError::IllegalHandoff {
            from: from.to_string(),
            to: to.to_string(),
        })?;
        let target = self.get(&edge.target).ok_or_else(|| VitalisError::IllegalHandoff {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        if let Some(hook) = edge.hook {
            (hook.apply)(context);
        }

        info!(
            from = %from,
            to = %to,
            hook = edge.hook.map(|h| h.name).unwrap_or("none"),
            "handoff"
        );
        Ok(target)
    }

    /// Agents in registration order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter()
    }

    /// The roster as reported to clients.
    pub fn roster(&self) -> Vec<AgentSummary> {
        self.agents.iter().map(AgentDescriptor::summary).collect()
    }
}

fn config_error(reason: String) -> VitalisError {
    VitalisError::ConfigError { reason }
}

// ── Tests ────────────────────────────────────────────────────────────────────
