//! The turn orchestrator: one request/response cycle per user message.
//!
//! Every turn follows the same pipeline:
//!
//!   Load/Create → Guardrails → [AgentRunner::run] → Classify → Diff → Persist
//!
//! `AgentRunner::run()` is never called for a turn whose guardrails tripped,
//! and never for an empty message. State is only written back once the whole
//! pipeline has succeeded, so a failed turn leaves the store untouched.

use std::sync::Arc;

use tracing::{debug, error, info};

use vitalis_contracts::{
    context::SessionContext,
    conversation::{ConversationId, ConversationState, InputItem, RunOutput},
    error::{VitalisError, VitalisResult},
    event::{AgentEvent, MessageResponse},
    guardrail::GuardrailCheck,
    turn::{HealthStatus, TurnOutcome, TurnRequest, TurnResponse, TurnResult},
};

use crate::{
    classify::classify_items,
    config::{OrchestratorConfig, UnknownConversationPolicy},
    diff::context_update_event,
    guardrail::{evaluate_guardrails, GuardrailOutcome},
    registry::{AgentDescriptor, AgentRegistry},
    traits::{AgentRunner, ConversationStore},
};

/// Drives turns for every conversation.
///
/// One orchestrator serves all conversations; it holds no per-conversation
/// state of its own. Two concurrent turns for the same id both load, both
/// run, and the later `save` wins.
pub struct TurnOrchestrator {
    registry: Arc<AgentRegistry>,
    runner: Arc<dyn AgentRunner>,
    store: Arc<dyn ConversationStore>,
    config: OrchestratorConfig,
}

impl TurnOrchestrator {
    pub fn new(
        registry: Arc<AgentRegistry>,
        runner: Arc<dyn AgentRunner>,
        store: Arc<dyn ConversationStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self { registry, runner, store, config }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Liveness probe. Independent of turn processing.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// Run one turn and flatten the outcome for a transport layer.
    ///
    /// Refusals come back as ordinary turn bodies; any error becomes a
    /// `Failure` body with status 500.
    pub async fn respond(&self, request: TurnRequest) -> TurnResponse {
        match self
            .submit_turn(request.conversation_id.as_deref(), &request.message)
            .await
        {
            Ok(outcome) => TurnResponse::Turn(Box::new(outcome.into_result())),
            Err(e) => {
                error!(
                    conversation_id = request.conversation_id.as_deref().unwrap_or("<new>"),
                    error = %e,
                    "turn failed"
                );
                TurnResponse::Failure { error: e.to_string() }
            }
        }
    }

    /// Execute one turn for `message`.
    ///
    /// # Pipeline
    ///
    /// 1. Load the conversation, or create one when the id is absent/unknown
    /// 2. Empty message → persist a new conversation if needed, return `Started`
    /// 3. Run the active agent's guardrails; a tripwire records the refusal
    ///    in the history and returns `Refused`
    /// 4. Append the message and call the runner (**only reachable after 3**)
    /// 5. Classify the produced items, following declared handoffs
    /// 6. Diff the context against the pre-run snapshot
    /// 7. Persist history, context and active agent
    ///
    /// # Errors
    ///
    /// `UnknownConversation` when the id is unknown and the policy rejects,
    /// and any guardrail, runner or store error. Nothing is persisted on error.
    pub async fn submit_turn(
        &self,
        conversation_id: Option<&str>,
        message: &str,
    ) -> VitalisResult<TurnOutcome> {
        // ── Step 1: Load or create ───────────────────────────────────────────
        let (conversation_id, mut state, is_new) = self.load_or_create(conversation_id).await?;
        let agent = self.registry.resolve(&state.current_agent);

        // ── Step 2: Session-start ping ───────────────────────────────────────
        if message.trim().is_empty() {
            if is_new {
                self.store.save(&conversation_id, state.clone()).await?;
            }
            debug!(conversation_id = %conversation_id, "empty message, no agent invoked");
            return Ok(TurnOutcome::Started(self.build_result(
                conversation_id,
                agent,
                Vec::new(),
                Vec::new(),
                state.context,
                Vec::new(),
            )));
        }

        debug!(
            conversation_id = %conversation_id,
            agent = %agent.name,
            history = state.input_items.len(),
            "turn starting"
        );

        // ── Step 3: Guardrails ───────────────────────────────────────────────
        //
        // No agent logic runs until every guardrail has let the message pass.
        let evaluated = match evaluate_guardrails(&agent.input_guardrails, message, &state.context).await? {
            GuardrailOutcome::Passed { checks } => checks,
            GuardrailOutcome::Tripped { guardrail, checks, .. } => {
                let refusal = self.config.refusal_message.clone();
                state.input_items.push(InputItem::user(message));
                state.input_items.push(InputItem::assistant(refusal.clone()));
                state.current_agent = agent.name.clone();
                self.store.save(&conversation_id, state.clone()).await?;

                info!(
                    conversation_id = %conversation_id,
                    agent = %agent.name,
                    guardrail = %guardrail,
                    "message refused"
                );
                let result = self.build_result(
                    conversation_id,
                    agent,
                    vec![MessageResponse::new(refusal, agent.name.clone())],
                    Vec::new(),
                    state.context,
                    checks,
                );
                return Ok(TurnOutcome::Refused { result, guardrail });
            }
        };

        // ── Step 4: Agent invocation ─────────────────────────────────────────
        state.input_items.push(InputItem::user(message));
        let before = state.context.clone();
        let input = std::mem::take(&mut state.input_items);
        let output = self.invoke_runner(agent, input, &mut state.context).await?;

        // ── Step 5: Classify outputs ─────────────────────────────────────────
        let transcript = classify_items(&output.new_items, &self.registry, &agent.name, &self.config);
        let active = self.registry.resolve(&transcript.active_agent);
        let mut events = transcript.events;

        // ── Step 6: Context diff ─────────────────────────────────────────────
        if let Some(update) = context_update_event(&active.name, &before, &state.context) {
            events.push(update);
        }

        // ── Step 7: Persist ──────────────────────────────────────────────────
        state.input_items = output.input_items;
        state.current_agent = active.name.clone();
        self.store.save(&conversation_id, state.clone()).await?;

        info!(
            conversation_id = %conversation_id,
            agent = %active.name,
            messages = transcript.messages.len(),
            events = events.len(),
            "turn complete"
        );

        let guardrails = self.guardrail_report(active, message, &evaluated);
        Ok(TurnOutcome::Completed(self.build_result(
            conversation_id,
            active,
            transcript.messages,
            events,
            state.context,
            guardrails,
        )))
    }

    async fn load_or_create(
        &self,
        requested: Option<&str>,
    ) -> VitalisResult<(ConversationId, ConversationState, bool)> {
        if let Some(raw) = requested.map(str::trim).filter(|s| !s.is_empty()) {
            let id = ConversationId::from(raw);
            if let Some(state) = self.store.get(&id).await? {
                return Ok((id, state, false));
            }
            match self.config.unknown_conversation {
                UnknownConversationPolicy::Reject => {
                    return Err(VitalisError::UnknownConversation {
                        conversation_id: raw.to_string(),
                    });
                }
                UnknownConversationPolicy::StartNew => {
                    debug!(conversation_id = %raw, "unknown conversation id, starting a new one");
                }
            }
        }

        let id = ConversationId::generate();
        let state = ConversationState::new(SessionContext::new(), self.registry.root().name.clone());
        info!(conversation_id = %id, uid = state.context.uid, "conversation created");
        Ok((id, state, true))
    }

    async fn invoke_runner(
        &self,
        agent: &AgentDescriptor,
        input: Vec<InputItem>,
        context: &mut SessionContext,
    ) -> VitalisResult<RunOutput> {
        let run = self.runner.run(agent, input, context);
        match self.config.runner_timeout() {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| VitalisError::RunnerFailure {
                    reason: format!("no response within {} ms", limit.as_millis()),
                })?,
            None => run.await,
        }
    }

    /// One passing check per guardrail of the final agent. Reasoning is
    /// carried over from this turn's evaluation where the guardrail ran.
    fn guardrail_report(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        evaluated: &[GuardrailCheck],
    ) -> Vec<GuardrailCheck> {
        let now = chrono::Utc::now();
        agent
            .input_guardrails
            .iter()
            .map(|g| match evaluated.iter().find(|c| c.name == g.name()) {
                Some(check) => check.clone(),
                None => GuardrailCheck::new(g.name(), message, "", true, now),
            })
            .collect()
    }

    fn build_result(
        &self,
        conversation_id: ConversationId,
        agent: &AgentDescriptor,
        messages: Vec<MessageResponse>,
        events: Vec<AgentEvent>,
        context: SessionContext,
        guardrails: Vec<GuardrailCheck>,
    ) -> TurnResult {
        TurnResult {
            conversation_id,
            current_agent: agent.name.clone(),
            messages,
            events,
            context,
            agents: self.registry.roster(),
            guardrails,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use serde_json::json;

    use vitalis_contracts::{
        context::{GoalStructure, SessionContext},
        conversation::{ConversationId, ConversationState, InputItem, Role, RunItem, RunOutput},
        error::{VitalisError, VitalisResult},
        event::EventKind,
        guardrail::GuardrailVerdict,
        turn::{TurnOutcome, TurnRequest, TurnResponse},
    };

    use super::TurnOrchestrator;
    use crate::{
        config::{OrchestratorConfig, UnknownConversationPolicy, DEFAULT_REFUSAL},
        registry::{AgentDescriptor, AgentRegistry, HandoffEdge, HandoffHook},
        traits::{AgentRunner, ConversationStore, Guardrail},
    };

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A store that records every save.
    #[derive(Default)]
    struct MockStore {
        states: Mutex<HashMap<String, ConversationState>>,
        saves: Mutex<u32>,
    }

    impl MockStore {
        fn stored(&self, id: &ConversationId) -> Option<ConversationState> {
            self.states.lock().unwrap().get(id.as_str()).cloned()
        }

        fn save_count(&self) -> u32 {
            *self.saves.lock().unwrap()
        }
    }

    #[async_trait]
    impl ConversationStore for MockStore {
        async fn get(&self, id: &ConversationId) -> VitalisResult<Option<ConversationState>> {
            Ok(self.states.lock().unwrap().get(id.as_str()).cloned())
        }

        async fn save(&self, id: &ConversationId, state: ConversationState) -> VitalisResult<()> {
            *self.saves.lock().unwrap() += 1;
            self.states.lock().unwrap().insert(id.0.clone(), state);
            Ok(())
        }
    }

    /// Rejects any message containing `needle`.
    struct KeywordGate {
        name: &'static str,
        needle: Option<&'static str>,
    }

    #[async_trait]
    impl Guardrail for KeywordGate {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self, message: &str, _context: &SessionContext) -> VitalisResult<GuardrailVerdict> {
            match self.needle {
                Some(needle) if message.contains(needle) => {
                    Ok(GuardrailVerdict::trip("not a health topic"))
                }
                _ => Ok(GuardrailVerdict::allow("looks fine")),
            }
        }
    }

    type Script = fn(&AgentDescriptor, &mut SessionContext, &AgentRegistry) -> VitalisResult<Vec<RunItem>>;

    /// A runner that plays one script for every call and logs which agent ran.
    struct MockRunner {
        registry: Arc<AgentRegistry>,
        script: Script,
        calls: Arc<Mutex<Vec<String>>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl AgentRunner for MockRunner {
        async fn run(
            &self,
            agent: &AgentDescriptor,
            mut input: Vec<InputItem>,
            context: &mut SessionContext,
        ) -> VitalisResult<RunOutput> {
            self.calls.lock().unwrap().push(agent.name.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let items = (self.script)(agent, context, &self.registry)?;
            for item in &items {
                if let RunItem::Message { content, .. } = item {
                    input.push(InputItem::assistant(content.clone()));
                }
            }
            Ok(RunOutput { new_items: items, input_items: input })
        }
    }

    fn prompt(_ctx: &SessionContext) -> String {
        String::new()
    }

    fn on_nutrition(ctx: &mut SessionContext) {
        ctx.record_handoff("Handed off to Nutrition");
        if ctx.diet_preferences.is_none() {
            ctx.diet_preferences = Some("general".to_string());
        }
    }

    fn registry() -> Arc<AgentRegistry> {
        let goal_check: Arc<dyn Guardrail> = Arc::new(KeywordGate { name: "Goal Check", needle: None });
        let relevance: Arc<dyn Guardrail> = Arc::new(KeywordGate { name: "Relevance", needle: Some("stock") });
        Arc::new(
            AgentRegistry::new(
                "Planner",
                vec![
                    AgentDescriptor::new("Planner", "m", prompt)
                        .with_guardrail(Arc::clone(&goal_check))
                        .with_guardrail(Arc::clone(&relevance))
                        .with_handoff(
                            HandoffEdge::to("Nutrition")
                                .with_hook(HandoffHook::new("on_nutrition", on_nutrition)),
                        )
                        .with_handoff(HandoffEdge::to("Injury")),
                    AgentDescriptor::new("Nutrition", "m", prompt)
                        .with_guardrail(Arc::clone(&relevance))
                        .with_handoff(HandoffEdge::to("Planner")),
                    AgentDescriptor::new("Injury", "m", prompt).with_handoff(HandoffEdge::to("Planner")),
                ],
            )
            .unwrap(),
        )
    }

    struct Harness {
        orchestrator: TurnOrchestrator,
        store: Arc<MockStore>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    fn harness_with(script: Script, config: OrchestratorConfig, delay: Option<Duration>) -> Harness {
        let registry = registry();
        let store = Arc::new(MockStore::default());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let runner = MockRunner {
            registry: Arc::clone(&registry),
            script,
            calls: Arc::clone(&calls),
            delay,
        };
        let store_dyn: Arc<dyn ConversationStore> = store.clone();
        Harness {
            orchestrator: TurnOrchestrator::new(registry, Arc::new(runner), store_dyn, config),
            store,
            calls,
        }
    }

    fn harness(script: Script) -> Harness {
        harness_with(script, OrchestratorConfig::default(), None)
    }

    // ── Scripts ──────────────────────────────────────────────────────────────

    fn greet(agent: &AgentDescriptor, _ctx: &mut SessionContext, _r: &AgentRegistry) -> VitalisResult<Vec<RunItem>> {
        Ok(vec![RunItem::Message {
            agent: agent.name.clone(),
            content: format!("Hello from {}", agent.name),
        }])
    }

    fn set_goal(agent: &AgentDescriptor, ctx: &mut SessionContext, _r: &AgentRegistry) -> VitalisResult<Vec<RunItem>> {
        ctx.goal = Some(GoalStructure {
            objective: "weight loss".to_string(),
            quantity: 5.0,
            metric: "kg".to_string(),
            duration: "2 months".to_string(),
            priority: "high".to_string(),
        });
        Ok(vec![
            RunItem::ToolCall {
                agent: agent.name.clone(),
                tool: "goal_analyzer_tool".to_string(),
                arguments: json!(r#"{"user_goal":"lose 5kg in 2 months"}"#),
            },
            RunItem::ToolOutput {
                agent: agent.name.clone(),
                output: "Goal analyzed".to_string(),
            },
            RunItem::Message {
                agent: agent.name.clone(),
                content: "Great goal!".to_string(),
            },
        ])
    }

    fn to_nutrition(agent: &AgentDescriptor, ctx: &mut SessionContext, r: &AgentRegistry) -> VitalisResult<Vec<RunItem>> {
        if agent.name != "Planner" {
            return greet(agent, ctx, r);
        }
        let target = r.handoff(&agent.name, "Nutrition", ctx)?;
        Ok(vec![
            RunItem::Handoff {
                source_agent: agent.name.clone(),
                target_agent: target.name.clone(),
            },
            RunItem::Message {
                agent: target.name.clone(),
                content: "Nutrition here".to_string(),
            },
        ])
    }

    fn rogue_handoff(_agent: &AgentDescriptor, _ctx: &mut SessionContext, _r: &AgentRegistry) -> VitalisResult<Vec<RunItem>> {
        Ok(vec![RunItem::Handoff {
            source_agent: "Nutrition".to_string(),
            target_agent: "Injury".to_string(),
        }])
    }

    fn explode(_agent: &AgentDescriptor, _ctx: &mut SessionContext, _r: &AgentRegistry) -> VitalisResult<Vec<RunItem>> {
        Err(VitalisError::RunnerFailure { reason: "model unavailable".to_string() })
    }

    // ── Test cases ───────────────────────────────────────────────────────────

    /// An empty message on a fresh conversation opens a session without
    /// touching the runner.
    #[tokio::test]
    async fn test_empty_message_starts_session() {
        let h = harness(greet);

        let outcome = h.orchestrator.submit_turn(None, "   ").await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Started(_)));
        let result = outcome.into_result();
        assert_eq!(result.conversation_id.0.len(), 32);
        assert_eq!(result.current_agent, "Planner");
        assert!(result.messages.is_empty());
        assert!(result.events.is_empty());
        assert!(result.guardrails.is_empty());
        assert!(result.context.name.is_none());
        assert!(result.context.goal.is_none());
        assert_eq!(result.agents.len(), 3);
        assert!(h.calls.lock().unwrap().is_empty(), "runner must not be called");
        assert!(h.store.stored(&result.conversation_id).is_some());
    }

    /// Two empty pings without an id never share a conversation.
    #[tokio::test]
    async fn test_empty_pings_allocate_distinct_ids() {
        let h = harness(greet);
        let a = h.orchestrator.submit_turn(None, "").await.unwrap().into_result();
        let b = h.orchestrator.submit_turn(None, "").await.unwrap().into_result();
        assert_ne!(a.conversation_id, b.conversation_id);
    }

    /// An empty message on an existing conversation echoes its state and
    /// writes nothing.
    #[tokio::test]
    async fn test_empty_message_on_existing_conversation() {
        let h = harness(greet);
        let first = h.orchestrator.submit_turn(None, "hello").await.unwrap().into_result();
        let saves = h.store.save_count();

        let again = h
            .orchestrator
            .submit_turn(Some(first.conversation_id.as_str()), "")
            .await
            .unwrap();

        assert!(matches!(again, TurnOutcome::Started(_)));
        assert_eq!(again.result().context, first.context);
        assert_eq!(h.store.save_count(), saves);
        assert_eq!(h.calls.lock().unwrap().len(), 1);
    }

    /// The returned context is exactly what was persisted.
    #[tokio::test]
    async fn test_completed_turn_round_trips_context() {
        let h = harness(set_goal);

        let outcome = h.orchestrator.submit_turn(None, "lose 5kg in 2 months").await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Completed(_)));
        let result = outcome.into_result();

        let stored = h.store.stored(&result.conversation_id).unwrap();
        assert_eq!(stored.context, result.context);
        assert_eq!(stored.current_agent, "Planner");
        assert_eq!(stored.input_items.len(), 2);
        assert_eq!(stored.input_items[0], InputItem::user("lose 5kg in 2 months"));
        assert_eq!(stored.input_items[1].role, Role::Assistant);
    }

    /// A turn that only sets the goal emits one context_update with only `goal`.
    #[tokio::test]
    async fn test_context_update_lists_only_changed_fields() {
        let h = harness(set_goal);
        let result = h.orchestrator.submit_turn(None, "lose 5kg").await.unwrap().into_result();

        let kinds: Vec<EventKind> = result.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::ToolCall, EventKind::ToolOutput, EventKind::Message, EventKind::ContextUpdate]
        );
        let update = result.events.last().unwrap();
        let changes = update.metadata.as_ref().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["goal"]["objective"], "weight loss");
        assert_eq!(
            result.events[0].metadata.as_ref().unwrap()["tool_args"],
            json!({ "user_goal": "lose 5kg in 2 months" })
        );
    }

    /// A guardrail tripwire blocks the runner and returns only the refusal.
    #[tokio::test]
    async fn test_guardrail_trip_blocks_runner() {
        let h = harness(greet);

        let outcome = h.orchestrator.submit_turn(None, "any good stock tips?").await.unwrap();

        assert!(h.calls.lock().unwrap().is_empty(), "runner must not run on tripwire");
        let guardrail = match &outcome {
            TurnOutcome::Refused { guardrail, .. } => guardrail.clone(),
            other => panic!("expected Refused, got {:?}", other),
        };
        assert_eq!(guardrail, "Relevance");

        let result = outcome.into_result();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].content, DEFAULT_REFUSAL);
        assert!(result.events.is_empty());
        assert_eq!(result.guardrails.len(), 2);
        assert_eq!(result.guardrails.iter().filter(|g| !g.passed).count(), 1);
        let failed = result.guardrails.iter().find(|g| !g.passed).unwrap();
        assert_eq!(failed.name, "Relevance");
        assert_eq!(failed.reasoning, "not a health topic");

        let stored = h.store.stored(&result.conversation_id).unwrap();
        assert_eq!(
            stored.input_items,
            vec![InputItem::user("any good stock tips?"), InputItem::assistant(DEFAULT_REFUSAL)]
        );
    }

    /// A handoff switches the active agent for this turn and the next one,
    /// and the edge's hook shows up as a tool_call event.
    #[tokio::test]
    async fn test_handoff_persists_active_agent() {
        let h = harness(to_nutrition);

        let first = h.orchestrator.submit_turn(None, "I need a diet plan").await.unwrap().into_result();

        assert_eq!(first.current_agent, "Nutrition");
        let handoff = first.events.iter().find(|e| e.kind == EventKind::Handoff).unwrap();
        assert_eq!(handoff.content, "Planner -> Nutrition");
        let hook = first
            .events
            .iter()
            .find(|e| e.kind == EventKind::ToolCall)
            .unwrap();
        assert_eq!(hook.content, "on_nutrition");
        assert_eq!(hook.agent, "Nutrition");
        assert_eq!(first.context.diet_preferences.as_deref(), Some("general"));
        assert_eq!(first.context.handoff_logs.len(), 1);

        // Final guardrail report follows the new agent.
        assert_eq!(first.guardrails.len(), 1);
        assert_eq!(first.guardrails[0].name, "Relevance");

        let update = first.events.iter().find(|e| e.kind == EventKind::ContextUpdate).unwrap();
        assert_eq!(update.agent, "Nutrition");

        let second = h
            .orchestrator
            .submit_turn(Some(first.conversation_id.as_str()), "thanks")
            .await
            .unwrap()
            .into_result();

        assert_eq!(*h.calls.lock().unwrap(), vec!["Planner".to_string(), "Nutrition".to_string()]);
        assert_eq!(second.current_agent, "Nutrition");
        assert_eq!(second.messages[0].content, "Hello from Nutrition");
    }

    /// A runner that reports an undeclared edge cannot move control.
    #[tokio::test]
    async fn test_undeclared_handoff_is_ignored() {
        let h = harness(rogue_handoff);
        let result = h.orchestrator.submit_turn(None, "hello").await.unwrap().into_result();

        assert_eq!(result.current_agent, "Planner");
        assert!(result.events.iter().all(|e| e.kind != EventKind::Handoff));
    }

    /// Runner errors fail the turn and leave nothing behind.
    #[tokio::test]
    async fn test_runner_failure_persists_nothing() {
        let h = harness(explode);

        let response = h
            .orchestrator
            .respond(TurnRequest { conversation_id: None, message: "hello".to_string() })
            .await;

        assert_eq!(response.status_code(), 500);
        match response {
            TurnResponse::Failure { error } => assert!(error.contains("model unavailable")),
            TurnResponse::Turn(_) => panic!("expected Failure"),
        }
        assert_eq!(h.store.save_count(), 0);
    }

    /// A runner that outlives the configured timeout fails the turn.
    #[tokio::test]
    async fn test_runner_timeout() {
        let config = OrchestratorConfig { runner_timeout_ms: Some(20), ..OrchestratorConfig::default() };
        let h = harness_with(greet, config, Some(Duration::from_secs(5)));

        match h.orchestrator.submit_turn(None, "hello").await {
            Err(VitalisError::RunnerFailure { reason }) => assert!(reason.contains("20 ms")),
            other => panic!("expected RunnerFailure, got {:?}", other.map(|o| o.into_result().current_agent)),
        }
        assert_eq!(h.store.save_count(), 0);
    }

    /// Unknown ids start over by default and fail under `Reject`.
    #[tokio::test]
    async fn test_unknown_conversation_policies() {
        let h = harness(greet);
        let result = h
            .orchestrator
            .submit_turn(Some("does-not-exist"), "hello")
            .await
            .unwrap()
            .into_result();
        assert_ne!(result.conversation_id.as_str(), "does-not-exist");

        let config = OrchestratorConfig {
            unknown_conversation: UnknownConversationPolicy::Reject,
            ..OrchestratorConfig::default()
        };
        let strict = harness_with(greet, config, None);
        match strict.orchestrator.submit_turn(Some("does-not-exist"), "hello").await {
            Err(VitalisError::UnknownConversation { conversation_id }) => {
                assert_eq!(conversation_id, "does-not-exist");
            }
            other => panic!("expected UnknownConversation, got {:?}", other.map(|o| o.is_refused())),
        }
    }

    /// A stored agent name the registry no longer knows falls back to root.
    #[tokio::test]
    async fn test_unresolved_agent_falls_back_to_root() {
        let h = harness(greet);
        let id = ConversationId::from("legacy");
        let mut state = ConversationState::new(SessionContext::with_uid(123_456), "Retired Agent");
        state.input_items.push(InputItem::user("earlier"));
        h.store.save(&id, state).await.unwrap();

        let result = h.orchestrator.submit_turn(Some("legacy"), "hello").await.unwrap().into_result();

        assert_eq!(*h.calls.lock().unwrap(), vec!["Planner".to_string()]);
        assert_eq!(result.current_agent, "Planner");
        assert_eq!(result.conversation_id.as_str(), "legacy");
        assert_eq!(h.store.stored(&id).unwrap().input_items.len(), 3);
    }

    #[test]
    fn test_health_probe() {
        let h = harness(greet);
        assert_eq!(h.orchestrator.health().status, "healthy");
    }
}
