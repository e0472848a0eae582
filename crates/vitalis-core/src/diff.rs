//! Field-level diff of two `SessionContext` snapshots.
//!
//! Comparison is per top-level field using value equality. The before
//! snapshot is an owned clone taken ahead of the runner call, so in-place
//! mutation of a nested collection still shows up as a change.

use serde_json::{json, Map, Value};

use vitalis_contracts::{
    context::SessionContext,
    event::{AgentEvent, EventKind},
};

macro_rules! track_changes {
    ($changes:ident, $before:ident, $($field:ident),+ $(,)?) => {
        $(
            if &$before.$field != $field {
                $changes.insert(stringify!($field).to_string(), json!($field));
            }
        )+
    };
}

/// Every top-level field of `after` that differs from `before`, keyed by
/// field name and carrying the new value.
pub fn context_changes(before: &SessionContext, after: &SessionContext) -> Map<String, Value> {
    // Destructured so a new context field cannot be silently left out.
    let SessionContext {
        name,
        uid,
        goal,
        diet_preferences,
        workout_plan,
        meal_plan,
        injury_notes,
        handoff_logs,
        progress_logs,
    } = after;

    let mut changes = Map::new();
    track_changes!(
        changes,
        before,
        name,
        uid,
        goal,
        diet_preferences,
        workout_plan,
        meal_plan,
        injury_notes,
        handoff_logs,
        progress_logs,
    );
    changes
}

/// A single `context_update` event attributed to `agent`, or `None` when
/// nothing changed.
pub fn context_update_event(
    agent: &str,
    before: &SessionContext,
    after: &SessionContext,
) -> Option<AgentEvent> {
    let changes = context_changes(before, after);
    if changes.is_empty() {
        return None;
    }
    Some(AgentEvent::new(EventKind::ContextUpdate, agent, "").with_metadata(changes))
}

// ── Tests ────────────────────────────────────────────────────────────────────
