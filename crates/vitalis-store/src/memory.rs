//! In-memory implementation of `ConversationStore`.
//!
//! `InMemoryConversationStore` is the reference implementation of the
//! `ConversationStore` trait. It keeps every conversation in a `HashMap`
//! behind a tokio `RwLock`, so reads for different conversations proceed in
//! parallel. Contents live only as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use vitalis_contracts::{
    conversation::{ConversationId, ConversationState},
    error::VitalisResult,
};
use vitalis_core::traits::ConversationStore;

/// A non-durable conversation store.
///
/// # Concurrency
///
/// `get` and `save` each take the lock once; nothing spans a whole turn.
/// Two turns racing on the same id both read the old state and the later
/// `save` overwrites the earlier one.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<ConversationId, ConversationState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    /// Return a copy of the stored state. Callers mutate the copy freely;
    /// nothing changes here until `save`.
    async fn get(&self, id: &ConversationId) -> VitalisResult<Option<ConversationState>> {
        let state = self.conversations.read().await.get(id).cloned();
        debug!(conversation_id = %id, found = state.is_some(), "conversation loaded");
        Ok(state)
    }

    /// Replace the state for `id`, creating the entry when absent.
    async fn save(&self, id: &ConversationId, state: ConversationState) -> VitalisResult<()> {
        let history = state.input_items.len();
        let previous = self.conversations.write().await.insert(id.clone(), state);
        debug!(
            conversation_id = %id,
            history,
            replaced = previous.is_some(),
            "conversation saved"
        );
        Ok(())
    }
}
