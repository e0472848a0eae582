//! # vitalis-store
//!
//! Conversation persistence for the vitalis session router.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitalis_store::InMemoryConversationStore;
//!
//! let store = Arc::new(InMemoryConversationStore::new());
//! // Pass `store` to `vitalis_core::TurnOrchestrator::new(...)`.
//! ```
//!
//! A deployment that needs durability or per-conversation ordering supplies
//! its own `ConversationStore`.

pub mod memory;

pub use memory::InMemoryConversationStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
