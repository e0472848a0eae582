//! # vitalis-contracts
//!
//! Shared types, schemas, and contracts for the vitalis session router.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions and error types.

pub mod context;
pub mod conversation;
pub mod error;
pub mod event;
pub mod guardrail;
pub mod turn;
