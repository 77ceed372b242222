//! agendadb - A deterministic, embedded day-planner record engine
//!
//! Contacts, tasks, and appointments live in typed in-memory stores, each
//! backed by a shared compressed-trie index that answers exact and prefix
//! searches across every configured field.

pub mod entity;
pub mod index;
pub mod observability;
pub mod record;
pub mod store;
pub mod validate;
