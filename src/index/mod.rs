//! Multi-field compressed-trie index for agendadb
//!
//! Indexes are derived, in-memory-only state: stores rebuild them by
//! replaying inserts, they are never serialized.
//!
//! # Design Principles
//!
//! - Derived state: the record store is the source of truth; the index
//!   mirrors it and is kept consistent by the store on every mutation
//! - One shared tree for all configured fields, with a per-node
//!   field -> record-ids map at key-end nodes
//! - Single-threaded: callers serialize access externally
//!
//! # Invariants
//!
//! - Compression: apart from the root, a node is a key end or has at least
//!   two children; restored after every deletion
//! - Lookups that find nothing return empty results, not errors

mod errors;
mod node;
mod trie;

pub use errors::{IndexError, IndexResult};
pub use trie::FieldIndex;
