//! Record stores for agendadb
//!
//! A store owns the authoritative id -> record map and the field index
//! derived from it. Mutations update the map first and the index in the same
//! call; there is no path that changes one without the other.
//!
//! # Invariants
//!
//! - Ids are assigned once, monotonically, and never reused
//! - The index always reflects the map: rebuilding it from the stored
//!   records yields the same search results

mod errors;
mod id;
mod service;

pub use errors::{StoreError, StoreResult};
pub use id::IdSequence;
pub use service::RecordStore;
