//! Observability for agendadb
//!
//! Structured, synchronous logging only: one line per event, deterministic
//! field ordering, no buffering.

mod logger;

pub use logger::{emit, render, Severity};
