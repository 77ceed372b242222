//! Typed records managed by the stores.
//!
//! Each entity validates its fields on construction and on every mutation;
//! an invalid value never reaches a store or the index. Field enums name the
//! index dimensions for the entity's store.

mod appointment;
mod contact;
mod task;

pub use appointment::{Appointment, AppointmentField};
pub use contact::{Contact, ContactField};
pub use task::{Task, TaskField};
