//! Record abstraction consumed by the index and the stores.
//!
//! The index never owns a record. It sees a projection: a stable id plus a
//! string value per indexed field. Stores own record lifetimes and resolve
//! ids back to records when serving search results.

use std::fmt;
use std::hash::Hash;

use crate::validate::ValidationError;

/// Stable record identifier. Assigned once by a store, never reused.
pub type RecordId = String;

/// Maximum id length in characters.
pub const ID_CHAR_LIMIT: usize = 10;

/// A field of a record usable as an index dimension.
pub trait IndexedField: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Stable lower_snake name used in log lines and error messages.
    fn name(&self) -> &'static str;
}

/// An entity with a stable id and a fixed set of named string-valued
/// attributes.
pub trait Record {
    type Field: IndexedField;

    /// Ordered list of fields a store indexes for this record type.
    const FIELDS: &'static [Self::Field];

    fn id(&self) -> &str;

    /// The record's current value for `field`, rendered as the string the
    /// index will use as a key.
    fn field_value(&self, field: Self::Field) -> String;

    /// Mutates `field` to `value`, enforcing the record's own constraints.
    fn update_field(&mut self, field: Self::Field, value: &str) -> Result<(), ValidationError>;
}
