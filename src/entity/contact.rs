//! Contact records.
//!
//! Constraints:
//! - first and last name: required, at most 10 characters
//! - phone: exactly 10 characters
//! - address: required, at most 30 characters

use serde::{Deserialize, Serialize};

use crate::record::{IndexedField, Record, RecordId, ID_CHAR_LIMIT};
use crate::validate::{self, ValidationError};

/// Index dimensions of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    Phone,
    Address,
}

impl IndexedField for ContactField {
    fn name(&self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::Phone => "phone",
            ContactField::Address => "address",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    id: RecordId,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
}

impl Contact {
    pub const NAME_CHAR_LIMIT: usize = 10;
    pub const PHONE_CHAR_LIMIT: usize = 10;
    pub const ADDRESS_CHAR_LIMIT: usize = 30;

    /// Creates a validated contact. The id comes from the owning store's
    /// sequence.
    ///
    /// # Errors
    ///
    /// `ValidationError` if any field violates its constraints.
    pub fn new(
        id: RecordId,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, ValidationError> {
        validate::require_within_chars("id", &id, 1, ID_CHAR_LIMIT)?;
        validate::require_within_chars("first_name", first_name, 1, Self::NAME_CHAR_LIMIT)?;
        validate::require_within_chars("last_name", last_name, 1, Self::NAME_CHAR_LIMIT)?;
        validate::require_within_chars(
            "phone",
            phone,
            Self::PHONE_CHAR_LIMIT,
            Self::PHONE_CHAR_LIMIT,
        )?;
        validate::require_within_chars("address", address, 1, Self::ADDRESS_CHAR_LIMIT)?;
        Ok(Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn set_first_name(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars("first_name", value, 1, Self::NAME_CHAR_LIMIT)?;
        self.first_name = value.to_string();
        Ok(())
    }

    fn set_last_name(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars("last_name", value, 1, Self::NAME_CHAR_LIMIT)?;
        self.last_name = value.to_string();
        Ok(())
    }

    fn set_phone(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars(
            "phone",
            value,
            Self::PHONE_CHAR_LIMIT,
            Self::PHONE_CHAR_LIMIT,
        )?;
        self.phone = value.to_string();
        Ok(())
    }

    fn set_address(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars("address", value, 1, Self::ADDRESS_CHAR_LIMIT)?;
        self.address = value.to_string();
        Ok(())
    }
}

impl Record for Contact {
    type Field = ContactField;

    const FIELDS: &'static [ContactField] = &[
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Phone,
        ContactField::Address,
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: ContactField) -> String {
        match field {
            ContactField::FirstName => self.first_name.clone(),
            ContactField::LastName => self.last_name.clone(),
            ContactField::Phone => self.phone.clone(),
            ContactField::Address => self.address.clone(),
        }
    }

    fn update_field(&mut self, field: ContactField, value: &str) -> Result<(), ValidationError> {
        match field {
            ContactField::FirstName => self.set_first_name(value),
            ContactField::LastName => self.set_last_name(value),
            ContactField::Phone => self.set_phone(value),
            ContactField::Address => self.set_address(value),
        }
    }
}
