//! Appointment records.
//!
//! Constraints:
//! - date: required, not in the past at creation or update time
//! - description: required, at most 50 characters
//!
//! The date is indexed through its RFC 3339 rendering (second precision,
//! UTC), keeping the trie purely string-keyed.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{IndexedField, Record, RecordId, ID_CHAR_LIMIT};
use crate::validate::{self, ValidationError};

/// Index dimensions of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentField {
    Date,
    Description,
}

impl IndexedField for AppointmentField {
    fn name(&self) -> &'static str {
        match self {
            AppointmentField::Date => "date",
            AppointmentField::Description => "description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    id: RecordId,
    date: DateTime<Utc>,
    description: String,
}

impl Appointment {
    pub const DESC_CHAR_LIMIT: usize = 50;

    /// Creates a validated appointment. The id comes from the owning store's
    /// sequence.
    ///
    /// # Errors
    ///
    /// `ValidationError` if the date is in the past or the description
    /// violates its constraints.
    pub fn new(
        id: RecordId,
        date: DateTime<Utc>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        validate::require_within_chars("id", &id, 1, ID_CHAR_LIMIT)?;
        validate::require_not_before("date", date, Utc::now())?;
        validate::require_within_chars("description", description, 1, Self::DESC_CHAR_LIMIT)?;
        Ok(Self {
            id,
            date,
            description: description.to_string(),
        })
    }

    /// Creates an appointment scheduled for the current moment.
    pub fn starting_now(id: RecordId, description: &str) -> Result<Self, ValidationError> {
        validate::require_within_chars("id", &id, 1, ID_CHAR_LIMIT)?;
        validate::require_within_chars("description", description, 1, Self::DESC_CHAR_LIMIT)?;
        Ok(Self {
            id,
            date: Utc::now(),
            description: description.to_string(),
        })
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The string rendering under which the date is indexed.
    pub fn date_key(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn set_date(&mut self, value: &str) -> Result<(), ValidationError> {
        let parsed = validate::parse_rfc3339("date", value)?;
        validate::require_not_before("date", parsed, Utc::now())?;
        self.date = parsed;
        Ok(())
    }

    fn set_description(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars("description", value, 1, Self::DESC_CHAR_LIMIT)?;
        self.description = value.to_string();
        Ok(())
    }
}

impl Record for Appointment {
    type Field = AppointmentField;

    const FIELDS: &'static [AppointmentField] =
        &[AppointmentField::Date, AppointmentField::Description];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: AppointmentField) -> String {
        match field {
            AppointmentField::Date => self.date_key(),
            AppointmentField::Description => self.description.clone(),
        }
    }

    fn update_field(
        &mut self,
        field: AppointmentField,
        value: &str,
    ) -> Result<(), ValidationError> {
        match field {
            AppointmentField::Date => self.set_date(value),
            AppointmentField::Description => self.set_description(value),
        }
    }
}
