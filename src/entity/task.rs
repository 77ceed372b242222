//! Task records.
//!
//! Constraints:
//! - name: required, at most 20 characters
//! - description: required, at most 50 characters

use serde::{Deserialize, Serialize};

use crate::record::{IndexedField, Record, RecordId, ID_CHAR_LIMIT};
use crate::validate::{self, ValidationError};

/// Index dimensions of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Name,
    Description,
}

impl IndexedField for TaskField {
    fn name(&self) -> &'static str {
        match self {
            TaskField::Name => "name",
            TaskField::Description => "description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: RecordId,
    name: String,
    description: String,
}

impl Task {
    pub const NAME_CHAR_LIMIT: usize = 20;
    pub const DESC_CHAR_LIMIT: usize = 50;

    /// Creates a validated task. The id comes from the owning store's
    /// sequence.
    pub fn new(id: RecordId, name: &str, description: &str) -> Result<Self, ValidationError> {
        validate::require_within_chars("id", &id, 1, ID_CHAR_LIMIT)?;
        validate::require_within_chars("name", name, 1, Self::NAME_CHAR_LIMIT)?;
        validate::require_within_chars("description", description, 1, Self::DESC_CHAR_LIMIT)?;
        Ok(Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    fn set_name(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars("name", value, 1, Self::NAME_CHAR_LIMIT)?;
        self.name = value.to_string();
        Ok(())
    }

    fn set_description(&mut self, value: &str) -> Result<(), ValidationError> {
        validate::require_within_chars("description", value, 1, Self::DESC_CHAR_LIMIT)?;
        self.description = value.to_string();
        Ok(())
    }
}

impl Record for Task {
    type Field = TaskField;

    const FIELDS: &'static [TaskField] = &[TaskField::Name, TaskField::Description];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: TaskField) -> String {
        match field {
            TaskField::Name => self.name.clone(),
            TaskField::Description => self.description.clone(),
        }
    }

    fn update_field(&mut self, field: TaskField, value: &str) -> Result<(), ValidationError> {
        match field {
            TaskField::Name => self.set_name(value),
            TaskField::Description => self.set_description(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_task_is_accepted() {
        let t = Task::new("0".to_string(), "Water plants", "Balcony and kitchen").unwrap();
        assert_eq!(t.name(), "Water plants");
    }

    #[test]
    fn name_over_twenty_chars_is_rejected() {
        assert!(Task::new("0".to_string(), "a".repeat(21).as_str(), "desc").is_err());
    }

    #[test]
    fn description_over_fifty_chars_is_rejected() {
        assert!(Task::new("0".to_string(), "name", "a".repeat(51).as_str()).is_err());
    }

    #[test]
    fn update_field_replaces_value() {
        let mut t = Task::new("0".to_string(), "Water plants", "Balcony").unwrap();
        t.update_field(TaskField::Description, "Kitchen").unwrap();
        assert_eq!(t.description(), "Kitchen");
    }
}
