use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Session-scoped patient profile, captured once before the conversation
/// starts and injected into the system instruction of every request.
/// Immutable for the session's lifetime; discarded when the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
}

impl PatientInfo {
    /// Validate that every field is filled in. All fields are mandatory
    /// when the profile form is used.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("age", &self.age),
            ("gender", &self.gender),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "Patient {} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}
