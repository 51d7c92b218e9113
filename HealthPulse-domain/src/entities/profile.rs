use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Gender options offered by the profile form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub const OPTIONS: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Gender::OPTIONS
            .iter()
            .copied()
            .find(|option| option.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "gender must be one of: {}",
                    Gender::OPTIONS.map(|option| option.label()).join(", ")
                )
            })
    }
}

/// Patient profile entered through the profile form.
///
/// Only `age` and `gender` are constrained; the free-text fields are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PatientProfile {
    /// Patient name
    pub name: String,

    /// Age in years
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: u32,

    /// Gender, one of the enumerated options
    pub gender: Gender,

    /// Past conditions, surgeries, family history
    pub medical_history: String,

    /// Current medications and dosages
    pub current_medications: String,

    /// Known allergies
    pub allergies: String,

    /// Emergency contact details
    pub emergency_contact: String,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 25,
            gender: Gender::Male,
            medical_history: String::new(),
            current_medications: String::new(),
            allergies: String::new(),
            emergency_contact: String::new(),
        }
    }
}

impl PatientProfile {
    /// Percentage of the core profile fields that are filled in
    pub fn completeness(&self) -> u8 {
        let filled = [
            !self.name.trim().is_empty(),
            self.age > 0,
            true, // gender always carries one of the options
            !self.medical_history.trim().is_empty(),
            !self.current_medications.trim().is_empty(),
            !self.allergies.trim().is_empty(),
        ];
        let completed = filled.iter().filter(|done| **done).count();
        (completed * 100 / filled.len()) as u8
    }
}

/// Editable profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Age,
    Gender,
    MedicalHistory,
    CurrentMedications,
    Allergies,
    EmergencyContact,
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ProfileField::Name),
            "age" => Ok(ProfileField::Age),
            "gender" => Ok(ProfileField::Gender),
            "medical_history" => Ok(ProfileField::MedicalHistory),
            "current_medications" => Ok(ProfileField::CurrentMedications),
            "allergies" => Ok(ProfileField::Allergies),
            "emergency_contact" => Ok(ProfileField::EmergencyContact),
            other => Err(format!("Unknown profile field: {}", other)),
        }
    }
}
