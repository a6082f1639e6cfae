use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// Four-digit local unlock code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(String);

impl Pin {
    pub fn new(raw: &str) -> Result<Self, ProfileError> {
        if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ProfileError::InvalidPin)
        }
    }

    pub fn matches(&self, attempt: &str) -> bool {
        self.0 == attempt
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl TryFrom<String> for Pin {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Pin::new(&value)
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub pin: Pin,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Onboarding: needs a non-blank name and a four-digit PIN.
    pub fn register(name: &str, pin: &str) -> Result<Self, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }

        Ok(Self {
            id: None,
            name: name.to_string(),
            age: None,
            gender: None,
            pin: Pin::new(pin)?,
            created_at: Utc::now(),
        })
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn verify_pin(&self, attempt: &str) -> bool {
        self.pin.matches(attempt)
    }
}
