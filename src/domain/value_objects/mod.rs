use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// A contact number that passed the 10–15 digit check, kept in dialable `+<digits>` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips everything but digits, checks the length and normalizes:
    /// a leading `+` is kept as is, a bare 10-digit number gets the `+1` prefix,
    /// anything else gets a plain `+`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
            return Err(DomainError::Validation(format!(
                "phone_number: expected {MIN_DIGITS} to {MAX_DIGITS} digits, got {}",
                digits.len()
            )));
        }

        let normalized = if trimmed.starts_with('+') {
            format!("+{digits}")
        } else if digits.len() == MIN_DIGITS {
            format!("+1{digits}")
        } else {
            format!("+{digits}")
        };

        Ok(Self(normalized))
    }

    pub fn as_e164(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PhoneNumber::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}
