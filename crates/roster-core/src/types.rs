use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "required")]
    Required,
    #[serde(rename = "minlength")]
    MinLength,
    #[serde(rename = "maxlength")]
    MaxLength,
    #[serde(rename = "emailDomain")]
    EmailDomain,
    #[serde(rename = "emailMismatch")]
    EmailMismatch,
}

impl ErrorCode {
    pub fn all() -> &'static [ErrorCode] {
        &[
            ErrorCode::Required,
            ErrorCode::MinLength,
            ErrorCode::MaxLength,
            ErrorCode::EmailDomain,
            ErrorCode::EmailMismatch,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::MinLength => "minlength",
            ErrorCode::MaxLength => "maxlength",
            ErrorCode::EmailDomain => "emailDomain",
            ErrorCode::EmailMismatch => "emailMismatch",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContactPreference
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPreference {
    #[default]
    Email,
    Phone,
}

impl ContactPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactPreference::Email => "email",
            ContactPreference::Phone => "phone",
        }
    }
}

impl fmt::Display for ContactPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactPreference {
    type Err = crate::error::RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ContactPreference::Email),
            "phone" => Ok(ContactPreference::Phone),
            _ => Err(crate::error::RosterError::InvalidContactPreference(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Proficiency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
}

impl Proficiency {
    pub fn all() -> &'static [Proficiency] {
        &[
            Proficiency::Beginner,
            Proficiency::Intermediate,
            Proficiency::Advanced,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Proficiency {
    type Err = crate::error::RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Proficiency::Beginner),
            "intermediate" => Ok(Proficiency::Intermediate),
            "advanced" => Ok(Proficiency::Advanced),
            _ => Err(crate::error::RosterError::InvalidProficiency(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn error_code_serializes_as_wire_name() {
        for code in ErrorCode::all() {
            let json = serde_json::to_string(code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn error_code_usable_as_yaml_map_key() {
        let yaml = "required: Needed.\nemailDomain: Wrong domain.\n";
        let parsed: std::collections::BTreeMap<ErrorCode, String> =
            serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed[&ErrorCode::Required], "Needed.");
        assert_eq!(parsed[&ErrorCode::EmailDomain], "Wrong domain.");
    }

    #[test]
    fn contact_preference_parse() {
        assert_eq!(
            ContactPreference::from_str("phone").unwrap(),
            ContactPreference::Phone
        );
        assert_eq!(
            ContactPreference::from_str("email").unwrap(),
            ContactPreference::Email
        );
        assert!(ContactPreference::from_str("").is_err());
        assert!(ContactPreference::from_str("fax").is_err());
    }

    #[test]
    fn proficiency_parse() {
        for p in Proficiency::all() {
            assert_eq!(Proficiency::from_str(p.as_str()).unwrap(), *p);
        }
        assert!(Proficiency::from_str("expert").is_err());
    }
}
