use crate::conditional::ConditionalRequirement;
use crate::error::{Result, RosterError};
use crate::paths;
use crate::types::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// MessageTable
// ---------------------------------------------------------------------------

/// Display text per control name and error code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTable(BTreeMap<String, BTreeMap<ErrorCode, String>>);

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, code: ErrorCode, message: &str) -> Self {
        self.insert(field, code, message);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, code: ErrorCode, message: impl Into<String>) {
        self.0
            .entry(field.into())
            .or_default()
            .insert(code, message.into());
    }

    pub fn get(&self, field: &str, code: ErrorCode) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|codes| codes.get(&code))
            .map(String::as_str)
    }

    /// Like [`MessageTable::get`], but a missing entry is a configuration error.
    pub fn lookup(&self, field: &str, code: ErrorCode) -> Result<&str> {
        self.get(field, code)
            .ok_or_else(|| RosterError::MissingMessage {
                field: field.to_string(),
                code: code.to_string(),
            })
    }
}

fn default_messages(min: usize, max: usize, domain: &str) -> MessageTable {
    MessageTable::new()
        .with("fullName", ErrorCode::Required, "Full Name is required.")
        .with(
            "fullName",
            ErrorCode::MinLength,
            &format!("Full Name must be at least {min} characters."),
        )
        .with(
            "fullName",
            ErrorCode::MaxLength,
            &format!("Full Name must be at most {max} characters."),
        )
        .with("email", ErrorCode::Required, "Email is required.")
        .with(
            "email",
            ErrorCode::EmailDomain,
            &format!("Email domain should be {domain}"),
        )
        .with("confirmEmail", ErrorCode::Required, "Confirm Email is required.")
        .with(
            "emailGroup",
            ErrorCode::EmailMismatch,
            "Email and Confirm Email do not match.",
        )
        .with("phone", ErrorCode::Required, "Phone is required.")
        .with("skillName", ErrorCode::Required, "Skill Name is required.")
        .with(
            "experienceInYears",
            ErrorCode::Required,
            "Experience is required.",
        )
        .with("proficiency", ErrorCode::Required, "Proficiency is required.")
}

// ---------------------------------------------------------------------------
// FormConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_full_name_min")]
    pub full_name_min: usize,
    #[serde(default = "default_full_name_max")]
    pub full_name_max: usize,
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
    #[serde(default = "ConditionalRequirement::contact_phone")]
    pub contact_rule: ConditionalRequirement,
    #[serde(default = "default_message_table")]
    pub messages: MessageTable,
}

fn default_full_name_min() -> usize {
    2
}

fn default_full_name_max() -> usize {
    10
}

fn default_email_domain() -> String {
    "dell.com".to_string()
}

fn default_message_table() -> MessageTable {
    default_messages(
        default_full_name_min(),
        default_full_name_max(),
        &default_email_domain(),
    )
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            full_name_min: default_full_name_min(),
            full_name_max: default_full_name_max(),
            email_domain: default_email_domain(),
            contact_rule: ConditionalRequirement::contact_phone(),
            messages: default_message_table(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            form: FormConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Read `.roster/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        crate::io::read_yaml(&paths::config_path(root))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::write_yaml(&paths::config_path(root), self)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let form = &self.form;

        if form.full_name_min > form.full_name_max {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "full_name_min ({}) is greater than full_name_max ({})",
                    form.full_name_min, form.full_name_max
                ),
            });
        }

        if form.email_domain.trim().is_empty() || form.email_domain.contains('@') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("email_domain '{}' is not a domain", form.email_domain),
            });
        }

        match crate::session::employee_form(form) {
            Ok(tree) => {
                for (field, code) in crate::project::missing_messages(tree.root(), &form.messages)
                {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!("no message for '{field}' / '{code}'"),
                    });
                }
            }
            Err(e) => warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("form cannot be built: {e}"),
            }),
        }

        if form
            .messages
            .get(&form.contact_rule.dependent, ErrorCode::Required)
            .is_none()
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "no message for '{}' / 'required' (conditional rule)",
                    form.contact_rule.dependent
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
