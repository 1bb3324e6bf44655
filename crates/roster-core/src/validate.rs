use crate::error::Result;
use crate::form::GroupControl;
use crate::types::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// A rule attached to a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    Required,
    MinLength { len: usize },
    MaxLength { len: usize },
    EmailDomain { domain: String },
}

impl Validator {
    pub fn min_length(len: usize) -> Self {
        Validator::MinLength { len }
    }

    pub fn max_length(len: usize) -> Self {
        Validator::MaxLength { len }
    }

    pub fn email_domain(domain: impl Into<String>) -> Self {
        Validator::EmailDomain {
            domain: domain.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Validator::Required => ErrorCode::Required,
            Validator::MinLength { .. } => ErrorCode::MinLength,
            Validator::MaxLength { .. } => ErrorCode::MaxLength,
            Validator::EmailDomain { .. } => ErrorCode::EmailDomain,
        }
    }

    /// Evaluate this rule against `value`. Only `Required` looks at empty
    /// values; every other rule passes them through.
    pub fn check(&self, value: &Value) -> Option<ErrorCode> {
        if let Validator::Required = self {
            return is_empty(value).then_some(ErrorCode::Required);
        }
        let text = text(value).filter(|t| !t.is_empty())?;
        let failed = match self {
            Validator::Required => false,
            Validator::MinLength { len } => text.chars().count() < *len,
            Validator::MaxLength { len } => text.chars().count() > *len,
            Validator::EmailDomain { domain } => !matches_domain(&text, domain),
        };
        failed.then(|| self.code())
    }
}

fn matches_domain(text: &str, domain: &str) -> bool {
    match text.rsplit_once('@') {
        Some((_, host)) => host.to_lowercase() == domain.to_lowercase(),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// GroupValidator
// ---------------------------------------------------------------------------

/// A cross-field rule attached to a group and evaluated over its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupValidator {
    EmailMatch { email: String, confirm: String },
}

impl GroupValidator {
    pub fn email_match(email: impl Into<String>, confirm: impl Into<String>) -> Self {
        GroupValidator::EmailMatch {
            email: email.into(),
            confirm: confirm.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            GroupValidator::EmailMatch { .. } => ErrorCode::EmailMismatch,
        }
    }

    /// Fails only when a referenced child is missing from the group.
    pub fn check(&self, group: &GroupControl) -> Result<Option<ErrorCode>> {
        match self {
            GroupValidator::EmailMatch { email, confirm } => {
                let email = group.field(email)?;
                let confirm = group.field(confirm)?;
                Ok(email_mismatch(
                    email.value(),
                    confirm.value(),
                    confirm.pristine(),
                ))
            }
        }
    }
}

/// Equal values pass. An empty confirmation that was never edited also
/// passes, even though it differs from `email`; once edited it is compared.
pub fn email_mismatch(email: &Value, confirm: &Value, confirm_pristine: bool) -> Option<ErrorCode> {
    if email == confirm || (confirm_pristine && is_blank_text(confirm)) {
        None
    } else {
        Some(ErrorCode::EmailMismatch)
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// Empty string or null.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_blank_text(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Text form of a primitive value; `None` for null.
pub fn text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Run every rule, keeping the first occurrence of each code in rule order.
pub fn validate_field(value: &Value, validators: &[Validator]) -> Vec<ErrorCode> {
    let mut errors = Vec::new();
    for code in validators.iter().filter_map(|v| v.check(value)) {
        if !errors.contains(&code) {
            errors.push(code);
        }
    }
    errors
}

pub fn validate_group(group: &GroupControl) -> Result<Vec<ErrorCode>> {
    let mut errors = Vec::new();
    for validator in group.validators() {
        if let Some(code) = validator.check(group)? {
            if !errors.contains(&code) {
                errors.push(code);
            }
        }
    }
    Ok(errors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_rules() -> Vec<Validator> {
        vec![
            Validator::Required,
            Validator::min_length(2),
            Validator::max_length(10),
        ]
    }

    #[test]
    fn required_flags_empty_and_null_only() {
        assert_eq!(Validator::Required.check(&json!("")), Some(ErrorCode::Required));
        assert_eq!(Validator::Required.check(&Value::Null), Some(ErrorCode::Required));
        assert_eq!(Validator::Required.check(&json!(" ")), None);
        assert_eq!(Validator::Required.check(&json!(0)), None);
    }

    #[test]
    fn full_name_length_bounds() {
        let rules = name_rules();
        for len in 0..=14usize {
            let value = json!("x".repeat(len));
            let errors = validate_field(&value, &rules);
            if (2..=10).contains(&len) {
                assert!(errors.is_empty(), "len {len} should pass: {errors:?}");
            } else {
                assert!(!errors.is_empty(), "len {len} should fail");
            }
        }
    }

    #[test]
    fn empty_value_reports_only_required() {
        assert_eq!(validate_field(&json!(""), &name_rules()), vec![ErrorCode::Required]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rules = vec![Validator::max_length(3)];
        assert!(validate_field(&json!("äöü"), &rules).is_empty());
        assert_eq!(validate_field(&json!("äöüß"), &rules), vec![ErrorCode::MaxLength]);
    }

    #[test]
    fn email_domain_accepts_matching_domain() {
        let rule = Validator::email_domain("dell.com");
        assert_eq!(rule.check(&json!("a@dell.com")), None);
        assert_eq!(rule.check(&json!("a@DELL.Com")), None);
        assert_eq!(rule.check(&json!("first.last@b@dell.com")), None);
    }

    #[test]
    fn email_domain_rejects_other_values() {
        let rule = Validator::email_domain("dell.com");
        for value in ["a@dell.org", "dell.com", "a@sub.dell.com", "a@dell.com.au", "plain"] {
            assert_eq!(
                rule.check(&json!(value)),
                Some(ErrorCode::EmailDomain),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn email_domain_ignores_empty_value() {
        let rules = vec![Validator::Required, Validator::email_domain("dell.com")];
        assert_eq!(validate_field(&json!(""), &rules), vec![ErrorCode::Required]);
        assert_eq!(validate_field(&Value::Null, &rules), vec![ErrorCode::Required]);
    }

    #[test]
    fn duplicate_rules_report_once() {
        let rules = vec![Validator::Required, Validator::Required];
        assert_eq!(validate_field(&json!(""), &rules), vec![ErrorCode::Required]);
    }

    #[test]
    fn email_mismatch_pristine_empty_confirm_passes() {
        assert_eq!(email_mismatch(&json!("a@dell.com"), &json!(""), true), None);
    }

    #[test]
    fn email_mismatch_edited_empty_confirm_fails() {
        assert_eq!(
            email_mismatch(&json!("a@dell.com"), &json!(""), false),
            Some(ErrorCode::EmailMismatch)
        );
    }

    #[test]
    fn email_mismatch_pristine_filled_confirm_is_compared() {
        assert_eq!(
            email_mismatch(&json!("a@dell.com"), &json!("b@dell.com"), true),
            Some(ErrorCode::EmailMismatch)
        );
    }

    #[test]
    fn email_mismatch_equal_values_always_pass() {
        for pristine in [true, false] {
            assert_eq!(
                email_mismatch(&json!("a@dell.com"), &json!("a@dell.com"), pristine),
                None
            );
        }
    }

    #[test]
    fn validator_yaml_shape() {
        let yaml = serde_yaml::to_string(&Validator::email_domain("dell.com")).unwrap();
        assert!(yaml.contains("type: email_domain"));
        let parsed: Validator = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, Validator::email_domain("dell.com"));
    }
}
