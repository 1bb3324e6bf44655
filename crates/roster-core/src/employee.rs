use crate::error::{Result, RosterError};
use crate::types::{ContactPreference, Proficiency};
use crate::validate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Skill
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub skill_name: String,
    /// Kept as text; numeric input is accepted and stored as its decimal form.
    #[serde(deserialize_with = "text_or_number")]
    pub experience_in_years: String,
    pub proficiency: Proficiency,
}

impl Skill {
    pub fn new(
        skill_name: impl Into<String>,
        experience_in_years: impl Into<String>,
        proficiency: Proficiency,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            experience_in_years: experience_in_years.into(),
            proficiency,
        }
    }

    pub fn form_value(&self) -> Value {
        json!({
            "skillName": self.skill_name,
            "experienceInYears": self.experience_in_years,
            "proficiency": self.proficiency.as_str(),
        })
    }

    fn from_form_value(value: &Value, index: usize) -> Result<Self> {
        let proficiency = text_at(value, "/proficiency");
        let proficiency: Proficiency = proficiency.parse().map_err(|_| RosterError::InvalidValue {
            field: format!("skills.{index}.proficiency"),
            value: proficiency.clone(),
        })?;
        Ok(Self {
            skill_name: text_at(value, "/skillName"),
            experience_in_years: text_at(value, "/experienceInYears"),
            proficiency,
        })
    }
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: Option<u64>,
    pub full_name: String,
    #[serde(default)]
    pub contact_preference: ContactPreference,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl Employee {
    /// Unsaved record backing a "create" session.
    pub fn blank() -> Self {
        Self {
            id: None,
            full_name: String::new(),
            contact_preference: ContactPreference::default(),
            email: String::new(),
            phone: None,
            skills: Vec::new(),
        }
    }

    /// Scalar values in employee-form shape. The confirmation starts equal
    /// to the stored email; skills are rebuilt separately.
    pub fn form_value(&self) -> Value {
        json!({
            "fullName": self.full_name,
            "contactPreference": self.contact_preference.as_str(),
            "emailGroup": {
                "email": self.email,
                "confirmEmail": self.email,
            },
            "phone": self.phone.clone().unwrap_or_default(),
        })
    }

    /// Copy a form snapshot onto this record. `id` is left as is.
    pub fn apply_form_value(&mut self, value: &Value) -> Result<()> {
        let preference = text_at(value, "/contactPreference");
        let contact_preference: ContactPreference = preference.parse().map_err(|_| RosterError::InvalidValue {
            field: "contactPreference".to_string(),
            value: preference.clone(),
        })?;
        let skills = match value.pointer("/skills") {
            Some(Value::Array(rows)) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| Skill::from_form_value(row, i))
                .collect::<Result<Vec<_>>>()?,
            _ => Vec::new(),
        };
        let phone = text_at(value, "/phone");

        self.full_name = text_at(value, "/fullName");
        self.contact_preference = contact_preference;
        self.email = text_at(value, "/emailGroup/email");
        self.phone = (!phone.is_empty()).then_some(phone);
        self.skills = skills;
        Ok(())
    }
}

fn text_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(validate::text)
        .map(|t| t.into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        Employee {
            id: Some(3),
            full_name: "Ada".to_string(),
            contact_preference: ContactPreference::Phone,
            email: "ada@dell.com".to_string(),
            phone: Some("555-0100".to_string()),
            skills: vec![Skill::new("Rust", "4", Proficiency::Advanced)],
        }
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["fullName"], "Ada");
        assert_eq!(json["contactPreference"], "phone");
        assert_eq!(json["skills"][0]["experienceInYears"], "4");
        assert_eq!(json["skills"][0]["proficiency"], "advanced");
    }

    #[test]
    fn numeric_experience_is_accepted() {
        let json = r#"{"fullName":"A","email":"a@dell.com","skills":[
            {"skillName":"Go","experienceInYears":7,"proficiency":"beginner"}]}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, None);
        assert_eq!(employee.contact_preference, ContactPreference::Email);
        assert_eq!(employee.skills[0].experience_in_years, "7");
    }

    #[test]
    fn form_value_duplicates_email_into_confirmation() {
        let value = sample().form_value();
        assert_eq!(value["emailGroup"]["confirmEmail"], "ada@dell.com");
        assert!(value.get("skills").is_none());
    }

    #[test]
    fn apply_form_value_maps_every_field() {
        let mut employee = Employee::blank();
        employee.id = Some(9);
        let snapshot = serde_json::json!({
            "fullName": "Grace",
            "contactPreference": "email",
            "emailGroup": { "email": "g@dell.com", "confirmEmail": "g@dell.com" },
            "phone": "",
            "skills": [
                { "skillName": "C", "experienceInYears": "10", "proficiency": "intermediate" },
            ],
        });
        employee.apply_form_value(&snapshot).unwrap();
        assert_eq!(employee.id, Some(9));
        assert_eq!(employee.full_name, "Grace");
        assert_eq!(employee.email, "g@dell.com");
        assert_eq!(employee.phone, None);
        assert_eq!(
            employee.skills,
            vec![Skill::new("C", "10", Proficiency::Intermediate)]
        );
    }

    #[test]
    fn apply_form_value_rejects_unknown_proficiency() {
        let mut employee = Employee::blank();
        let snapshot = serde_json::json!({
            "fullName": "Grace",
            "contactPreference": "email",
            "emailGroup": { "email": "g@dell.com" },
            "skills": [ { "skillName": "C", "experienceInYears": "1", "proficiency": "" } ],
        });
        let err = employee.apply_form_value(&snapshot).unwrap_err();
        assert!(matches!(err, RosterError::InvalidValue { ref field, .. } if field == "skills.0.proficiency"));
        assert_eq!(employee, Employee::blank(), "failed mapping leaves record unchanged");
    }
}
