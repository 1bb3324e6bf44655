use crate::error::Result;
use crate::form::Form;
use crate::validate::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Makes `dependent` required while `driver` holds `trigger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRequirement {
    pub driver: String,
    pub trigger: Value,
    pub dependent: String,
}

impl ConditionalRequirement {
    pub fn new(driver: impl Into<String>, trigger: impl Into<Value>, dependent: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            trigger: trigger.into(),
            dependent: dependent.into(),
        }
    }

    /// Phone becomes required when it is the preferred contact channel.
    pub fn contact_phone() -> Self {
        Self::new("contactPreference", "phone", "phone")
    }

    pub fn watches(&self, path: &str) -> bool {
        self.driver == path
    }

    /// Install or clear the dependent's rules for the driver's current
    /// value, then revalidate the dependent so its status is current.
    pub fn apply(&self, form: &mut Form) -> Result<()> {
        let required = *form.field(&self.driver)?.value() == self.trigger;
        if required {
            form.set_validators(&self.dependent, vec![Validator::Required])?;
        } else {
            form.clear_validators(&self.dependent)?;
        }
        form.revalidate_at(&self.dependent)?;
        tracing::debug!(
            driver = %self.driver,
            dependent = %self.dependent,
            required,
            "conditional requirement applied"
        );
        Ok(())
    }

    /// Run [`ConditionalRequirement::apply`] if `path` is the driver.
    /// Returns whether the rule fired.
    pub fn on_change(&self, path: &str, form: &mut Form) -> Result<bool> {
        if !self.watches(path) {
            return Ok(false);
        }
        self.apply(form)?;
        Ok(true)
    }
}
