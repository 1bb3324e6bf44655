use crate::conditional::ConditionalRequirement;
use crate::config::{FormConfig, MessageTable};
use crate::employee::{Employee, Skill};
use crate::error::Result;
use crate::form::{Control, FieldControl, Form, GroupControl, ListControl};
use crate::project::{self, FormErrors};
use crate::route::Route;
use crate::service::EmployeeService;
use crate::validate::{GroupValidator, Validator};
use serde::Serialize;
use serde_json::Value;

pub const SKILLS: &str = "skills";

// ---------------------------------------------------------------------------
// Form construction
// ---------------------------------------------------------------------------

/// The blank employee form with a single empty skill row.
pub fn employee_form(config: &FormConfig) -> Result<Form> {
    let email_group = GroupControl::new()
        .with(
            "email",
            FieldControl::with_validators(
                "",
                vec![
                    Validator::Required,
                    Validator::email_domain(config.email_domain.as_str()),
                ],
            ),
        )
        .with(
            "confirmEmail",
            FieldControl::with_validators("", vec![Validator::Required]),
        )
        .with_validator(GroupValidator::email_match("email", "confirmEmail"));

    Form::new(
        GroupControl::new()
            .with(
                "fullName",
                FieldControl::with_validators(
                    "",
                    vec![
                        Validator::Required,
                        Validator::min_length(config.full_name_min),
                        Validator::max_length(config.full_name_max),
                    ],
                ),
            )
            .with("contactPreference", FieldControl::new("email"))
            .with("emailGroup", email_group)
            .with("phone", FieldControl::new(""))
            .with(SKILLS, ListControl::from_groups([skill_group(None)])),
    )
}

/// One skill row, blank or filled from an existing skill. Every column is
/// required either way.
pub fn skill_group(skill: Option<&Skill>) -> GroupControl {
    let (name, years, proficiency) = match skill {
        Some(s) => (
            s.skill_name.as_str(),
            s.experience_in_years.as_str(),
            s.proficiency.as_str(),
        ),
        None => ("", "", ""),
    };
    GroupControl::new()
        .with(
            "skillName",
            FieldControl::with_validators(name, vec![Validator::Required]),
        )
        .with(
            "experienceInYears",
            FieldControl::with_validators(years, vec![Validator::Required]),
        )
        .with(
            "proficiency",
            FieldControl::with_validators(proficiency, vec![Validator::Required]),
        )
}

// ---------------------------------------------------------------------------
// FormMode / SubmitOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit(u64),
}

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            FormMode::Create => "Create Employee",
            FormMode::Edit(_) => "Edit Employee",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Saved; the caller should show this route next.
    Navigate { route: Route },
    /// The service call failed. The failure is logged and the session is
    /// left as it was.
    Failed,
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// Everything a view needs to render one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub title: &'static str,
    #[serde(flatten)]
    pub mode: FormMode,
    pub value: Value,
    pub errors: FormErrors,
    pub valid: bool,
    pub skill_rows: usize,
}

// ---------------------------------------------------------------------------
// FormSession
// ---------------------------------------------------------------------------

/// One create or edit pass over an employee record.
///
/// Every mutation revalidates the tree, gives the contact rule a chance to
/// run, then recomputes the displayed errors before returning.
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: FormMode,
    form: Form,
    employee: Employee,
    contact_rule: ConditionalRequirement,
    messages: MessageTable,
    errors: FormErrors,
}

impl FormSession {
    pub fn create(config: &FormConfig) -> Result<Self> {
        Self::build(FormMode::Create, Employee::blank(), config)
    }

    /// Load `id` and patch it into a fresh form. A failed fetch is logged
    /// and leaves a blank form bound to `id`.
    pub fn edit(service: &dyn EmployeeService, id: u64, config: &FormConfig) -> Result<Self> {
        let mut blank = Employee::blank();
        blank.id = Some(id);
        let mut session = Self::build(FormMode::Edit(id), blank, config)?;
        match service.get_employee(id) {
            Ok(employee) => session.load(employee)?,
            Err(e) => tracing::error!(id, error = %e, "failed to load employee"),
        }
        Ok(session)
    }

    /// A session over a record already in hand. Records without an id
    /// open in create mode and are added on submit.
    pub fn from_employee(employee: Employee, config: &FormConfig) -> Result<Self> {
        let mode = employee.id.map_or(FormMode::Create, FormMode::Edit);
        let mut session = Self::build(mode, Employee::blank(), config)?;
        session.load(employee)?;
        Ok(session)
    }

    /// Edit when the route carried an id, otherwise create.
    pub fn open(service: &dyn EmployeeService, id: Option<u64>, config: &FormConfig) -> Result<Self> {
        match id {
            Some(id) => Self::edit(service, id, config),
            None => Self::create(config),
        }
    }

    fn build(mode: FormMode, employee: Employee, config: &FormConfig) -> Result<Self> {
        let mut session = Self {
            mode,
            form: employee_form(config)?,
            employee,
            contact_rule: config.contact_rule.clone(),
            messages: config.messages.clone(),
            errors: FormErrors::default(),
        };
        session.refresh()?;
        Ok(session)
    }

    fn load(&mut self, employee: Employee) -> Result<()> {
        self.form.patch(&employee.form_value())?;
        let rows = ListControl::from_groups(employee.skills.iter().map(Some).map(skill_group));
        self.form.set_control(SKILLS, Control::List(rows))?;
        self.contact_rule.apply(&mut self.form)?;
        self.employee = employee;
        tracing::debug!(id = ?self.employee.id, skills = self.employee.skills.len(), "employee loaded into form");
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        self.errors = project::project(self.form.root(), &self.messages)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.form.set_value(path, value.into())?;
        self.contact_rule.on_change(path, &mut self.form)?;
        self.refresh()
    }

    /// The control at `path` lost focus.
    pub fn touch(&mut self, path: &str) -> Result<()> {
        self.form.mark_touched(path)?;
        self.refresh()
    }

    /// Touch every control so all current errors are displayed.
    pub fn touch_all(&mut self) -> Result<()> {
        self.form.mark_all_touched();
        self.refresh()
    }

    pub fn add_skill_row(&mut self) -> Result<()> {
        self.form.push(SKILLS, skill_group(None))?;
        self.refresh()
    }

    pub fn remove_skill_row(&mut self, index: usize) -> Result<()> {
        self.form.remove_at(SKILLS, index)?;
        self.refresh()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.form.is_valid()
    }

    pub fn value(&self) -> Value {
        self.form.value()
    }

    pub fn skill_rows(&self) -> usize {
        self.form.list_len(SKILLS).unwrap_or(0)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            title: self.title(),
            mode: self.mode,
            value: self.value(),
            errors: self.errors.clone(),
            valid: self.is_valid(),
            skill_rows: self.skill_rows(),
        }
    }

    // -----------------------------------------------------------------------
    // Submit
    // -----------------------------------------------------------------------

    /// Copy the form onto the employee and save it: update when it has an
    /// id, add otherwise. Service failures are logged, never retried.
    pub fn submit(&mut self, service: &dyn EmployeeService) -> Result<SubmitOutcome> {
        let mut employee = self.employee.clone();
        employee.apply_form_value(&self.form.value())?;
        self.employee = employee;

        let saved = match self.employee.id {
            Some(id) => service.update_employee(&self.employee).map(|()| id),
            None => service.add_employee(&self.employee).map(|e| e.id.unwrap_or_default()),
        };
        match saved {
            Ok(id) => {
                tracing::info!(id, mode = ?self.mode, "employee saved");
                Ok(SubmitOutcome::Navigate { route: Route::List })
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save employee");
                Ok(SubmitOutcome::Failed)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
