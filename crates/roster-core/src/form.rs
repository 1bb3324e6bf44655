use crate::error::{Result, RosterError};
use crate::types::ErrorCode;
use crate::validate::{self, GroupValidator, Validator};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// FieldControl
// ---------------------------------------------------------------------------

/// A leaf holding one primitive value and the rules that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldControl {
    value: Value,
    validators: Vec<Validator>,
    errors: Vec<ErrorCode>,
    touched: bool,
    dirty: bool,
}

impl FieldControl {
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_validators(value, Vec::new())
    }

    pub fn with_validators(value: impl Into<Value>, validators: Vec<Validator>) -> Self {
        let mut field = Self {
            value: value.into(),
            validators,
            errors: Vec::new(),
            touched: false,
            dirty: false,
        };
        field.revalidate();
        field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn errors(&self) -> &[ErrorCode] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn pristine(&self) -> bool {
        !self.dirty
    }

    /// User edit: replaces the value and marks the field dirty.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
        self.dirty = true;
    }

    /// Programmatic load: replaces the value, interaction flags untouched.
    pub fn patch_value(&mut self, value: Value) {
        self.value = value;
    }

    pub fn set_validators(&mut self, validators: Vec<Validator>) {
        self.validators = validators;
    }

    pub fn add_validator(&mut self, validator: Validator) {
        self.validators.push(validator);
    }

    pub fn clear_validators(&mut self) {
        self.validators.clear();
    }

    pub fn revalidate(&mut self) {
        self.errors = validate::validate_field(&self.value, &self.validators);
    }
}

// ---------------------------------------------------------------------------
// GroupControl
// ---------------------------------------------------------------------------

/// Named children in insertion order, plus cross-field rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupControl {
    controls: Vec<(String, Control)>,
    validators: Vec<GroupValidator>,
    errors: Vec<ErrorCode>,
    touched: bool,
    dirty: bool,
}

impl GroupControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, control: impl Into<Control>) -> Self {
        self.set_control(name, control.into());
        self
    }

    pub fn with_validator(mut self, validator: GroupValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn controls(&self) -> impl Iterator<Item = (&str, &Control)> {
        self.controls.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Direct child that must be a field.
    pub fn field(&self, name: &str) -> Result<&FieldControl> {
        match self.get(name) {
            Some(Control::Field(f)) => Ok(f),
            Some(_) => Err(RosterError::NodeKind {
                path: name.to_string(),
                expected: "field",
            }),
            None => Err(RosterError::PathNotFound(name.to_string())),
        }
    }

    /// Replace the child called `name`, or append it when absent.
    pub fn set_control(&mut self, name: impl Into<String>, control: Control) {
        let name = name.into();
        match self.controls.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = control,
            None => self.controls.push((name, control)),
        }
    }

    pub fn validators(&self) -> &[GroupValidator] {
        &self.validators
    }

    pub fn set_validators(&mut self, validators: Vec<GroupValidator>) {
        self.validators = validators;
    }

    pub fn clear_validators(&mut self) {
        self.validators.clear();
    }

    /// Errors from this group's own rules; descendants are not included.
    pub fn errors(&self) -> &[ErrorCode] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.controls.iter().all(|(_, c)| c.is_valid())
    }

    pub fn touched(&self) -> bool {
        self.touched || self.controls.iter().any(|(_, c)| c.touched())
    }

    pub fn dirty(&self) -> bool {
        self.dirty || self.controls.iter().any(|(_, c)| c.dirty())
    }

    pub fn mark_all_touched(&mut self) {
        self.touched = true;
        for (_, control) in &mut self.controls {
            control.mark_all_touched();
        }
    }

    pub fn value(&self) -> Value {
        let map: Map<String, Value> = self
            .controls
            .iter()
            .map(|(name, c)| (name.clone(), c.value()))
            .collect();
        Value::Object(map)
    }

    /// Children first, then this group's own rules over the fresh state.
    pub fn revalidate(&mut self) -> Result<()> {
        for (_, control) in &mut self.controls {
            control.revalidate()?;
        }
        self.errors = validate::validate_group(self)?;
        Ok(())
    }

    /// Merge matching keys of a JSON object; unknown keys are ignored.
    pub fn patch(&mut self, value: &Value) {
        if let Value::Object(map) = value {
            for (name, v) in map {
                if let Some(control) = self.get_mut(name) {
                    control.patch(v);
                }
            }
        }
    }

    pub fn find(&self, path: &str) -> Result<&Control> {
        let not_found = || RosterError::PathNotFound(path.to_string());
        let mut segments = path.split('.');
        let first = segments.next().ok_or_else(not_found)?;
        let mut node = self.get(first).ok_or_else(not_found)?;
        for segment in segments {
            node = node.child(segment).ok_or_else(not_found)?;
        }
        Ok(node)
    }

    pub fn find_mut(&mut self, path: &str) -> Result<&mut Control> {
        let not_found = || RosterError::PathNotFound(path.to_string());
        let mut segments = path.split('.');
        let first = segments.next().ok_or_else(not_found)?;
        let mut node = self.get_mut(first).ok_or_else(not_found)?;
        for segment in segments {
            node = node.child_mut(segment).ok_or_else(not_found)?;
        }
        Ok(node)
    }
}

// ---------------------------------------------------------------------------
// ListControl
// ---------------------------------------------------------------------------

/// Ordered, resizable sequence of groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListControl {
    items: Vec<Control>,
    touched: bool,
    dirty: bool,
}

impl ListControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: impl IntoIterator<Item = GroupControl>) -> Self {
        Self {
            items: groups.into_iter().map(Control::Group).collect(),
            touched: false,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Control> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.items.iter()
    }

    /// Append a group, evaluating its rules so it enters with a correct status.
    pub fn push(&mut self, group: GroupControl) -> Result<()> {
        let mut control = Control::Group(group);
        control.revalidate()?;
        self.items.push(control);
        Ok(())
    }

    /// Remove one element; the list counts as edited and visited afterwards.
    pub fn remove_at(&mut self, index: usize) -> Option<Control> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.dirty = true;
        self.touched = true;
        Some(removed)
    }

    pub fn is_valid(&self) -> bool {
        self.items.iter().all(Control::is_valid)
    }

    pub fn touched(&self) -> bool {
        self.touched || self.items.iter().any(Control::touched)
    }

    pub fn dirty(&self) -> bool {
        self.dirty || self.items.iter().any(Control::dirty)
    }

    pub fn value(&self) -> Value {
        Value::Array(self.items.iter().map(Control::value).collect())
    }
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Field(FieldControl),
    Group(GroupControl),
    List(ListControl),
}

impl From<FieldControl> for Control {
    fn from(field: FieldControl) -> Self {
        Control::Field(field)
    }
}

impl From<GroupControl> for Control {
    fn from(group: GroupControl) -> Self {
        Control::Group(group)
    }
}

impl From<ListControl> for Control {
    fn from(list: ListControl) -> Self {
        Control::List(list)
    }
}

impl Control {
    pub fn kind(&self) -> &'static str {
        match self {
            Control::Field(_) => "field",
            Control::Group(_) => "group",
            Control::List(_) => "list",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Control::Field(f) => f.value().clone(),
            Control::Group(g) => g.value(),
            Control::List(l) => l.value(),
        }
    }

    /// Own error codes. Lists carry no rules of their own.
    pub fn errors(&self) -> &[ErrorCode] {
        match self {
            Control::Field(f) => f.errors(),
            Control::Group(g) => g.errors(),
            Control::List(_) => &[],
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Control::Field(f) => f.is_valid(),
            Control::Group(g) => g.is_valid(),
            Control::List(l) => l.is_valid(),
        }
    }

    pub fn touched(&self) -> bool {
        match self {
            Control::Field(f) => f.touched(),
            Control::Group(g) => g.touched(),
            Control::List(l) => l.touched(),
        }
    }

    pub fn dirty(&self) -> bool {
        match self {
            Control::Field(f) => f.dirty(),
            Control::Group(g) => g.dirty(),
            Control::List(l) => l.dirty(),
        }
    }

    /// Only the empty string counts as no value here, so a `null` field is
    /// displayed even before interaction. Groups and lists always hold a
    /// value, even with no children.
    pub fn has_value(&self) -> bool {
        match self {
            Control::Field(f) => f.value().as_str() != Some(""),
            Control::Group(_) | Control::List(_) => true,
        }
    }

    pub fn mark_touched(&mut self) {
        match self {
            Control::Field(f) => f.touched = true,
            Control::Group(g) => g.touched = true,
            Control::List(l) => l.touched = true,
        }
    }

    /// Touch this control and everything below it.
    pub fn mark_all_touched(&mut self) {
        match self {
            Control::Field(f) => f.touched = true,
            Control::Group(g) => g.mark_all_touched(),
            Control::List(l) => {
                l.touched = true;
                l.items.iter_mut().for_each(Control::mark_all_touched);
            }
        }
    }

    pub fn revalidate(&mut self) -> Result<()> {
        match self {
            Control::Field(f) => {
                f.revalidate();
                Ok(())
            }
            Control::Group(g) => g.revalidate(),
            Control::List(l) => {
                for item in &mut l.items {
                    item.revalidate()?;
                }
                Ok(())
            }
        }
    }

    pub fn patch(&mut self, value: &Value) {
        match self {
            Control::Field(f) => f.patch_value(value.clone()),
            Control::Group(g) => g.patch(value),
            Control::List(l) => {
                if let Value::Array(values) = value {
                    for (item, v) in l.items.iter_mut().zip(values) {
                        item.patch(v);
                    }
                }
            }
        }
    }

    fn child(&self, segment: &str) -> Option<&Control> {
        match self {
            Control::Field(_) => None,
            Control::Group(g) => g.get(segment),
            Control::List(l) => segment.parse::<usize>().ok().and_then(|i| l.get(i)),
        }
    }

    fn child_mut(&mut self, segment: &str) -> Option<&mut Control> {
        match self {
            Control::Field(_) => None,
            Control::Group(g) => g.get_mut(segment),
            Control::List(l) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| l.items.get_mut(i)),
        }
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Root of a control tree, addressed by dotted paths (`skills.0.skillName`).
///
/// Value edits through [`Form::set_value`] revalidate the whole tree.
/// Validator edits do not; call [`Form::revalidate_at`] or
/// [`Form::revalidate`] once the new rule set is in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    root: GroupControl,
}

impl Form {
    pub fn new(root: GroupControl) -> Result<Self> {
        let mut form = Self { root };
        form.revalidate()?;
        Ok(form)
    }

    pub fn root(&self) -> &GroupControl {
        &self.root
    }

    pub fn value(&self) -> Value {
        self.root.value()
    }

    pub fn value_at(&self, path: &str) -> Result<Value> {
        Ok(self.root.find(path)?.value())
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }

    pub fn get(&self, path: &str) -> Result<&Control> {
        self.root.find(path)
    }

    pub fn field(&self, path: &str) -> Result<&FieldControl> {
        match self.root.find(path)? {
            Control::Field(f) => Ok(f),
            _ => Err(kind_error(path, "field")),
        }
    }

    fn field_mut(&mut self, path: &str) -> Result<&mut FieldControl> {
        match self.root.find_mut(path)? {
            Control::Field(f) => Ok(f),
            _ => Err(kind_error(path, "field")),
        }
    }

    fn list_mut(&mut self, path: &str) -> Result<&mut ListControl> {
        match self.root.find_mut(path)? {
            Control::List(l) => Ok(l),
            _ => Err(kind_error(path, "list")),
        }
    }

    pub fn set_value(&mut self, path: &str, value: Value) -> Result<()> {
        self.field_mut(path)?.set_value(value);
        self.revalidate()
    }

    /// Load values without marking anything dirty.
    pub fn patch(&mut self, value: &Value) -> Result<()> {
        self.root.patch(value);
        self.revalidate()
    }

    pub fn mark_touched(&mut self, path: &str) -> Result<()> {
        self.root.find_mut(path)?.mark_touched();
        Ok(())
    }

    pub fn mark_all_touched(&mut self) {
        self.root.mark_all_touched();
    }

    pub fn set_validators(&mut self, path: &str, validators: Vec<Validator>) -> Result<()> {
        self.field_mut(path)?.set_validators(validators);
        Ok(())
    }

    pub fn add_validator(&mut self, path: &str, validator: Validator) -> Result<()> {
        self.field_mut(path)?.add_validator(validator);
        Ok(())
    }

    /// Drop every rule on a field or group.
    pub fn clear_validators(&mut self, path: &str) -> Result<()> {
        match self.root.find_mut(path)? {
            Control::Field(f) => f.clear_validators(),
            Control::Group(g) => g.clear_validators(),
            Control::List(_) => return Err(kind_error(path, "field or group")),
        }
        Ok(())
    }

    pub fn revalidate(&mut self) -> Result<()> {
        self.root.revalidate()
    }

    /// Re-evaluate one subtree. Enclosing group rules are not re-run.
    pub fn revalidate_at(&mut self, path: &str) -> Result<()> {
        self.root.find_mut(path)?.revalidate()
    }

    /// Replace (or add) the node at `path`. The parent must be a group.
    pub fn set_control(&mut self, path: &str, control: Control) -> Result<()> {
        match path.rsplit_once('.') {
            None => self.root.set_control(path, control),
            Some((parent, name)) => match self.root.find_mut(parent)? {
                Control::Group(g) => g.set_control(name, control),
                _ => return Err(kind_error(parent, "group")),
            },
        }
        self.revalidate()
    }

    pub fn list_len(&self, path: &str) -> Result<usize> {
        match self.root.find(path)? {
            Control::List(l) => Ok(l.len()),
            _ => Err(kind_error(path, "list")),
        }
    }

    pub fn push(&mut self, path: &str, group: GroupControl) -> Result<()> {
        self.list_mut(path)?.push(group)
    }

    pub fn remove_at(&mut self, path: &str, index: usize) -> Result<Control> {
        self.list_mut(path)?
            .remove_at(index)
            .ok_or_else(|| RosterError::PathNotFound(format!("{path}.{index}")))
    }
}

fn kind_error(path: &str, expected: &'static str) -> RosterError {
    RosterError::NodeKind {
        path: path.to_string(),
        expected,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact_form() -> Form {
        let email = GroupControl::new()
            .with(
                "email",
                FieldControl::with_validators("", vec![Validator::Required]),
            )
            .with(
                "confirmEmail",
                FieldControl::with_validators("", vec![Validator::Required]),
            )
            .with_validator(GroupValidator::email_match("email", "confirmEmail"));
        let row = GroupControl::new().with(
            "skillName",
            FieldControl::with_validators("", vec![Validator::Required]),
        );
        Form::new(
            GroupControl::new()
                .with("name", FieldControl::new("ada"))
                .with("emailGroup", email)
                .with("phone", FieldControl::new(""))
                .with("skills", ListControl::from_groups([row])),
        )
        .unwrap()
    }

    #[test]
    fn new_form_is_evaluated_immediately() {
        let form = contact_form();
        assert!(!form.is_valid());
        assert_eq!(
            form.field("emailGroup.email").unwrap().errors(),
            &[ErrorCode::Required]
        );
    }

    #[test]
    fn snapshot_mirrors_tree_shape() {
        let form = contact_form();
        assert_eq!(
            form.value(),
            json!({
                "name": "ada",
                "emailGroup": { "email": "", "confirmEmail": "" },
                "phone": "",
                "skills": [ { "skillName": "" } ],
            })
        );
        assert_eq!(form.value_at("skills.0.skillName").unwrap(), json!(""));
    }

    #[test]
    fn set_value_marks_dirty_and_revalidates() {
        let mut form = contact_form();
        form.set_value("skills.0.skillName", json!("rust")).unwrap();
        let field = form.field("skills.0.skillName").unwrap();
        assert!(field.dirty());
        assert!(field.is_valid());
        assert!(form.get("skills").unwrap().is_valid());
    }

    #[test]
    fn group_validity_includes_descendants() {
        let mut form = contact_form();
        form.set_value("emailGroup.email", json!("a@dell.com")).unwrap();
        let group = form.get("emailGroup").unwrap();
        assert!(group.errors().is_empty());
        assert!(!group.is_valid(), "confirmEmail is still required");
    }

    #[test]
    fn editing_confirmation_enables_mismatch() {
        let mut form = contact_form();
        form.set_value("emailGroup.email", json!("a@dell.com")).unwrap();
        assert!(form.get("emailGroup").unwrap().errors().is_empty());

        form.set_value("emailGroup.confirmEmail", json!("")).unwrap();
        assert_eq!(
            form.get("emailGroup").unwrap().errors(),
            &[ErrorCode::EmailMismatch]
        );

        form.set_value("emailGroup.confirmEmail", json!("a@dell.com"))
            .unwrap();
        assert!(form.get("emailGroup").unwrap().is_valid());
    }

    #[test]
    fn validator_changes_wait_for_revalidate() {
        let mut form = contact_form();
        form.add_validator("phone", Validator::Required).unwrap();
        assert!(form.field("phone").unwrap().is_valid());

        form.revalidate_at("phone").unwrap();
        assert_eq!(form.field("phone").unwrap().errors(), &[ErrorCode::Required]);

        form.clear_validators("phone").unwrap();
        form.revalidate_at("phone").unwrap();
        assert!(form.field("phone").unwrap().is_valid());
    }

    #[test]
    fn revalidate_is_idempotent() {
        let mut form = contact_form();
        form.revalidate().unwrap();
        let before = form.clone();
        form.revalidate().unwrap();
        assert_eq!(form, before);
    }

    #[test]
    fn unknown_path_is_a_configuration_error() {
        let mut form = contact_form();
        let err = form.set_value("nickname", json!("x")).unwrap_err();
        assert!(matches!(err, RosterError::PathNotFound(ref p) if p == "nickname"));
        assert!(err.is_configuration());
        assert!(form.get("skills.7.skillName").is_err());
        assert!(form.get("name.inner").is_err());
    }

    #[test]
    fn set_value_on_group_is_rejected() {
        let mut form = contact_form();
        let err = form.set_value("emailGroup", json!("x")).unwrap_err();
        assert!(matches!(err, RosterError::NodeKind { expected: "field", .. }));
    }

    #[test]
    fn remove_at_marks_list_dirty_and_touched() {
        let mut form = contact_form();
        assert!(!form.get("skills").unwrap().dirty());
        form.remove_at("skills", 0).unwrap();
        let skills = form.get("skills").unwrap();
        assert!(skills.dirty());
        assert!(skills.touched());
        assert!(skills.is_valid(), "removing the invalid row clears the list");
    }

    #[test]
    fn remove_at_out_of_range_fails() {
        let mut form = contact_form();
        let err = form.remove_at("skills", 3).unwrap_err();
        assert!(matches!(err, RosterError::PathNotFound(ref p) if p == "skills.3"));
        assert!(!form.get("skills").unwrap().dirty());
    }

    #[test]
    fn push_evaluates_new_group() {
        let mut form = contact_form();
        let row = GroupControl::new().with(
            "skillName",
            FieldControl::with_validators("", vec![Validator::Required]),
        );
        form.push("skills", row).unwrap();
        assert_eq!(form.list_len("skills").unwrap(), 2);
        assert!(!form.get("skills.1").unwrap().is_valid());
    }

    #[test]
    fn patch_keeps_fields_pristine() {
        let mut form = contact_form();
        form.patch(&json!({
            "name": "grace",
            "emailGroup": { "email": "g@dell.com", "confirmEmail": "g@dell.com" },
            "unknown": 42,
        }))
        .unwrap();
        assert_eq!(form.value_at("name").unwrap(), json!("grace"));
        assert!(form.field("emailGroup.confirmEmail").unwrap().pristine());
        assert!(form.get("emailGroup").unwrap().is_valid());
    }

    #[test]
    fn set_control_replaces_list() {
        let mut form = contact_form();
        let rows = ListControl::from_groups([
            GroupControl::new().with("skillName", FieldControl::new("a")),
            GroupControl::new().with("skillName", FieldControl::new("b")),
        ]);
        form.set_control("skills", rows.into()).unwrap();
        assert_eq!(
            form.value_at("skills").unwrap(),
            json!([{ "skillName": "a" }, { "skillName": "b" }])
        );
    }

    #[test]
    fn group_rule_with_missing_child_fails() {
        let root = GroupControl::new()
            .with("email", FieldControl::new(""))
            .with_validator(GroupValidator::email_match("email", "confirmEmail"));
        let err = Form::new(root).unwrap_err();
        assert!(matches!(err, RosterError::PathNotFound(ref p) if p == "confirmEmail"));
    }

    #[test]
    fn mark_all_touched_reaches_list_rows() {
        let mut form = contact_form();
        assert!(!form.get("skills").unwrap().touched());
        form.mark_all_touched();
        assert!(form.field("emailGroup.confirmEmail").unwrap().touched());
        assert!(form.field("skills.0.skillName").unwrap().touched());
        assert!(!form.field("phone").unwrap().dirty());
    }
}
