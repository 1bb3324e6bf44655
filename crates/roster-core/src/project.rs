use crate::config::MessageTable;
use crate::error::Result;
use crate::form::{Control, GroupControl};
use crate::types::ErrorCode;
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// FormErrors
// ---------------------------------------------------------------------------

/// Display text keyed by dotted control path. An empty string means the
/// control shows nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    /// Entries that currently show a message.
    pub fn visible(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, msg)| !msg.is_empty())
            .map(|(path, msg)| (path.as_str(), msg.as_str()))
    }

    pub fn has_visible(&self) -> bool {
        self.visible().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Recompute every display message from scratch.
///
/// A control shows its own errors once it is invalid and has been touched,
/// edited, or holds a non-empty value. Messages are looked up by the
/// control's own name, so nested groups own their cross-field entries
/// (`emailGroup` / `emailMismatch`) and list rows share their field names.
pub fn project(root: &GroupControl, messages: &MessageTable) -> Result<FormErrors> {
    let mut out = BTreeMap::new();
    walk_group(root, "", messages, &mut out)?;
    Ok(FormErrors(out))
}

fn walk_group(
    group: &GroupControl,
    prefix: &str,
    messages: &MessageTable,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    for (name, control) in group.controls() {
        let key = join(prefix, name);
        walk(name, &key, control, messages, out)?;
    }
    Ok(())
}

fn walk(
    name: &str,
    key: &str,
    control: &Control,
    messages: &MessageTable,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    out.insert(key.to_string(), display(name, control, messages)?);
    match control {
        Control::Field(_) => {}
        Control::Group(g) => walk_group(g, key, messages, out)?,
        Control::List(l) => {
            for (index, item) in l.iter().enumerate() {
                let item_key = format!("{key}.{index}");
                walk(name, &item_key, item, messages, out)?;
            }
        }
    }
    Ok(())
}

fn display(name: &str, control: &Control, messages: &MessageTable) -> Result<String> {
    let shown = control.touched() || control.dirty() || control.has_value();
    if control.is_valid() || !shown {
        return Ok(String::new());
    }
    let parts = control
        .errors()
        .iter()
        .map(|code| messages.lookup(name, *code))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(" "))
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Every (name, code) a configured rule can raise that has no message.
pub fn missing_messages(root: &GroupControl, messages: &MessageTable) -> Vec<(String, ErrorCode)> {
    let mut missing = Vec::new();
    collect_missing(root, messages, &mut missing);
    missing
}

fn collect_missing(
    group: &GroupControl,
    messages: &MessageTable,
    missing: &mut Vec<(String, ErrorCode)>,
) {
    for (name, control) in group.controls() {
        check_control(name, control, messages, missing);
    }
}

fn check_control(
    name: &str,
    control: &Control,
    messages: &MessageTable,
    missing: &mut Vec<(String, ErrorCode)>,
) {
    let codes: Vec<ErrorCode> = match control {
        Control::Field(f) => f.validators().iter().map(|v| v.code()).collect(),
        Control::Group(g) => g.validators().iter().map(|v| v.code()).collect(),
        Control::List(_) => Vec::new(),
    };
    for code in codes {
        let entry = (name.to_string(), code);
        if messages.get(name, code).is_none() && !missing.contains(&entry) {
            missing.push(entry);
        }
    }
    match control {
        Control::Field(_) => {}
        Control::Group(g) => collect_missing(g, messages, missing),
        Control::List(l) => {
            for item in l.iter() {
                check_control(name, item, messages, missing);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
