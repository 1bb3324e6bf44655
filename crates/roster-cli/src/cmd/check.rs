use crate::output::print_json;
use anyhow::Context;
use roster_core::config::Config;
use roster_core::employee::Employee;
use roster_core::session::FormSession;
use std::path::Path;

/// Load a YAML record, run it through a form session with every control
/// touched, and report what the form would display.
pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to read config.yaml")?;
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let employee: Employee = serde_yaml::from_str(&data)
        .with_context(|| format!("{} is not an employee record", file.display()))?;

    let mut session = FormSession::from_employee(employee, &config.form)?;
    session.touch_all()?;
    let messages: Vec<(&str, &str)> = session.errors().visible().collect();

    if json {
        let errors: serde_json::Map<String, serde_json::Value> = messages
            .iter()
            .map(|(path, msg)| (path.to_string(), serde_json::Value::from(*msg)))
            .collect();
        print_json(&serde_json::json!({
            "valid": session.is_valid(),
            "errors": errors,
        }))?;
    } else if messages.is_empty() {
        println!("{}: valid", file.display());
    } else {
        for (path, msg) in &messages {
            println!("{path}: {msg}");
        }
    }

    if !session.is_valid() {
        anyhow::bail!("{} failed validation", file.display());
    }
    Ok(())
}
