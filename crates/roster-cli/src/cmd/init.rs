use anyhow::Context;
use roster_core::config::{Config, WarnLevel};
use roster_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing roster in: {}", root.display());

    let dir = paths::roster_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to read config.yaml")?
    } else {
        let config = Config::default();
        config.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        config
    };

    let employees_path = paths::employees_path(root);
    let created = io::write_if_missing(&employees_path, b"employees: []\n")
        .context("failed to write employees.yaml")?;
    if created {
        println!("  created: {}", paths::EMPLOYEES_FILE);
    } else {
        println!("  exists:  {}", paths::EMPLOYEES_FILE);
    }

    let warnings = config.validate();
    for w in &warnings {
        let tag = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "config error",
        };
        println!("  {tag}: {}", w.message);
    }
    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("{} has errors", paths::CONFIG_FILE);
    }

    println!("Done.");
    Ok(())
}
