use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ROSTER_DIR: &str = ".roster";
pub const CONFIG_FILE: &str = ".roster/config.yaml";
pub const EMPLOYEES_FILE: &str = ".roster/employees.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn roster_dir(root: &Path) -> PathBuf {
    root.join(ROSTER_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn employees_path(root: &Path) -> PathBuf {
    root.join(EMPLOYEES_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_roster_dir() {
        let root = Path::new("/srv/app");
        assert_eq!(roster_dir(root), PathBuf::from("/srv/app/.roster"));
        assert!(config_path(root).starts_with(roster_dir(root)));
        assert!(employees_path(root).starts_with(roster_dir(root)));
    }
}
