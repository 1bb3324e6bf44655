use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write through a tempfile beside `path`, then rename it into place, so a
/// reader never sees half a record file.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            ensure_dir(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Returns whether the file was written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// YAML documents
// ---------------------------------------------------------------------------

/// A missing file reads as `T::default()`.
pub fn read_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&data)?)
}

pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_yaml::to_string(value)?;
    atomic_write(path, data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".roster/employees.yaml");
        atomic_write(&path, b"employees: []").unwrap();
        atomic_write(&path, b"employees: [{}]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "employees: [{}]");
        let leftovers = std::fs::read_dir(dir.path().join(".roster")).unwrap().count();
        assert_eq!(leftovers, 1, "no temp files left behind");
    }

    #[test]
    fn write_if_missing_keeps_existing_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("employees.yaml");
        assert!(write_if_missing(&path, b"employees: []\n").unwrap());
        assert!(!write_if_missing(&path, b"employees: ~\n").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "employees: []\n");
    }

    #[test]
    fn yaml_missing_file_reads_default() {
        let dir = TempDir::new().unwrap();
        let map: BTreeMap<String, u32> = read_yaml(&dir.path().join("absent.yaml")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn yaml_round_trip_and_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ports.yaml");
        let map = BTreeMap::from([("http".to_string(), 3141u32)]);
        write_yaml(&path, &map).unwrap();
        let back: BTreeMap<String, u32> = read_yaml(&path).unwrap();
        assert_eq!(back, map);

        std::fs::write(&path, "http: [not, a, port]").unwrap();
        let err = read_yaml::<BTreeMap<String, u32>>(&path).unwrap_err();
        assert!(matches!(err, RosterError::Yaml(_)));
    }
}
