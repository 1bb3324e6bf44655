use crate::employee::Employee;
use crate::error::{Result, RosterError};
use crate::paths;
use crate::service::EmployeeService;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct EmployeeFile {
    #[serde(default)]
    employees: Vec<Employee>,
}

/// Employee records kept in `.roster/employees.yaml`.
///
/// Every call reads the whole file and every mutation rewrites it.
/// Mutations within one process are serialized.
#[derive(Debug)]
pub struct EmployeeStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl EmployeeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self) -> Result<EmployeeFile> {
        crate::io::read_yaml(&paths::employees_path(&self.root))
    }

    fn save(&self, file: &EmployeeFile) -> Result<()> {
        crate::io::write_yaml(&paths::employees_path(&self.root), file)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Employee>) -> Result<T>) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut file = self.load()?;
        let out = f(&mut file.employees)?;
        self.save(&file)?;
        Ok(out)
    }
}

impl EmployeeService for EmployeeStore {
    fn list_employees(&self) -> Result<Vec<Employee>> {
        Ok(self.load()?.employees)
    }

    fn get_employee(&self, id: u64) -> Result<Employee> {
        self.load()?
            .employees
            .into_iter()
            .find(|e| e.id == Some(id))
            .ok_or(RosterError::EmployeeNotFound(id))
    }

    fn add_employee(&self, employee: &Employee) -> Result<Employee> {
        let added = self.mutate(|employees| {
            let next_id = employees.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
            let mut added = employee.clone();
            added.id = Some(next_id);
            employees.push(added.clone());
            Ok(added)
        })?;
        tracing::info!(id = ?added.id, "employee added");
        Ok(added)
    }

    fn update_employee(&self, employee: &Employee) -> Result<()> {
        let id = employee.id.ok_or(RosterError::MissingEmployeeId)?;
        self.mutate(|employees| {
            let slot = employees
                .iter_mut()
                .find(|e| e.id == Some(id))
                .ok_or(RosterError::EmployeeNotFound(id))?;
            *slot = employee.clone();
            Ok(())
        })?;
        tracing::info!(id, "employee updated");
        Ok(())
    }

    fn delete_employee(&self, id: u64) -> Result<()> {
        self.mutate(|employees| {
            let index = employees
                .iter()
                .position(|e| e.id == Some(id))
                .ok_or(RosterError::EmployeeNotFound(id))?;
            employees.remove(index);
            Ok(())
        })?;
        tracing::info!(id, "employee deleted");
        Ok(())
    }
}
