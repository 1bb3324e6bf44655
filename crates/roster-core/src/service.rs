use crate::employee::Employee;
use crate::error::Result;

/// Backend for employee records consumed by form sessions and the server.
pub trait EmployeeService: Send + Sync {
    fn list_employees(&self) -> Result<Vec<Employee>>;

    fn get_employee(&self, id: u64) -> Result<Employee>;

    /// Persist a new record and return it with its assigned id.
    fn add_employee(&self, employee: &Employee) -> Result<Employee>;

    fn update_employee(&self, employee: &Employee) -> Result<()>;

    fn delete_employee(&self, id: u64) -> Result<()>;
}
