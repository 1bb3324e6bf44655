pub mod employees;
pub mod forms;
pub mod views;
