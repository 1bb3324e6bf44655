pub mod conditional;
pub mod config;
pub mod employee;
pub mod error;
pub mod form;
pub mod io;
pub mod paths;
pub mod project;
pub mod route;
pub mod service;
pub mod session;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{Result, RosterError};
