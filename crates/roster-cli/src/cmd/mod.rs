pub mod check;
pub mod employee;
pub mod init;
pub mod serve;
