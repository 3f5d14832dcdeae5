//! Endpoint handlers, one module per page concern.

pub mod analyze;
pub mod file;
pub mod health;
pub mod page;
pub mod session;
pub mod symptoms;
