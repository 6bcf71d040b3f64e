//! Request handlers, one module per resource

pub mod catalog;
pub mod health;
pub mod invoices;
pub mod logs;
pub mod orders;
pub mod users;
