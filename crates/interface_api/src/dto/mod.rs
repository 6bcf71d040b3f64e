//! Request and response bodies

pub mod catalog;
pub mod invoices;
pub mod logs;
pub mod orders;
pub mod users;
