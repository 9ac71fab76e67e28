//! Core library: filename parsing, folder sync and overdue reminders.

pub mod config;
pub mod error;
pub mod filename;
pub mod links;
pub mod models;
pub mod pipeline;
pub mod reminder;
pub mod sync;
