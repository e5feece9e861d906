//! Session Draft - compose a therapy session, its observation note and goal
//! performance assessments, then submit them to a practice-management API.
//!
//! Layout:
//! - `draft`: the in-memory aggregate and its business rules
//! - `reference`: cached read-only lookups (clients, goals, budget items...)
//! - `dialog`: picker state machine and the owner of one open dialog
//! - `submit`: ordered session -> note -> assessments submission
//! - `api`: the REST client trait, its HTTP implementation and payloads

pub mod api;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod draft;
pub mod models;
pub mod reference;
pub mod submit;

#[cfg(test)]
mod testing;
