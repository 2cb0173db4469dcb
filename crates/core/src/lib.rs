//! `siteflow-core` -- domain logic for the site approval workflow.
//!
//! Pure, I/O-free building blocks shared by every field module (builder
//! billing, customer billing, daily progress, attendance, safety
//! checklists): workflow-state derivation, allowed-action sets, quantity
//! arithmetic, and submission validation.  The HTTP and session layers
//! live in `siteflow-client`.

pub mod action;
pub mod error;
pub mod flow;
pub mod module;
pub mod quantity;
pub mod submission;
pub mod types;
pub mod workflow;
