//! `siteflow-client` -- network and session layer for the approval workflow.
//!
//! Wraps the backend's detail and flow-action endpoints behind a small
//! [`reqwest`]-based gateway, reads the persisted session identity, and
//! dispatches action/amendment submissions as the backend expects them
//! (multipart with base64-wrapped actor id).  All domain rules live in
//! `siteflow-core`; this crate only moves bytes and enforces the
//! one-submit-in-flight and loading-indicator disciplines.

pub mod activity;
pub mod config;
pub mod detail;
pub mod dispatch;
pub mod documents;
pub mod error;
pub mod gateway;
pub mod session;
