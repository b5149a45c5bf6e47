//! Routing use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into selection, intake and admin APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod admin_service;
pub mod intake_service;
pub mod selector;
