//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the interaction surface decoupled from storage details.

pub mod attendance_service;
pub mod lifecycle_service;
pub mod registration_service;
pub mod report_service;
