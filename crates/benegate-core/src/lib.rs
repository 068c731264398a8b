//! Core types and utilities shared across the Benegate workspace.
//!
//! This crate carries no domain logic of its own; it provides the vocabulary
//! the rest of the gateway speaks: error types, UTC timestamp helpers
//! (including calendar-month arithmetic for data-access windows), the
//! resource envelope crossing the access-control boundary, and FHIR
//! reference parsing.

pub mod error;
pub mod reference;
pub mod resource;
pub mod time;

pub use error::{CoreError, ErrorCategory, Result};
pub use reference::{FhirReference, UnresolvableReference, parse_reference, reference_id};
pub use resource::{ResourceEnvelope, ResourceType, is_valid_resource_type_name};
pub use time::{add_months, format_rfc3339, now_utc, parse_rfc3339};
