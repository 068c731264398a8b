//! HTTP response mapping.
//!
//! Implements `IntoResponse` for [`crate::error::AuthError`] so guard and
//! store errors surface as FHIR OperationOutcome responses with the right
//! status codes. Routing and extractors live with the embedding server,
//! not here.

pub mod error;

pub use error::operation_outcome_json;
