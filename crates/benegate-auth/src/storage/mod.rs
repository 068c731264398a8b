//! Storage traits for authorization data.
//!
//! This module defines storage interfaces for:
//!
//! - Grants and their archive
//! - Access tokens and their archive
//! - Application records
//! - Beneficiary identity crosswalks
//!
//! # Implementations
//!
//! Storage implementations are provided in separate crates:
//!
//! - `benegate-auth-memory` - in-memory backend

pub mod application;
pub mod crosswalk;
pub mod grant;
pub mod token;

pub use application::ApplicationStorage;
pub use crosswalk::CrosswalkStorage;
pub use grant::GrantStorage;
pub use token::TokenStorage;
