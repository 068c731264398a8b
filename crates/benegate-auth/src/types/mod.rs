//! Domain types shared across the authorization modules.
//!
//! ## Entities
//!
//! - [`Application`] - the requesting application and its data-access type
//! - [`Grant`] / [`ArchivedGrant`] - active and archived authorizations
//! - [`AccessToken`] / [`ArchivedToken`] - live and archived credentials
//! - [`Crosswalk`] - internal-to-FHIR identity mapping

pub mod application;
pub mod crosswalk;
pub mod grant;
pub mod token;

pub use application::{Application, DataAccessType};
pub use crosswalk::Crosswalk;
pub use grant::{ArchivedGrant, Grant};
pub use token::{AccessToken, ArchivedToken};
