//! FHIR reference parsing.
//!
//! Resource payloads point at their subject with reference strings such as
//! `Patient/123`. Ownership checks need the id segment of those references,
//! so this module parses reference strings into their component parts and
//! classifies everything that cannot be resolved locally.
//!
//! # Reference Formats
//!
//! - Relative: `Patient/123` (resolvable)
//! - Contained: `#contained-id` (cannot be resolved)
//! - URN: `urn:uuid:xxx` or `urn:oid:xxx` (cannot be resolved)
//! - Absolute URL: `http://example.org/fhir/Patient/123` (treated as
//!   external; this core has no notion of its own base URL)

use std::fmt;

/// A successfully parsed local FHIR reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FhirReference {
    /// The resource type (e.g., "Patient", "Coverage")
    pub resource_type: String,
    /// The resource ID
    pub id: String,
}

impl FhirReference {
    /// Creates a new FhirReference.
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Returns the reference as a relative string (Type/id).
    pub fn to_relative(&self) -> String {
        format!("{}/{}", self.resource_type, self.id)
    }
}

impl fmt::Display for FhirReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_relative())
    }
}

/// Represents a reference that cannot be resolved locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvableReference {
    /// A contained reference (starts with `#`)
    Contained(String),
    /// A URN reference (`urn:uuid:xxx` or `urn:oid:xxx`)
    Urn(String),
    /// An absolute URL pointing at some server
    External(String),
    /// A malformed or invalid reference
    Invalid(String),
}

impl fmt::Display for UnresolvableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contained(id) => write!(f, "contained reference: #{id}"),
            Self::Urn(urn) => write!(f, "URN reference: {urn}"),
            Self::External(url) => write!(f, "external reference: {url}"),
            Self::Invalid(reason) => write!(f, "invalid reference: {reason}"),
        }
    }
}

impl std::error::Error for UnresolvableReference {}

/// Parse a FHIR reference string into its components.
///
/// # Errors
///
/// Returns [`UnresolvableReference`] for contained references, URNs, absolute
/// URLs, and malformed input.
///
/// # Examples
///
/// ```
/// use benegate_core::reference::parse_reference;
///
/// let r = parse_reference("Patient/123").unwrap();
/// assert_eq!(r.resource_type, "Patient");
/// assert_eq!(r.id, "123");
///
/// assert!(parse_reference("#contained").is_err());
/// ```
pub fn parse_reference(reference: &str) -> Result<FhirReference, UnresolvableReference> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(UnresolvableReference::Invalid(
            "empty reference".to_string(),
        ));
    }

    // Skip contained references (#id)
    if let Some(contained_id) = reference.strip_prefix('#') {
        return Err(UnresolvableReference::Contained(contained_id.to_string()));
    }

    // Skip URN references (urn:uuid:xxx, urn:oid:xxx)
    if reference.starts_with("urn:") {
        return Err(UnresolvableReference::Urn(reference.to_string()));
    }

    // Absolute URLs belong to some upstream server, never to this core
    if reference.contains("://") {
        return Err(UnresolvableReference::External(reference.to_string()));
    }

    // Parse "ResourceType/id"
    let parts: Vec<&str> = reference.split('/').collect();

    if parts.len() < 2 {
        return Err(UnresolvableReference::Invalid(format!(
            "reference must contain at least Type/id: {reference}"
        )));
    }

    let resource_type = parts[0];
    let id = parts[1];

    // Validate resource type (must start with uppercase letter)
    if !resource_type
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
    {
        return Err(UnresolvableReference::Invalid(format!(
            "resource type must start with uppercase letter: {resource_type}"
        )));
    }

    // Validate ID is not empty
    if id.is_empty() {
        return Err(UnresolvableReference::Invalid(
            "resource id cannot be empty".to_string(),
        ));
    }

    Ok(FhirReference {
        resource_type: resource_type.to_string(),
        id: id.to_string(),
    })
}

/// Extract just the id segment of a reference.
///
/// This is what ownership comparison needs: `Patient/123` yields `123`.
pub fn reference_id(reference: &str) -> Result<String, UnresolvableReference> {
    let parsed = parse_reference(reference)?;
    Ok(parsed.id)
}
