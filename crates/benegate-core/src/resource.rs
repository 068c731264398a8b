//! Resource payload types crossing the access-control boundary.
//!
//! The gateway never interprets FHIR semantics; resource bodies pass through
//! as opaque JSON. [`ResourceEnvelope`] lifts out only the two fields the
//! access-control layer needs (`id` and `resourceType`) and keeps the rest as
//! untyped data.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Resource types known to the gateway.
///
/// Only [`Patient`](ResourceType::Patient), [`Coverage`](ResourceType::Coverage)
/// and [`ExplanationOfBenefit`](ResourceType::ExplanationOfBenefit) are served
/// to API callers; every other well-formed type round-trips through
/// [`Custom`](ResourceType::Custom) so envelope parsing never fails on foreign
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Patient,
    Coverage,
    ExplanationOfBenefit,
    OperationOutcome,
    #[serde(untagged)]
    Custom(String),
}

impl ResourceType {
    /// Whether this resource type is served by the protected data endpoints.
    pub fn is_servable(&self) -> bool {
        matches!(
            self,
            Self::Patient | Self::Coverage | Self::ExplanationOfBenefit
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Patient => write!(f, "Patient"),
            ResourceType::Coverage => write!(f, "Coverage"),
            ResourceType::ExplanationOfBenefit => write!(f, "ExplanationOfBenefit"),
            ResourceType::OperationOutcome => write!(f, "OperationOutcome"),
            ResourceType::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(ResourceType::Patient),
            "Coverage" => Ok(ResourceType::Coverage),
            "ExplanationOfBenefit" => Ok(ResourceType::ExplanationOfBenefit),
            "OperationOutcome" => Ok(ResourceType::OperationOutcome),
            name => {
                if is_valid_resource_type_name(name) {
                    Ok(ResourceType::Custom(name.to_string()))
                } else {
                    Err(CoreError::invalid_resource_type(name.to_string()))
                }
            }
        }
    }
}

/// Validate if a string is a valid FHIR resource type name
pub fn is_valid_resource_type_name(name: &str) -> bool {
    // FHIR resource type names must start with uppercase letter and contain only letters
    !name.is_empty()
        && name
            .chars()
            .next()
            .map(|c| c.is_ascii_uppercase())
            .unwrap_or(false)
        && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// A resource payload with its identity fields lifted out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEnvelope {
    pub id: String,
    #[serde(rename = "resourceType")]
    pub resource_type: ResourceType,
    #[serde(flatten)]
    pub data: HashMap<String, Value>,
}

impl ResourceEnvelope {
    pub fn new(id: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            id: id.into(),
            resource_type,
            data: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn get_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Parse an envelope from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::JsonError`] if `id` or `resourceType` are missing
    /// or malformed, and [`CoreError::InvalidResource`] if `id` is empty.
    pub fn from_json(value: Value) -> crate::error::Result<Self> {
        let envelope: ResourceEnvelope = serde_json::from_value(value)?;
        if envelope.id.is_empty() {
            return Err(CoreError::invalid_resource("resource id cannot be empty"));
        }
        Ok(envelope)
    }
}
