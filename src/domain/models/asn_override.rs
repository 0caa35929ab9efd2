//! Operator supplied ASN descriptions.

use serde::{Deserialize, Serialize};

use super::asn::Asn;

/// A locally defined description that supersedes resolved metadata for one ASN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnOverride {
    /// The overridden ASN.
    pub asn: Asn,
    /// Free-text description, serialised as `name`.
    #[serde(rename = "name")]
    pub description: String,
}

impl AsnOverride {
    /// Create an override record.
    pub fn new(asn: Asn, description: impl Into<String>) -> Self {
        Self {
            asn,
            description: description.into(),
        }
    }
}
