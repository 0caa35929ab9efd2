//! ASN resolution using Team Cymru's DNS service.
//!
//! `AS<n>.asn.cymru.com` answers a TXT record of the form
//! `ASN | CC | Registry | Allocated | AS Name`.

use async_trait::async_trait;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::sync::Arc;

use crate::domain::models::Asn;
use crate::domain::ports::{AsnResolver, ResolverError};

const CYMRU_ASN_ZONE: &str = "asn.cymru.com";

/// Index of the AS name in the pipe separated TXT answer.
const AS_NAME_FIELD: usize = 4;

/// Resolves AS names from Team Cymru TXT records.
#[derive(Clone)]
pub struct CymruResolver {
    resolver: Arc<TokioResolver>,
}

impl CymruResolver {
    /// Create a resolver that queries Cloudflare's public DNS.
    pub fn new() -> Self {
        Self::with_resolver(create_default_resolver())
    }

    /// Use an existing hickory resolver.
    pub fn with_resolver(resolver: Arc<TokioResolver>) -> Self {
        Self { resolver }
    }
}

impl Default for CymruResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AsnResolver for CymruResolver {
    async fn resolve(&self, asn: Asn) -> Result<String, ResolverError> {
        let query = form_as_query(asn);

        let lookup = self
            .resolver
            .txt_lookup(query)
            .await
            .map_err(|e| ResolverError::Dns(e.to_string()))?;

        let record = lookup.iter().next().ok_or(ResolverError::NoData)?;
        let txt_data = record
            .iter()
            .map(|data| String::from_utf8_lossy(data))
            .collect::<Vec<_>>()
            .join("");

        parse_as_name(&txt_data)
    }
}

/// Create a default DNS resolver for ASN lookups
pub fn create_default_resolver() -> Arc<TokioResolver> {
    Arc::new(
        TokioResolver::builder_with_config(
            ResolverConfig::cloudflare(),
            TokioConnectionProvider::default(),
        )
        .build(),
    )
}

fn form_as_query(asn: Asn) -> String {
    format!("{asn}.{CYMRU_ASN_ZONE}")
}

fn parse_as_name(txt: &str) -> Result<String, ResolverError> {
    let parts: Vec<&str> = txt.split('|').map(str::trim).collect();
    let name = parts
        .get(AS_NAME_FIELD)
        .ok_or_else(|| ResolverError::InvalidFormat(txt.to_string()))?;

    if name.is_empty() {
        return Err(ResolverError::NoData);
    }
    Ok((*name).to_string())
}
