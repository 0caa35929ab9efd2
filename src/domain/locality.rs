//! IP locality classification.
//!
//! Decides whether an address is routable on the public internet and
//! therefore eligible for external resolution. The tables are the IANA
//! special-purpose registries restricted to entries whose `Global` flag is
//! false:
//!
//! - <http://www.iana.org/assignments/iana-ipv4-special-registry/>
//! - <http://www.iana.org/assignments/iana-ipv6-special-registry/>

use ipnet::{Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use thiserror::Error;

/// A prefix table row: CIDR text and the reason it is not global.
pub type PrefixSpec = (&'static str, &'static str);

const NON_GLOBAL_IPV4: &[PrefixSpec] = &[
    ("127.0.0.0/8", "Loopback, RFC1122"),
    ("192.168.0.0/16", "Private-Use, RFC1918"),
    ("10.0.0.0/8", "Private-Use, RFC1918"),
    ("172.16.0.0/12", "Private-Use, RFC1918"),
    ("0.0.0.0/8", "This host on this network, RFC1122"),
    ("100.64.0.0/10", "Shared Address Space, RFC6598"),
    ("169.254.0.0/16", "Link Local, RFC3927"),
    ("192.0.0.0/24", "IETF Protocol Assignments, RFC6890"),
    ("192.0.2.0/24", "Documentation (TEST-NET-1), RFC5737"),
    ("198.18.0.0/15", "Benchmarking, RFC2544"),
    ("198.51.100.0/24", "Documentation (TEST-NET-2), RFC5737"),
    ("203.0.113.0/24", "Documentation (TEST-NET-3), RFC5737"),
    ("240.0.0.0/4", "Reserved, RFC1112"),
    ("255.255.255.255/32", "Limited Broadcast, RFC919"),
];

const NON_GLOBAL_IPV6: &[PrefixSpec] = &[
    ("::1/128", "Loopback Address, RFC4291"),
    ("fc00::/7", "Unique-Local, RFC4193"),
    ("::ffff:0:0/96", "IPv4-mapped Address, RFC4291"),
    ("2001::/23", "IETF Protocol Assignments, RFC2928"),
    ("fe80::/10", "Link-Scoped Unicast, RFC4291"),
    ("2001:db8::/32", "Documentation, RFC3849"),
    ("2001:2::/48", "Benchmarking, RFC5180"),
    ("2001::/32", "TEREDO, RFC4380"),
    ("100::/64", "Discard-Only Address Block, RFC6666"),
    ("::/128", "Unspecified Address, RFC4291"),
];

/// A prefix table entry failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable CIDR '{cidr}': {reason}")]
pub struct PrefixTableError {
    /// The offending prefix text.
    pub cidr: String,
    /// Why it failed to parse.
    pub reason: String,
}

#[derive(Debug, Clone)]
struct Entry<N> {
    net: N,
    reason: &'static str,
}

/// Immutable, validated non-global prefix tables.
#[derive(Debug, Clone)]
pub struct LocalityClassifier {
    ipv4: Vec<Entry<Ipv4Net>>,
    ipv6: Vec<Entry<Ipv6Net>>,
}

impl LocalityClassifier {
    /// Build the classifier from the built-in IANA tables.
    pub fn new() -> Result<Self, PrefixTableError> {
        Self::from_tables(NON_GLOBAL_IPV4, NON_GLOBAL_IPV6)
    }

    /// Build from arbitrary tables. A single unparseable entry fails the
    /// whole build; a partial table is never returned.
    pub fn from_tables(ipv4: &[PrefixSpec], ipv6: &[PrefixSpec]) -> Result<Self, PrefixTableError> {
        Ok(Self {
            ipv4: parse_table(ipv4)?,
            ipv6: parse_table(ipv6)?,
        })
    }

    /// Tells if an address is not forwardable beyond its network.
    ///
    /// An absent address is local: unknown input is never disclosed.
    pub fn is_local(&self, addr: impl Into<Option<IpAddr>>) -> bool {
        match addr.into() {
            None => true,
            Some(addr) => self.reason(addr).is_some(),
        }
    }

    /// The reason of the first table entry containing `addr`, if any.
    ///
    /// IPv4-mapped IPv6 addresses are classified by the IPv4 table.
    pub fn reason(&self, addr: IpAddr) -> Option<&'static str> {
        match addr {
            IpAddr::V4(v4) => self.reason_v4(v4),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => self.reason_v4(v4),
                None => self.reason_v6(v6),
            },
        }
    }

    fn reason_v4(&self, addr: Ipv4Addr) -> Option<&'static str> {
        self.ipv4
            .iter()
            .find(|entry| entry.net.contains(&addr))
            .map(|entry| entry.reason)
    }

    fn reason_v6(&self, addr: Ipv6Addr) -> Option<&'static str> {
        self.ipv6
            .iter()
            .find(|entry| entry.net.contains(&addr))
            .map(|entry| entry.reason)
    }
}

fn parse_table<N>(specs: &[PrefixSpec]) -> Result<Vec<Entry<N>>, PrefixTableError>
where
    N: std::str::FromStr<Err = ipnet::AddrParseError>,
{
    specs
        .iter()
        .map(|&(cidr, reason)| {
            cidr.parse::<N>()
                .map(|net| Entry { net, reason })
                .map_err(|e| PrefixTableError {
                    cidr: cidr.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

static DEFAULT_CLASSIFIER: LazyLock<LocalityClassifier> = LazyLock::new(|| {
    LocalityClassifier::new().unwrap_or_else(|e| panic!("built-in prefix table is invalid: {e}"))
});

/// The process-wide classifier built from the IANA tables.
pub fn default_classifier() -> &'static LocalityClassifier {
    &DEFAULT_CLASSIFIER
}

/// Tells if an address is local using the built-in tables.
pub fn is_local(addr: impl Into<Option<IpAddr>>) -> bool {
    DEFAULT_CLASSIFIER.is_local(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_builtin_tables_parse() {
        let classifier = LocalityClassifier::new().unwrap();
        assert_eq!(classifier.ipv4.len(), NON_GLOBAL_IPV4.len());
        assert_eq!(classifier.ipv6.len(), NON_GLOBAL_IPV6.len());
    }

    #[test]
    fn test_absent_address_is_local() {
        assert!(is_local(None::<IpAddr>));
    }

    #[test]
    fn test_every_ipv4_entry_network_is_local() {
        for (cidr, _) in NON_GLOBAL_IPV4 {
            let net: Ipv4Net = cidr.parse().unwrap();
            assert!(is_local(IpAddr::V4(net.network())), "{cidr} network");
            assert!(is_local(IpAddr::V4(net.broadcast())), "{cidr} broadcast");
        }
    }

    #[test]
    fn test_every_ipv6_entry_network_is_local() {
        // The mapped range defers to the IPv4 table
        for (cidr, _) in NON_GLOBAL_IPV6.iter().filter(|(cidr, _)| *cidr != "::ffff:0:0/96") {
            let net: Ipv6Net = cidr.parse().unwrap();
            assert!(is_local(IpAddr::V6(net.network())), "{cidr} network");
            assert!(is_local(IpAddr::V6(net.broadcast())), "{cidr} last address");
        }
    }

    #[test]
    fn test_known_addresses() {
        assert!(is_local(ip("127.0.0.1")));
        assert!(is_local(ip("10.1.2.3")));
        assert!(is_local(ip("172.31.255.255")));
        assert!(is_local(ip("100.64.0.1")));
        assert!(is_local(ip("255.255.255.255")));
        assert!(is_local(ip("::1")));
        assert!(is_local(ip("::")));
        assert!(is_local(ip("fe80::1")));
        assert!(is_local(ip("fd00::1")));

        assert!(!is_local(ip("8.8.8.8")));
        assert!(!is_local(ip("1.1.1.1")));
        assert!(!is_local(ip("172.32.0.1")));
        assert!(!is_local(ip("2606:4700:4700::1111")));
        assert!(!is_local(ip("2a00:1450:4001:80b::200e")));
    }

    #[test]
    fn test_ipv4_mapped_uses_ipv4_table() {
        assert!(!is_local(ip("::ffff:8.8.8.8")));
        assert!(!is_local(ip("::ffff:1.1.1.1")));
        assert!(is_local(ip("::ffff:10.0.0.1")));
        assert!(is_local(ip("::ffff:127.0.0.1")));
        assert_eq!(
            default_classifier().reason(ip("::ffff:192.168.1.1")),
            Some("Private-Use, RFC1918")
        );
        assert_eq!(default_classifier().reason(ip("::ffff:8.8.8.8")), None);
    }

    #[test]
    fn test_reason_reports_matching_entry() {
        let classifier = default_classifier();
        assert_eq!(classifier.reason(ip("192.168.1.1")), Some("Private-Use, RFC1918"));
        assert_eq!(classifier.reason(ip("2001:db8::1")), Some("Documentation, RFC3849"));
        assert_eq!(
            classifier.reason(ip("2001:1::1")),
            Some("IETF Protocol Assignments, RFC2928")
        );
        assert_eq!(classifier.reason(ip("8.8.8.8")), None);
    }

    #[test]
    fn test_malformed_entry_aborts_build() {
        let ipv4 = [("10.0.0.0/8", "ok"), ("10.0.0.0/33", "bad mask")];
        let err = LocalityClassifier::from_tables(&ipv4, NON_GLOBAL_IPV6).unwrap_err();
        assert_eq!(err.cidr, "10.0.0.0/33");

        let ipv6 = [("fe80::/10", "ok"), ("not-a-prefix", "garbage")];
        let err = LocalityClassifier::from_tables(NON_GLOBAL_IPV4, &ipv6).unwrap_err();
        assert_eq!(err.cidr, "not-a-prefix");
    }

    #[test]
    fn test_family_tables_do_not_cross() {
        // An IPv6 prefix in the IPv4 table is a parse failure, not a silent skip
        let ipv4 = [("::1/128", "wrong family")];
        assert!(LocalityClassifier::from_tables(&ipv4, &[]).is_err());
    }
}
