use crate::errors::PingError;

use log::debug;
use std::net::{IpAddr, Ipv4Addr};

/// Resolves a hostname or dotted-quad literal to a single IPv4 address.
pub fn resolve(host: &str) -> Result<Ipv4Addr, PingError> {
    if let Ok(address) = host.parse::<Ipv4Addr>() {
        return Ok(address);
    }

    let addresses = dns_lookup::lookup_host(host).map_err(|e| PingError::Resolution {
        host: host.to_string(),
        reason: e.to_string(),
    })?;
    debug!("{} resolved to {:?}", host, addresses);

    addresses.into_iter()
        .find_map(|address| match address {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| PingError::Resolution {
            host: host.to_string(),
            reason: "no IPv4 address found".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_address() {
        assert_eq!(resolve("192.0.2.7").unwrap(), Ipv4Addr::new(192, 0, 2, 7));
    }

    #[test]
    fn test_ipv6_literal_rejected() {
        match resolve("::1") {
            Err(PingError::Resolution { host, .. }) => assert_eq!(host, "::1"),
            other => panic!("expected resolution failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_host() {
        assert!(matches!(
            resolve("no-such-host.invalid"),
            Err(PingError::Resolution { .. })
        ));
    }
}
