use std::net::Ipv4Addr;

/// Result of one iteration of the probe loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success { rtt_ms: f64, ttl: u8, sequence: u16 },
    Timeout { sequence: u16 },
    Unreachable { sequence: u16 },
    TransportError(String),
}

impl ProbeOutcome {

    /// Line printed for this outcome.
    pub fn render(&self, source: Ipv4Addr, verbose: bool) -> String {
        match self {
            ProbeOutcome::Success { rtt_ms, ttl, sequence } if verbose => format!(
                "Ping response from {}: icmp_seq={} ttl={} time={:.1} ms",
                source, sequence, ttl, rtt_ms
            ),
            ProbeOutcome::Success { rtt_ms, .. } => {
                format!("Ping response from {}: {:.1} ms", source, rtt_ms)
            }
            ProbeOutcome::Timeout { sequence } => format!("Request timeout for icmp_seq {}", sequence),
            ProbeOutcome::Unreachable { sequence } => {
                format!("Destination unreachable (icmp_seq {})", sequence)
            }
            ProbeOutcome::TransportError(reason) => format!("Receive failed: {}", reason),
        }
    }
}
