use std::fmt;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statistics {
    sent: u32,
    received: u32,
    total_rtt_ms: f64,
}

impl Statistics {

    pub fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub fn record_reply(&mut self, rtt_ms: f64) {
        debug_assert!(self.received < self.sent, "reply recorded without a matching send");
        self.received += 1;
        self.total_rtt_ms += rtt_ms;
    }

    pub fn finalize(&self) -> Report {
        let loss_percent = (self.sent > 0)
            .then(|| ((self.sent - self.received) as u64 * 100 / self.sent as u64) as u32);
        let mean_rtt_ms = (self.received > 0)
            .then(|| self.total_rtt_ms / self.received as f64);
        Report { sent: self.sent, received: self.received, loss_percent, mean_rtt_ms }
    }
}

/// Summary printed after the probe loop terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sent: u32,
    pub received: u32,
    pub loss_percent: Option<u32>,
    pub mean_rtt_ms: Option<f64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} packets transmitted, {} received, ", self.sent, self.received)?;
        match (self.loss_percent, self.mean_rtt_ms) {
            (None, _) => write!(f, "No packets transmitted"),
            (Some(loss), Some(mean)) => write!(f, "{}% packet loss, time {:.0}ms", loss, mean),
            (Some(loss), None) => write!(f, "{}% packet loss, time N/A", loss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(sent: u32, rtts: &[f64]) -> Statistics {
        let mut stats = Statistics::default();
        for _ in 0..sent {
            stats.record_sent();
        }
        for rtt in rtts {
            stats.record_reply(*rtt);
        }
        stats
    }

    #[test]
    fn test_nothing_sent() {
        let report = stats(0, &[]).finalize();
        assert_eq!(report.loss_percent, None);
        assert_eq!(report.mean_rtt_ms, None);
        assert_eq!(report.to_string(), "0 packets transmitted, 0 received, No packets transmitted");
    }

    #[test]
    fn test_all_lost() {
        let report = stats(5, &[]).finalize();
        assert_eq!(report.loss_percent, Some(100));
        assert_eq!(report.to_string(), "5 packets transmitted, 0 received, 100% packet loss, time N/A");
    }

    #[test]
    fn test_half_lost() {
        let report = stats(4, &[10.0, 20.0]).finalize();
        assert_eq!(report.loss_percent, Some(50));
        assert_eq!(report.mean_rtt_ms, Some(15.0));
        assert_eq!(report.to_string(), "4 packets transmitted, 2 received, 50% packet loss, time 15ms");
    }

    #[test]
    fn test_loss_truncates_toward_zero() {
        // 1 of 3 lost is 33.3%
        let report = stats(3, &[1.0, 1.0]).finalize();
        assert_eq!(report.loss_percent, Some(33));
    }

    #[test]
    fn test_no_loss() {
        let report = stats(2, &[0.4, 0.8]).finalize();
        assert_eq!(report.to_string(), "2 packets transmitted, 2 received, 0% packet loss, time 1ms");
    }
}
