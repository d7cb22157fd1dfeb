use crate::codec::{decode, encode_echo_request, Classified, ECHO_REQUEST_SIZE};
use crate::errors::PingError;
use crate::lifecycle::Lifecycle;
use crate::messages::ProbeOutcome;
use crate::stats::{Report, Statistics};
use crate::transport::{Inbound, Transport};

use log::{debug, error, trace, warn};
use std::io::Write;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long to wait for a reply before reporting a timeout.
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(1);

/// Pause between two probes.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub verbose: bool,
    pub reply_timeout: Duration,
    pub interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { verbose: false, reply_timeout: REPLY_TIMEOUT, interval: PROBE_INTERVAL }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Draining,
    Terminated,
}

/// Probe loop against a single destination: send, wait, classify, report, repeat
/// until cancelled or a send fails.
pub struct Session<T: Transport, W: Write> {
    host: String,
    destination: Ipv4Addr,
    identifier: u16,
    next_sequence: u16,
    stats: Statistics,
    state: SessionState,
    config: SessionConfig,
    lifecycle: Arc<Lifecycle>,
    transport: T,
    out: W,
}

impl<T: Transport, W: Write> Session<T, W> {

    pub fn new(host: String, destination: Ipv4Addr, identifier: u16, transport: T,
               lifecycle: Arc<Lifecycle>, config: SessionConfig, out: W) -> Session<T, W> {
        Session {
            host,
            destination,
            identifier,
            next_sequence: 0,
            stats: Statistics::default(),
            state: SessionState::Idle,
            config,
            lifecycle,
            transport,
            out,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session to completion. The transport is closed and the
    /// statistics block printed on every path out of the loop.
    pub fn run(&mut self) -> Result<Report, PingError> {
        let looped = self.start().and_then(|()| self.probe_loop());
        let report = self.terminate();
        looped?;
        report
    }

    fn start(&mut self) -> Result<(), PingError> {
        writeln!(self.out, "PING {} ({}): {} data bytes", self.host, self.destination, ECHO_REQUEST_SIZE)?;
        self.state = SessionState::Running;
        debug!("session started, identifier {:#06x}", self.identifier);
        Ok(())
    }

    fn probe_loop(&mut self) -> Result<(), PingError> {
        while self.state == SessionState::Running {
            if self.lifecycle.is_cancelled() {
                self.state = SessionState::Draining;
                break;
            }

            let outcome = match self.probe_once() {
                Ok(outcome) => outcome,
                Err(PingError::Send(e)) => {
                    error!("Send failed: {}", e);
                    self.state = SessionState::Draining;
                    break;
                }
                Err(e) => return Err(e),
            };

            // a timed-out or failed wait already used up the probe slot
            let paced = !matches!(
                outcome,
                Some(ProbeOutcome::Timeout { .. } | ProbeOutcome::TransportError(_))
            );
            if let Some(outcome) = outcome {
                let line = outcome.render(self.destination, self.config.verbose);
                match outcome {
                    ProbeOutcome::TransportError(_) => warn!("{}", line),
                    _ => writeln!(self.out, "{}", line)?,
                }
            }

            if paced {
                self.lifecycle.sleep(self.config.interval);
            }
        }
        Ok(())
    }

    fn probe_once(&mut self) -> Result<Option<ProbeOutcome>, PingError> {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.wrapping_add(1);
        let request = encode_echo_request(self.identifier, sequence);

        let started = Instant::now();
        let sent = self.transport.send(&request);
        // counted whether or not the send went through
        self.stats.record_sent();
        sent?;

        let datagram = match self.transport.await_reply(self.config.reply_timeout) {
            Ok(Inbound::Datagram(datagram)) => datagram,
            Ok(Inbound::Timeout) => return Ok(Some(ProbeOutcome::Timeout { sequence })),
            Err(PingError::Receive(e)) => return Ok(Some(ProbeOutcome::TransportError(e.to_string()))),
            Err(e) => return Err(e),
        };

        match decode(&datagram, self.identifier) {
            Ok(Classified::MatchingEchoReply(reply)) => {
                let rtt_ms = started.elapsed().as_secs_f64() * 1000.0;
                trace!("echo reply type {} with {} payload bytes", reply.icmp_type, reply.payload_len);
                self.stats.record_reply(rtt_ms);
                Ok(Some(ProbeOutcome::Success { rtt_ms, ttl: reply.ttl, sequence: reply.sequence }))
            }
            Ok(Classified::DestinationUnreachable(reply)) => {
                debug!("destination unreachable, code {}", reply.code);
                Ok(Some(ProbeOutcome::Unreachable { sequence }))
            }
            Ok(Classified::Other) => {
                trace!("ignoring unrelated ICMP datagram of {} bytes", datagram.len());
                Ok(None)
            }
            Err(e) => {
                trace!("ignoring datagram: {}", e);
                Ok(None)
            }
        }
    }

    fn terminate(&mut self) -> Result<Report, PingError> {
        self.state = SessionState::Draining;
        self.transport.close();

        let report = self.stats.finalize();
        writeln!(self.out, "\n--- {} ping statistics ---", self.host)?;
        writeln!(self.out, "{}", report)?;
        self.out.flush()?;
        self.state = SessionState::Terminated;
        Ok(report)
    }
}
