use crate::errors::PingError;

use log::{debug, trace};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, Read};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: u32 = 64;

pub const MAX_PACKET_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Datagram(Vec<u8>),
    Timeout,
}

pub trait Transport {
    fn send(&mut self, request: &[u8]) -> Result<(), PingError>;

    fn await_reply(&mut self, timeout: Duration) -> Result<Inbound, PingError>;

    // must be safe to call more than once
    fn close(&mut self);
}

pub struct RawSocketTransport {
    socket: Option<Socket>,
    destination: SockAddr,
    buffer: Vec<u8>,
}

impl RawSocketTransport {

    pub fn open(destination: Ipv4Addr) -> Result<RawSocketTransport, PingError> {
        let socket = Socket::new_raw(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
            .map_err(|e| match e.kind() {
                io::ErrorKind::PermissionDenied => PingError::PermissionDenied(e),
                _ => PingError::Socket(e),
            })?;
        socket.set_ttl(DEFAULT_TTL).map_err(PingError::Socket)?;
        debug!("raw ICMP socket open towards {} with ttl {}", destination, DEFAULT_TTL);

        Ok(RawSocketTransport {
            socket: Some(socket),
            destination: SocketAddrV4::new(destination, 0).into(),
            buffer: vec![0; MAX_PACKET_SIZE],
        })
    }
}

/// Calls `read` with whatever is left of `timeout` until it yields data, times
/// out or fails. Interrupted reads are retried against the same deadline.
fn read_before_deadline<F>(timeout: Duration, mut read: F) -> io::Result<Option<usize>>
where
    F: FnMut(Duration) -> io::Result<usize>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        // a zero timeval means "block forever" to the kernel
        if remaining.as_micros() == 0 {
            return Ok(None);
        }

        match read(remaining) {
            Ok(len) => return Ok(Some(len)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!("wait interrupted, {:?} left", remaining);
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
    }
}

fn live(socket: &Option<Socket>) -> io::Result<&Socket> {
    socket.as_ref()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "transport closed"))
}

impl Transport for RawSocketTransport {

    fn send(&mut self, request: &[u8]) -> Result<(), PingError> {
        let socket = live(&self.socket).map_err(PingError::Send)?;
        socket.send_to(request, &self.destination).map_err(PingError::Send)?;
        Ok(())
    }

    fn await_reply(&mut self, timeout: Duration) -> Result<Inbound, PingError> {
        let mut socket = live(&self.socket).map_err(PingError::Receive)?;
        let buffer = &mut self.buffer;
        let received = read_before_deadline(timeout, |remaining| {
            socket.set_read_timeout(Some(remaining))?;
            socket.read(&mut buffer[..])
        }).map_err(PingError::Receive)?;

        Ok(match received {
            Some(len) => Inbound::Datagram(self.buffer[..len].to_vec()),
            None => Inbound::Timeout,
        })
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!("raw ICMP socket closed");
        }
    }
}

#[cfg(test)]
impl<T: Transport + ?Sized> Transport for &mut T {

    fn send(&mut self, request: &[u8]) -> Result<(), PingError> {
        (**self).send(request)
    }

    fn await_reply(&mut self, timeout: Duration) -> Result<Inbound, PingError> {
        (**self).await_reply(timeout)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
