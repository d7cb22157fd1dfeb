use crate::checksum::checksum;

use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{IcmpCode, IcmpTypes};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::Packet;
use thiserror::Error;

/// Size of the payload-free echo request header.
pub const ECHO_REQUEST_SIZE: usize = 8;

/// Fields of an inbound ICMP message together with the TTL of its IPv4 envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReply {
    pub icmp_type: u8,
    pub code: u8,
    pub identifier: u16,
    pub sequence: u16,
    pub ttl: u8,
    pub payload_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    MatchingEchoReply(EchoReply),
    DestinationUnreachable(EchoReply),
    Other,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("datagram truncated: {len} bytes, need at least {needed}")]
    Truncated { len: usize, needed: usize },
}

pub fn encode_echo_request(identifier: u16, sequence: u16) -> [u8; ECHO_REQUEST_SIZE] {
    let mut buf = [0u8; ECHO_REQUEST_SIZE];
    // cannot fail: the buffer is exactly the echo request header size
    let mut echo_packet =
        MutableEchoRequestPacket::new(&mut buf).expect("buffer sized for an echo request");

    echo_packet.set_icmp_type(IcmpTypes::EchoRequest);
    echo_packet.set_icmp_code(IcmpCode::new(0));
    echo_packet.set_identifier(identifier);
    echo_packet.set_sequence_number(sequence);
    echo_packet.set_checksum(0);

    let echo_checksum = checksum(echo_packet.packet());
    echo_packet.set_checksum(echo_checksum);
    buf
}

/// Parses a raw-socket datagram (IPv4 header followed by ICMP) and classifies
/// it against the identifier of this process.
pub fn decode(buf: &[u8], identifier: u16) -> Result<Classified, DecodeError> {
    let ipv4 = Ipv4Packet::new(buf).ok_or(DecodeError::Truncated {
        len: buf.len(),
        needed: Ipv4Packet::minimum_packet_size(),
    })?;

    let offset = ipv4.get_header_length() as usize * 4;
    let needed = offset + ECHO_REQUEST_SIZE;
    if buf.len() < needed {
        return Err(DecodeError::Truncated { len: buf.len(), needed });
    }

    let icmp = EchoReplyPacket::new(&buf[offset..])
        .ok_or(DecodeError::Truncated { len: buf.len(), needed })?;
    let reply = EchoReply {
        icmp_type: icmp.get_icmp_type().0,
        code: icmp.get_icmp_code().0,
        identifier: icmp.get_identifier(),
        sequence: icmp.get_sequence_number(),
        ttl: ipv4.get_ttl(),
        payload_len: icmp.payload().len(),
    };

    Ok(match icmp.get_icmp_type() {
        IcmpTypes::EchoReply if reply.identifier == identifier => Classified::MatchingEchoReply(reply),
        IcmpTypes::DestinationUnreachable => Classified::DestinationUnreachable(reply),
        _ => Classified::Other,
    })
}
