//! Transport layer protocols implementation
//!
//! This module contains header decoders for transport layer protocols:
//! - TCP: Transmission Control Protocol
//! - UDP: User Datagram Protocol
//!
//! The responder observes these but never answers them, so only enough is
//! decoded to log the endpoints and verify the checksum.

use std::net::Ipv4Addr;

use crate::network::{checksum, sum_words, IpProtocol};

pub mod tcp;
pub mod udp;

// Re-export commonly used items
pub use tcp::TcpHeader;
pub use udp::UdpHeader;

/// Verify a TCP or UDP checksum over `segment` using the IPv4 pseudo-header
///
/// The pseudo-header is summed separately and fed into the segment sum, so
/// nothing is copied. Returns the ones'-complement result, zero when valid.
pub fn pseudo_header_checksum(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    protocol: IpProtocol,
    segment: &[u8],
) -> u16 {
    let mut sum = sum_words(0, &src.octets());
    sum = sum_words(sum, &dst.octets());
    sum = sum_words(sum, &[0, protocol.id()]);
    sum = sum_words(sum, &(segment.len() as u16).to_be_bytes());
    checksum(sum, segment)
}
