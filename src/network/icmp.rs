//! ICMP (Internet Control Message Protocol) implementation
//!
//! This module provides ICMPv4 message parsing and construction.
//! Only Echo Request and Echo Reply carry a decoded body; other types are
//! recognised by name for logging.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Layer, Result};
use crate::network::checksum;

/// ICMP common header length in bytes (type, code, checksum)
pub const ICMP_HEADER_LEN: usize = 4;

/// ICMP echo header length in bytes (common header, identifier, sequence)
pub const ICMP_ECHO_HEADER_LEN: usize = 8;

/// ICMP message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    EchoRequest,
    TimeExceeded,
    Other(u8),
}

impl IcmpType {
    pub const ECHO_REPLY: u8 = 0;
    pub const DESTINATION_UNREACHABLE: u8 = 3;
    pub const ECHO_REQUEST: u8 = 8;
    pub const TIME_EXCEEDED: u8 = 11;

    pub fn id(self) -> u8 {
        match self {
            IcmpType::EchoReply => Self::ECHO_REPLY,
            IcmpType::DestinationUnreachable => Self::DESTINATION_UNREACHABLE,
            IcmpType::EchoRequest => Self::ECHO_REQUEST,
            IcmpType::TimeExceeded => Self::TIME_EXCEEDED,
            IcmpType::Other(id) => id,
        }
    }
}

impl From<u8> for IcmpType {
    fn from(id: u8) -> Self {
        match id {
            Self::ECHO_REPLY => IcmpType::EchoReply,
            Self::DESTINATION_UNREACHABLE => IcmpType::DestinationUnreachable,
            Self::ECHO_REQUEST => IcmpType::EchoRequest,
            Self::TIME_EXCEEDED => IcmpType::TimeExceeded,
            other => IcmpType::Other(other),
        }
    }
}

impl fmt::Display for IcmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcmpType::EchoReply => f.write_str("echo reply"),
            IcmpType::DestinationUnreachable => f.write_str("destination unreachable"),
            IcmpType::EchoRequest => f.write_str("echo request"),
            IcmpType::TimeExceeded => f.write_str("time exceeded"),
            IcmpType::Other(id) => write!(f, "type {}", id),
        }
    }
}

/// ICMP common header
///
/// Represents the 4 bytes shared by every ICMP message as defined in RFC 792
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader {
    pub msg_type: IcmpType, // ICMP message type
    pub msg_code: u8,       // ICMP message code
    pub checksum: u16,      // ICMP checksum
}

impl IcmpHeader {
    /// Parse ICMP header from byte slice
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ICMP_HEADER_LEN {
            return Err(Error::truncated(Layer::Icmp, data.len(), ICMP_HEADER_LEN));
        }

        Ok(IcmpHeader {
            msg_type: IcmpType::from(data[0]),
            msg_code: data[1],
            checksum: BigEndian::read_u16(&data[2..4]),
        })
    }

    /// Validate the checksum over the whole message, header and payload
    pub fn validate_checksum(data: &[u8]) -> Result<()> {
        match checksum(0, data) {
            0 => Ok(()),
            sum => Err(Error::ChecksumMismatch {
                layer: Layer::Icmp,
                sum,
            }),
        }
    }

    /// Check if this is an Echo Request message
    pub fn is_echo_request(&self) -> bool {
        self.msg_type == IcmpType::EchoRequest
    }

    /// Check if this is an Echo Reply message
    pub fn is_echo_reply(&self) -> bool {
        self.msg_type == IcmpType::EchoReply
    }
}

/// Body of an Echo Request or Echo Reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpEcho<'a> {
    pub identifier: u16,
    pub sequence: u16,
    pub payload: &'a [u8],
}

impl<'a> IcmpEcho<'a> {
    /// Parse the echo fields of a complete ICMP message
    ///
    /// The payload starts right after the identifier and sequence.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        if data.len() < ICMP_ECHO_HEADER_LEN {
            return Err(Error::truncated(
                Layer::Icmp,
                data.len(),
                ICMP_ECHO_HEADER_LEN,
            ));
        }

        Ok(IcmpEcho {
            identifier: BigEndian::read_u16(&data[4..6]),
            sequence: BigEndian::read_u16(&data[6..8]),
            payload: &data[ICMP_ECHO_HEADER_LEN..],
        })
    }

    /// Serialize as a complete message of type `msg_type` with a valid checksum
    pub fn to_message(&self, msg_type: IcmpType) -> Vec<u8> {
        let mut message = vec![0u8; ICMP_ECHO_HEADER_LEN + self.payload.len()];
        message[0] = msg_type.id();
        message[1] = 0;
        BigEndian::write_u16(&mut message[4..6], self.identifier);
        BigEndian::write_u16(&mut message[6..8], self.sequence);
        message[ICMP_ECHO_HEADER_LEN..].copy_from_slice(self.payload);
        let sum = checksum(0, &message);
        BigEndian::write_u16(&mut message[2..4], sum);
        message
    }
}
