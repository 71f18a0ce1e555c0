//! UDP (User Datagram Protocol) header decoding

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Layer, Result};

/// UDP header length in bytes
pub const UDP_HEADER_LEN: usize = 8;

/// UDP packet header structure
///
/// Represents the standard 8-byte UDP header as defined in RFC 768
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16, // Length of UDP header and data
    pub checksum: u16,
}

impl UdpHeader {
    /// Parse UDP header from byte slice
    ///
    /// The declared length must cover the header and fit in `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < UDP_HEADER_LEN {
            return Err(Error::truncated(Layer::Udp, data.len(), UDP_HEADER_LEN));
        }

        let header = UdpHeader {
            src_port: BigEndian::read_u16(&data[0..2]),
            dst_port: BigEndian::read_u16(&data[2..4]),
            length: BigEndian::read_u16(&data[4..6]),
            checksum: BigEndian::read_u16(&data[6..8]),
        };

        let length = header.length as usize;
        if length < UDP_HEADER_LEN {
            return Err(Error::truncated(Layer::Udp, length, UDP_HEADER_LEN));
        }
        if length > data.len() {
            return Err(Error::truncated(Layer::Udp, data.len(), length));
        }

        Ok(header)
    }

    /// A zero checksum means the sender did not compute one
    pub fn has_checksum(&self) -> bool {
        self.checksum != 0
    }
}
