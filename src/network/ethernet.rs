//! Ethernet II implementation
//!
//! This module provides link-layer addresses, the ethertype tag, Ethernet
//! header parsing and serialization, and the IEEE 802.3 frame check sequence.

use std::fmt;
use std::io;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

use crate::error::{Error, Layer, Result};

/// Ethernet header length in bytes (destination, source, ethertype)
pub const ETHER_HEADER_LEN: usize = 14;

/// Frame check sequence length in bytes
pub const ETHER_FCS_LEN: usize = 4;

/// Minimum frame length on the wire, excluding the FCS
pub const ETHER_MIN_LEN: usize = 60;

/// A 6-byte link-layer address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EtherAddr(pub [u8; 6]);

impl EtherAddr {
    pub const BROADCAST: Self = Self([0xff; 6]);

    /// Locally administered address claimed by default for reserved hosts
    pub const FLYCATCHER: Self = Self([0x02, 0x00, 0x18, 0x11, 0x09, 0x02]);
}

impl fmt::Display for EtherAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl fmt::Debug for EtherAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<[u8; 6]> for EtherAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

/// Error returned when a string is not a link-layer address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid Ethernet address {0:?}")]
pub struct ParseEtherAddrError(String);

impl FromStr for EtherAddr {
    type Err = ParseEtherAddrError;

    /// Parse six hex octets separated by `:` or `-`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseEtherAddrError(s.to_string());
        let mut octets = [0u8; 6];
        let mut parts = s.split(|c| c == ':' || c == '-');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || part.len() > 2 {
                return Err(err());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self(octets))
    }
}

/// Payload protocol carried by an Ethernet frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    Ipv4,
    Arp,
    Vlan,
    Ipv6,
    Other(u16),
}

impl EtherType {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86dd;

    pub fn id(self) -> u16 {
        match self {
            EtherType::Ipv4 => Self::IPV4,
            EtherType::Arp => Self::ARP,
            EtherType::Vlan => Self::VLAN,
            EtherType::Ipv6 => Self::IPV6,
            EtherType::Other(id) => id,
        }
    }
}

impl From<u16> for EtherType {
    fn from(id: u16) -> Self {
        match id {
            Self::IPV4 => EtherType::Ipv4,
            Self::ARP => EtherType::Arp,
            Self::VLAN => EtherType::Vlan,
            Self::IPV6 => EtherType::Ipv6,
            other => EtherType::Other(other),
        }
    }
}

/// Ethernet II header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: EtherAddr,
    pub src: EtherAddr,
    pub ethertype: EtherType,
}

impl EthernetHeader {
    /// Parse an Ethernet header from the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ETHER_HEADER_LEN {
            return Err(Error::truncated(Layer::Ethernet, data.len(), ETHER_HEADER_LEN));
        }

        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&data[0..6]);
        src.copy_from_slice(&data[6..12]);

        Ok(EthernetHeader {
            dst: EtherAddr(dst),
            src: EtherAddr(src),
            ethertype: EtherType::from(BigEndian::read_u16(&data[12..14])),
        })
    }

    /// Convert Ethernet header to bytes
    pub fn to_bytes(&self) -> [u8; ETHER_HEADER_LEN] {
        let mut bytes = [0u8; ETHER_HEADER_LEN];
        bytes[0..6].copy_from_slice(&self.dst.0);
        bytes[6..12].copy_from_slice(&self.src.0);
        BigEndian::write_u16(&mut bytes[12..14], self.ethertype.id());
        bytes
    }

    /// Build a complete frame carrying `payload`, optionally followed by its FCS
    ///
    /// With an FCS the frame is first zero-padded to `ETHER_MIN_LEN`, since
    /// the checksum must cover the padding. Without one, padding is left to
    /// the device. Failing to allocate the frame is reported as
    /// `ErrorKind::OutOfMemory`.
    pub fn create_frame(&self, payload: &[u8], fcs: bool) -> io::Result<Vec<u8>> {
        let len = ETHER_HEADER_LEN + payload.len();
        let capacity = if fcs {
            len.max(ETHER_MIN_LEN) + ETHER_FCS_LEN
        } else {
            len
        };
        let mut frame = Vec::new();
        frame
            .try_reserve_exact(capacity)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        frame.extend_from_slice(&self.to_bytes());
        frame.extend_from_slice(payload);
        if fcs {
            frame.resize(len.max(ETHER_MIN_LEN), 0);
            let crc = ether_crc32(&frame);
            frame.extend_from_slice(&crc.to_le_bytes());
        }
        Ok(frame)
    }
}

const CRC32_TABLE: [u32; 256] = crc32_table();

const fn crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xedb8_8320
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the IEEE 802.3 CRC-32 of a frame
///
/// The FCS is transmitted least significant byte first, so append
/// `ether_crc32(frame).to_le_bytes()`.
pub fn ether_crc32(data: &[u8]) -> u32 {
    let mut crc = 0xffff_ffffu32;
    for &byte in data {
        crc = CRC32_TABLE[((crc ^ u32::from(byte)) & 0xff) as usize] ^ (crc >> 8);
    }
    !crc
}
