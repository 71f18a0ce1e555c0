//! ARP (Address Resolution Protocol) implementation
//!
//! This module provides parsing and serialization of RFC 826 messages for
//! Ethernet/IPv4, and the resolution cache of addresses the responder
//! impersonates.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Layer, Result, Unsupported};
use crate::network::ethernet::{EtherAddr, EtherType};

/// ARP message length for Ethernet/IPv4 in bytes
pub const ARP_PACKET_LEN: usize = 28;

/// Hardware type for Ethernet
pub const ARP_HTYPE_ETHER: u16 = 1;

const ETHER_ADDR_LEN: u8 = 6;
const IPV4_ADDR_LEN: u8 = 4;

/// ARP operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOperation {
    WhoHas,
    IsAt,
    Other(u16),
}

impl ArpOperation {
    pub const WHO_HAS: u16 = 1;
    pub const IS_AT: u16 = 2;

    pub fn id(self) -> u16 {
        match self {
            ArpOperation::WhoHas => Self::WHO_HAS,
            ArpOperation::IsAt => Self::IS_AT,
            ArpOperation::Other(op) => op,
        }
    }
}

impl From<u16> for ArpOperation {
    fn from(op: u16) -> Self {
        match op {
            Self::WHO_HAS => ArpOperation::WhoHas,
            Self::IS_AT => ArpOperation::IsAt,
            other => ArpOperation::Other(other),
        }
    }
}

/// ARP message for Ethernet hardware and IPv4 protocol addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpPacket {
    pub oper: ArpOperation,
    /// Sender hardware address
    pub sha: EtherAddr,
    /// Sender protocol address
    pub spa: Ipv4Addr,
    /// Target hardware address
    pub tha: EtherAddr,
    /// Target protocol address
    pub tpa: Ipv4Addr,
}

impl ArpPacket {
    /// Parse an ARP message
    ///
    /// Anything but Ethernet/IPv4 with 6-byte and 4-byte addresses is
    /// reported as unsupported.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ARP_PACKET_LEN {
            return Err(Error::truncated(Layer::Arp, data.len(), ARP_PACKET_LEN));
        }

        let htype = BigEndian::read_u16(&data[0..2]);
        let ptype = BigEndian::read_u16(&data[2..4]);
        let hlen = data[4];
        let plen = data[5];
        if htype != ARP_HTYPE_ETHER
            || ptype != EtherType::IPV4
            || hlen != ETHER_ADDR_LEN
            || plen != IPV4_ADDR_LEN
        {
            return Err(Unsupported::ArpFormat {
                htype,
                ptype,
                hlen,
                plen,
            }
            .into());
        }

        let mut sha = [0u8; 6];
        let mut tha = [0u8; 6];
        sha.copy_from_slice(&data[8..14]);
        tha.copy_from_slice(&data[18..24]);

        Ok(ArpPacket {
            oper: ArpOperation::from(BigEndian::read_u16(&data[6..8])),
            sha: EtherAddr(sha),
            spa: Ipv4Addr::new(data[14], data[15], data[16], data[17]),
            tha: EtherAddr(tha),
            tpa: Ipv4Addr::new(data[24], data[25], data[26], data[27]),
        })
    }

    /// Convert ARP message to bytes
    pub fn to_bytes(&self) -> [u8; ARP_PACKET_LEN] {
        let mut bytes = [0u8; ARP_PACKET_LEN];
        BigEndian::write_u16(&mut bytes[0..2], ARP_HTYPE_ETHER);
        BigEndian::write_u16(&mut bytes[2..4], EtherType::IPV4);
        bytes[4] = ETHER_ADDR_LEN;
        bytes[5] = IPV4_ADDR_LEN;
        BigEndian::write_u16(&mut bytes[6..8], self.oper.id());
        bytes[8..14].copy_from_slice(&self.sha.0);
        bytes[14..18].copy_from_slice(&self.spa.octets());
        bytes[18..24].copy_from_slice(&self.tha.0);
        bytes[24..28].copy_from_slice(&self.tpa.octets());
        bytes
    }

    /// Build the is-at answer to this who-has query, claiming `claimed` for the queried address
    pub fn is_at(&self, claimed: EtherAddr) -> Self {
        ArpPacket {
            oper: ArpOperation::IsAt,
            sha: claimed,
            spa: self.tpa,
            tha: self.sha,
            tpa: self.spa,
        }
    }
}

/// Addresses this responder impersonates
///
/// This is not a learning cache: entries are only added by configuration and
/// are never created or changed by received traffic.
#[derive(Debug, Clone, Default)]
pub struct ArpCache {
    entries: HashMap<u32, EtherAddr>,
}

impl ArpCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `addr` as `ether`; reserving an address again replaces the previous claim
    pub fn reserve(&mut self, addr: Ipv4Addr, ether: EtherAddr) {
        self.entries.insert(u32::from(addr), ether);
    }

    /// Look up the link address claimed for `addr`
    pub fn find(&self, addr: Ipv4Addr) -> Option<EtherAddr> {
        self.entries.get(&u32::from(addr)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
