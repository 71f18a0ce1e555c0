//! TCP (Transmission Control Protocol) header decoding
//!
//! Segments are only observed, never answered, so there is no connection
//! state here.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Layer, Result};

/// Minimum TCP header length in bytes
pub const TCP_HEADER_LEN: usize = 20;

/// TCP packet header structure
///
/// Represents the standard 20-byte TCP header as defined in RFC 793
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq_number: u32,
    pub ack_number: u32,
    pub data_offset_and_flags: u16, // Data offset (4 bits) + Reserved (3 bits) + Flags (9 bits)
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_ptr: u16,
}

impl TcpHeader {
    /// Parse TCP header from byte slice
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < TCP_HEADER_LEN {
            return Err(Error::truncated(Layer::Tcp, data.len(), TCP_HEADER_LEN));
        }

        Ok(TcpHeader {
            src_port: BigEndian::read_u16(&data[0..2]),
            dst_port: BigEndian::read_u16(&data[2..4]),
            seq_number: BigEndian::read_u32(&data[4..8]),
            ack_number: BigEndian::read_u32(&data[8..12]),
            data_offset_and_flags: BigEndian::read_u16(&data[12..14]),
            window_size: BigEndian::read_u16(&data[14..16]),
            checksum: BigEndian::read_u16(&data[16..18]),
            urgent_ptr: BigEndian::read_u16(&data[18..20]),
        })
    }

    /// Check if SYN flag is set
    pub fn is_syn(&self) -> bool {
        (self.data_offset_and_flags & 0x0002) != 0
    }

    /// Check if ACK flag is set
    pub fn is_ack(&self) -> bool {
        (self.data_offset_and_flags & 0x0010) != 0
    }

    /// Check if FIN flag is set
    pub fn is_fin(&self) -> bool {
        (self.data_offset_and_flags & 0x0001) != 0
    }

    /// Check if RST flag is set
    pub fn is_rst(&self) -> bool {
        (self.data_offset_and_flags & 0x0004) != 0
    }

    /// Check if PSH flag is set
    pub fn is_psh(&self) -> bool {
        (self.data_offset_and_flags & 0x0008) != 0
    }

    /// Check if URG flag is set
    pub fn is_urg(&self) -> bool {
        (self.data_offset_and_flags & 0x0020) != 0
    }

    /// Get the data offset (header length) in bytes
    pub fn data_offset(&self) -> usize {
        ((self.data_offset_and_flags >> 12) as usize) * 4
    }

    /// Flags in tcpdump notation, e.g. `S.` for SYN+ACK
    pub fn flags(&self) -> Flags {
        Flags(*self)
    }
}

/// Display adapter for TCP flags
pub struct Flags(TcpHeader);

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.0;
        let marks = [
            (h.is_syn(), 'S'),
            (h.is_fin(), 'F'),
            (h.is_rst(), 'R'),
            (h.is_psh(), 'P'),
            (h.is_urg(), 'U'),
            (h.is_ack(), '.'),
        ];
        let mut any = false;
        for (set, mark) in marks {
            if set {
                write!(f, "{}", mark)?;
                any = true;
            }
        }
        if !any {
            f.write_str("none")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_parse_syn_ack() {
        let segment = hex!("00 50 80 ea 00 00 00 00 95 9d 2e c7 50 12 ff ff 55 cc 00 00");
        let header = TcpHeader::from_bytes(&segment).unwrap();
        assert_eq!(header.src_port, 80);
        assert_eq!(header.dst_port, 33002);
        assert_eq!(header.ack_number, 0x959d2ec7);
        assert_eq!(header.data_offset(), 20);
        assert!(header.is_syn());
        assert!(header.is_ack());
        assert!(!header.is_fin());
        assert_eq!(header.flags().to_string(), "S.");
    }

    #[test]
    fn test_short_segment() {
        assert!(matches!(
            TcpHeader::from_bytes(&[0u8; 19]),
            Err(Error::Truncated { layer: Layer::Tcp, len: 19, min: 20 })
        ));
    }
}
