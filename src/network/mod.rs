//! Link and network layer wire formats
//!
//! This module contains the on-wire encodings the responder parses and builds:
//! - Ethernet II frames and the frame check sequence
//! - ARP for Ethernet/IPv4, plus the reserved-address resolution cache
//! - IPv4 headers
//! - ICMPv4 headers
//!
//! Every header is decoded from and encoded to a byte slice with explicit
//! bounds checks; nothing is read by reinterpreting memory.

pub mod arp;
pub mod ethernet;
pub mod icmp;
pub mod ipv4;

// Re-export commonly used items
pub use arp::{ArpCache, ArpOperation, ArpPacket};
pub use ethernet::{ether_crc32, EtherAddr, EtherType, EthernetHeader};
pub use icmp::{IcmpEcho, IcmpHeader, IcmpType};
pub use ipv4::{IpProtocol, Ipv4Header};

/// Accumulate the ones'-complement sum of `data` onto `initial`
///
/// Data is summed in 16-bit big-endian words; an odd trailing byte is padded
/// with a zero low byte. The result is folded to 16 bits but not complemented,
/// so it can be fed back in as `initial` for the next region.
pub fn sum_words(initial: u32, data: &[u8]) -> u32 {
    let mut sum = u64::from(initial);

    // Process data in 2-byte chunks
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u64::from(u16::from_be_bytes([chunk[0], chunk[1]]));
    }

    // Handle odd-length data by padding with zero
    if let [last_byte] = chunks.remainder() {
        sum += u64::from(*last_byte) << 8;
    }

    // Add carry bits
    while (sum >> 16) > 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    sum as u32
}

/// Calculate the Internet checksum of `data`, continuing from `initial`
///
/// Returns the ones' complement of the folded sum. Over a block that already
/// carries a correct checksum field the result is zero, which is how every
/// layer validates what it receives. To fill in a checksum, compute it with
/// the field zeroed and store the result.
pub fn checksum(initial: u32, data: &[u8]) -> u16 {
    !(sum_words(initial, data) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_valid_header_sums_to_zero() {
        let bytes = hex!("45 00 0f fc 38 c0 00 00 40 01 1e 3f 0a 00 00 02 0a 00 00 01");
        assert_eq!(checksum(0, &bytes), 0);
    }

    #[test]
    fn test_checksum_fills_zeroed_field() {
        let mut bytes = hex!("45 00 0f fc 38 c0 00 00 40 01 00 00 0a 00 00 02 0a 00 00 01");
        let sum = checksum(0, &bytes);
        assert_eq!(sum, 0x1e3f);
        bytes[10..12].copy_from_slice(&sum.to_be_bytes());
        assert_eq!(checksum(0, &bytes), 0);
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let bytes = hex!("45 00 0f fc 38 c0 00 00 40 01 1e 3f 0a 00 00 02 0a 00 00 01");
        for byte in 0..bytes.len() {
            for bit in 0..8 {
                let mut corrupt = bytes;
                corrupt[byte] ^= 1 << bit;
                assert_ne!(checksum(0, &corrupt), 0, "byte {} bit {}", byte, bit);
            }
        }
    }

    #[test]
    fn test_empty_and_odd_length() {
        assert_eq!(sum_words(0, &[]), 0);
        assert_eq!(checksum(0, &[]), 0xffff);
        assert_eq!(sum_words(0, &[0xab]), 0xab00);
        assert_eq!(sum_words(0, &[0x12, 0x34, 0x56]), 0x1234 + 0x5600);
    }

    #[test]
    fn test_accumulates_across_regions() {
        let data = hex!("00 01 f2 03 f4 f5 f6 f7");
        let whole = checksum(0, &data);
        let partial = sum_words(0, &data[..4]);
        assert_eq!(checksum(partial, &data[4..]), whole);
        assert_eq!(whole, !0xddf2);
    }

    #[test]
    fn test_carries_fold() {
        assert_eq!(sum_words(0, &[0xff, 0xff, 0x00, 0x02]), 0x0002);
        assert_eq!(sum_words(0xffff, &[0x00, 0x01]), 0x0001);
    }
}
