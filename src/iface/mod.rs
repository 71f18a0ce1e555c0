//! Network interface abstraction and the responder pipeline
//!
//! This module provides the receive path and the replies it produces:
//! - The `Interface` a responder transmits on, and captured `Packet`s
//! - `Responder`, which owns the reserved-address cache and the Ethernet layer
//! - Per-protocol dissection for ARP, IPv4, ICMPv4, TCP and UDP
//! - A kernel TAP device to capture from

pub mod arp;
pub mod icmp;
pub mod interface;
pub mod ipv4;
pub mod responder;
pub mod tap;
pub mod transport;

// Re-export commonly used items
pub use interface::{Interface, Packet, Timestamp};
pub use ipv4::Ipv4Flow;
pub use responder::Responder;
pub use tap::TapInterface;
