//! A passive Ethernet responder
//!
//! Flycatcher listens on a link and impersonates a set of reserved IPv4
//! addresses nobody else owns:
//! - ARP who-has queries for a reserved address are answered with is-at
//! - ICMP echo requests to a reserved address are answered with echo replies
//! - Everything else is dissected, checksummed and logged, then dropped
//!
//! Frames flow through `Responder::input`, one layer at a time, and replies
//! leave through the responder's `Interface`.

pub mod config;
pub mod error;
pub mod iface;
pub mod network;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Layer, Result, Unsupported};
pub use iface::{Interface, Ipv4Flow, Packet, Responder, TapInterface, Timestamp};
pub use network::{ArpCache, EtherAddr, EtherType, IpProtocol};
