//! Command line configuration

use std::net::Ipv4Addr;

use clap::Parser;

use crate::iface::{Interface, Responder};
use crate::network::EtherAddr;

/// Answer ARP and ICMP echo on behalf of addresses nobody else owns
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "flycatcher", version, about, long_about = None)]
pub struct Config {
    /// TAP device to capture from
    #[arg(short = 'i', long, default_value = "tap0")]
    pub iface: String,

    /// Link address claimed for every reserved address
    #[arg(short = 'e', long, default_value_t = EtherAddr::FLYCATCHER)]
    pub ether: EtherAddr,

    /// IPv4 address to impersonate (repeatable)
    #[arg(short = 'r', long = "reserve", value_name = "ADDR")]
    pub reserved: Vec<Ipv4Addr>,

    /// Append a frame check sequence to transmitted frames
    #[arg(long)]
    pub fcs: bool,

    /// Trace every frame, not just notices
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Config {
    /// Build a responder on `iface` with every configured address reserved
    pub fn responder<I: Interface>(&self, iface: I) -> Responder<I> {
        let mut responder = Responder::new(iface).with_fcs(self.fcs);
        for addr in &self.reserved {
            responder.reserve(*addr, self.ether);
        }
        responder
    }
}
