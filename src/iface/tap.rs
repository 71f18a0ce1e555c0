//! Kernel TAP device as a responder interface
//!
//! The device is opened in TAP mode without the packet information prefix, so
//! every read yields exactly one Ethernet frame and every write sends one.

use std::io;

use tracing::info;
use tun_tap::{Iface, Mode};

use crate::iface::interface::{Interface, Packet};
use crate::iface::responder::Responder;
use crate::network::EtherAddr;

/// Largest frame read from the device: 1500 bytes of payload, an Ethernet
/// header, one VLAN tag and the frame check sequence
pub const MAX_FRAME_LEN: usize = 1522;

pub struct TapInterface {
    iface: Iface,
    ether: EtherAddr,
}

impl TapInterface {
    /// Open (or create) the TAP device `name`, sending frames from `ether`
    ///
    /// Needs `CAP_NET_ADMIN`. The device is not brought up.
    pub fn new(name: &str, ether: EtherAddr) -> io::Result<Self> {
        let iface = Iface::without_packet_info(name, Mode::Tap)?;
        info!("opened {} as {}", iface.name(), ether);
        Ok(TapInterface { iface, ether })
    }

    /// Name the kernel gave the device
    pub fn name(&self) -> &str {
        self.iface.name()
    }

    /// Block until a frame arrives and copy it into `buf`
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.iface.recv(buf)
    }
}

impl Interface for TapInterface {
    fn ether_addr(&self) -> EtherAddr {
        self.ether
    }

    fn transmit(&self, frame: &[u8]) -> io::Result<()> {
        self.iface.send(frame).map(|_| ())
    }
}

impl Responder<TapInterface> {
    /// Capture frames from the device and process them until a read fails
    pub fn run(&self) -> io::Result<()> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        info!("listening on {}", self.iface().name());
        loop {
            let nbytes = match self.iface().recv(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let packet = Packet::now(&buf[..nbytes]);
            if packet.is_empty() {
                continue;
            }
            self.input(&packet);
        }
    }
}
