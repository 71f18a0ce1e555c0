//! The per-interface responder and its Ethernet layer
//!
//! `Responder` is the context every dissection runs in. It owns the interface
//! replies go out on, the table of reserved addresses, and the IPv4
//! identification counter. There is no process-wide state, so one responder
//! can be built per interface.
//!
//! Frames are handled one at a time and to completion, including any reply,
//! before the next one is accepted, so the responder is `!Sync`.

use std::cell::Cell;
use std::io;
use std::net::Ipv4Addr;

use tracing::{debug, info, warn};

use crate::error::{Error, Result, Unsupported};
use crate::iface::interface::{Interface, Packet, Timestamp};
use crate::network::ethernet::ETHER_HEADER_LEN;
use crate::network::{ArpCache, EtherAddr, EtherType, EthernetHeader};

/// Answers ARP and ICMP echo on behalf of reserved addresses
pub struct Responder<I> {
    iface: I,
    cache: ArpCache,
    next_id: Cell<u16>,
    fcs: bool,
}

impl<I: Interface> Responder<I> {
    /// Create a responder with no reserved addresses
    pub fn new(iface: I) -> Self {
        Responder {
            iface,
            cache: ArpCache::new(),
            next_id: Cell::new(1),
            fcs: false,
        }
    }

    /// Append a frame check sequence to every transmitted frame
    pub fn with_fcs(mut self, fcs: bool) -> Self {
        self.fcs = fcs;
        self
    }

    pub fn iface(&self) -> &I {
        &self.iface
    }

    pub fn cache(&self) -> &ArpCache {
        &self.cache
    }

    /// Impersonate `addr`, answering for it as `ether`
    ///
    /// Meant to be called before capture starts. Reserving an address again
    /// replaces the link address claimed for it.
    pub fn reserve(&mut self, addr: Ipv4Addr, ether: EtherAddr) {
        info!("reserving {} as {}", addr, ether);
        self.cache.reserve(addr, ether);
    }

    /// Link address claimed for `addr`, if it is reserved
    pub fn find(&self, addr: Ipv4Addr) -> Option<EtherAddr> {
        self.cache.find(addr)
    }

    /// Identification for the next originated datagram
    pub(crate) fn next_id(&self) -> u16 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    /// Process one received frame
    ///
    /// This is the top of the pipeline: errors about the frame itself have
    /// already been logged by the layer that found them and are dropped here.
    /// Transmit failures are logged and dropped as well.
    pub fn input(&self, packet: &Packet) {
        match self.analyze_ethernet(packet, packet.data) {
            Err(e) if !e.is_dissection() => {
                warn!("{} failed to send reply: {}", packet.ts, e)
            }
            _ => {}
        }
    }

    /// Dissect an Ethernet frame and hand its payload to the next layer
    pub fn analyze_ethernet(&self, packet: &Packet, data: &[u8]) -> Result<()> {
        let eh = EthernetHeader::from_bytes(data).map_err(|e| dropped(packet.ts, e))?;
        debug!(
            "{} recv type {:04x} packet from {} to {} ({} bytes)",
            packet.ts,
            eh.ethertype.id(),
            eh.src,
            eh.dst,
            packet.len()
        );

        let payload = &data[ETHER_HEADER_LEN..];
        match eh.ethertype {
            EtherType::Arp => self.analyze_arp(packet, payload),
            EtherType::Ipv4 => self.analyze_ipv4(packet, &eh, payload),
            EtherType::Vlan | EtherType::Ipv6 | EtherType::Other(_) => Err(dropped(
                packet.ts,
                Unsupported::EtherType(eh.ethertype.id()).into(),
            )),
        }
    }

    /// Frame `payload` and transmit it to `dst` from this interface's address
    pub fn send_ethernet(
        &self,
        ethertype: EtherType,
        dst: EtherAddr,
        payload: &[u8],
    ) -> io::Result<()> {
        let eh = EthernetHeader {
            dst,
            src: self.iface.ether_addr(),
            ethertype,
        };
        let frame = eh.create_frame(payload, self.fcs)?;
        debug!(
            "{} send type {:04x} packet from {} to {}",
            Timestamp::now(),
            ethertype.id(),
            eh.src,
            eh.dst
        );
        self.iface.transmit(&frame)
    }
}

/// Log a dissection error at the layer that found it and pass it on
///
/// Malformed input is worth a notice; well-formed traffic we simply do not
/// handle is only traced.
pub(crate) fn dropped(ts: Timestamp, err: Error) -> Error {
    match &err {
        Error::Unsupported(_) => debug!("{} {}", ts, err),
        _ => info!("{} {}", ts, err),
    }
    err
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Layer;
    use std::cell::RefCell;

    /// Records every transmitted frame
    pub(crate) struct Recorder {
        pub ether: EtherAddr,
        pub sent: RefCell<Vec<Vec<u8>>>,
        pub fail: bool,
    }

    impl Recorder {
        pub fn new() -> Self {
            Recorder {
                ether: EtherAddr([0x02, 0, 0, 0, 0, 0xfe]),
                sent: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Recorder {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl Interface for Recorder {
        fn ether_addr(&self) -> EtherAddr {
            self.ether
        }

        fn transmit(&self, frame: &[u8]) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "link down"));
            }
            self.sent.borrow_mut().push(frame.to_vec());
            Ok(())
        }
    }

    fn analyze(responder: &Responder<Recorder>, frame: &[u8]) -> Result<()> {
        let packet = Packet::new(frame, Timestamp::default());
        responder.analyze_ethernet(&packet, frame)
    }

    #[test]
    fn test_short_frame() {
        let responder = Responder::new(Recorder::new());
        assert!(matches!(
            analyze(&responder, &[0u8; 13]),
            Err(Error::Truncated { layer: Layer::Ethernet, len: 13, min: 14 })
        ));
        assert!(responder.iface().sent.borrow().is_empty());
    }

    #[test]
    fn test_unsupported_ethertype() {
        let responder = Responder::new(Recorder::new());
        let mut frame = [0u8; 60];
        frame[12..14].copy_from_slice(&[0x86, 0xdd]);
        assert!(matches!(
            analyze(&responder, &frame),
            Err(Error::Unsupported(Unsupported::EtherType(0x86dd)))
        ));
    }

    #[test]
    fn test_send_ethernet() {
        let responder = Responder::new(Recorder::new());
        let dst = EtherAddr([0x52, 0x54, 0, 0x12, 0x34, 0x56]);
        responder.send_ethernet(EtherType::Ipv4, dst, b"abc").unwrap();

        let sent = responder.iface().sent.borrow();
        assert_eq!(sent.len(), 1);
        let eh = EthernetHeader::from_bytes(&sent[0]).unwrap();
        assert_eq!(eh.dst, dst);
        assert_eq!(eh.src, responder.iface().ether);
        assert_eq!(eh.ethertype, EtherType::Ipv4);
        assert_eq!(&sent[0][14..], b"abc");
    }

    #[test]
    fn test_send_ethernet_with_fcs() {
        let responder = Responder::new(Recorder::new()).with_fcs(true);
        responder
            .send_ethernet(EtherType::Arp, EtherAddr::BROADCAST, b"abc")
            .unwrap();
        let sent = responder.iface().sent.borrow();
        // Padded to the minimum frame size before the FCS.
        assert_eq!(sent[0].len(), 60 + 4);
        assert_eq!(&sent[0][14..17], b"abc");
        assert_eq!(crate::network::ether_crc32(&sent[0]), 0x2144_df1c);
    }

    #[test]
    fn test_send_failure_is_reported() {
        let responder = Responder::new(Recorder::failing());
        let err = responder
            .send_ethernet(EtherType::Ipv4, EtherAddr::BROADCAST, b"abc")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_input_swallows_transmit_failure() {
        let mut responder = Responder::new(Recorder::failing());
        responder.reserve(Ipv4Addr::new(10, 0, 0, 99), EtherAddr::FLYCATCHER);
        let query = crate::network::ArpPacket {
            oper: crate::network::ArpOperation::WhoHas,
            sha: EtherAddr([0x52, 0x54, 0, 0x12, 0x34, 0x56]),
            spa: Ipv4Addr::new(10, 0, 0, 2),
            tha: EtherAddr::default(),
            tpa: Ipv4Addr::new(10, 0, 0, 99),
        };
        let frame = EthernetHeader {
            dst: EtherAddr::BROADCAST,
            src: query.sha,
            ethertype: EtherType::Arp,
        }
        .create_frame(&query.to_bytes(), false)
        .unwrap();
        let packet = Packet::new(&frame, Timestamp::default());

        let err = responder.analyze_ethernet(&packet, &frame).unwrap_err();
        assert!(!err.is_dissection());
        responder.input(&packet);
        assert!(responder.iface().sent.borrow().is_empty());
    }

    #[test]
    fn test_reserve_and_ids() {
        let mut responder = Responder::new(Recorder::new());
        let addr = Ipv4Addr::new(10, 0, 0, 99);
        assert_eq!(responder.find(addr), None);
        responder.reserve(addr, EtherAddr::FLYCATCHER);
        responder.reserve(addr, EtherAddr::FLYCATCHER);
        assert_eq!(responder.find(addr), Some(EtherAddr::FLYCATCHER));
        assert_eq!(responder.cache().len(), 1);

        assert_eq!(responder.next_id(), 1);
        assert_eq!(responder.next_id(), 2);
    }
}
