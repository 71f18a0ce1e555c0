use std::io;
use std::net::Ipv4Addr;

use tracing::debug;

use crate::error::{Result, Unsupported};
use crate::iface::interface::{Interface, Packet};
use crate::iface::responder::{dropped, Responder};
use crate::network::{EtherAddr, EtherType, EthernetHeader, IpProtocol, Ipv4Header};

/// A validated datagram on its way up the stack
///
/// Carries what a reply needs without re-parsing: both addresses and the
/// link address the datagram came from.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Flow<'a> {
    pub packet: &'a Packet<'a>,
    pub ether_src: EtherAddr,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub protocol: IpProtocol,
}

impl<I: Interface> Responder<I> {
    /// Dissect an IPv4 datagram and dispatch its payload by protocol
    ///
    /// Options are skipped. Fragments are logged and not dispatched, since
    /// no reassembly is done.
    pub fn analyze_ipv4(
        &self,
        packet: &Packet,
        eh: &EthernetHeader,
        data: &[u8],
    ) -> Result<()> {
        let header = Ipv4Header::from_bytes(data).map_err(|e| dropped(packet.ts, e))?;
        header
            .validate_checksum(data)
            .map_err(|e| dropped(packet.ts, e))?;

        debug!(
            "\t{} > {} {} ttl {} id 0x{:04x} len {} dscp {} ecn {}",
            header.src_addr,
            header.dst_addr,
            header.protocol,
            header.ttl,
            header.id,
            header.total_len,
            header.dscp(),
            header.ecn()
        );

        if header.more_fragments() || header.fragment_offset() != 0 {
            debug!("\tfragment at offset {}, ignoring", header.fragment_offset() * 8);
            return Ok(());
        }

        let flow = Ipv4Flow {
            packet,
            ether_src: eh.src,
            src: header.src_addr,
            dst: header.dst_addr,
            protocol: header.protocol,
        };

        // Ethernet pads short frames, so stop at the declared total length.
        let start = header.header_len();
        let payload = &data[start..start + header.payload_len()];
        match header.protocol {
            IpProtocol::Icmp => self.analyze_icmp4(&flow, payload),
            IpProtocol::Tcp => self.analyze_tcp(&flow, payload),
            IpProtocol::Udp => self.analyze_udp(&flow, payload),
            IpProtocol::Other(id) => {
                Err(dropped(packet.ts, Unsupported::IpProtocol(id).into()))
            }
        }
    }

    /// Send `payload` back to whoever sent the datagram described by `flow`
    ///
    /// The reply goes from the flow's destination to its source, straight to
    /// the link address the request came from.
    pub fn ipv4_reply(
        &self,
        flow: &Ipv4Flow,
        protocol: IpProtocol,
        payload: &[u8],
    ) -> io::Result<()> {
        let header = Ipv4Header::new_simple(
            protocol,
            flow.dst,
            flow.src,
            self.next_id(),
            payload.len() as u16,
        );
        let datagram = header.create_packet(payload);
        self.send_ethernet(EtherType::Ipv4, flow.ether_src, &datagram)
    }
}
