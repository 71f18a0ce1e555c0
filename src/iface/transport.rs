use tracing::debug;

use crate::error::{Error, Layer, Result};
use crate::iface::interface::Interface;
use crate::iface::ipv4::Ipv4Flow;
use crate::iface::responder::{dropped, Responder};
use crate::transport::tcp::TCP_HEADER_LEN;
use crate::transport::{pseudo_header_checksum, TcpHeader, UdpHeader};

impl<I: Interface> Responder<I> {
    /// Log a TCP segment after checking its header and checksum
    ///
    /// Segments are never answered, not even with a reset.
    pub fn analyze_tcp(&self, flow: &Ipv4Flow, data: &[u8]) -> Result<()> {
        let ts = flow.packet.ts;
        let header = TcpHeader::from_bytes(data).map_err(|e| dropped(ts, e))?;
        let offset = header.data_offset();
        if offset < TCP_HEADER_LEN {
            return Err(dropped(ts, Error::truncated(Layer::Tcp, offset, TCP_HEADER_LEN)));
        }
        if offset > data.len() {
            return Err(dropped(ts, Error::truncated(Layer::Tcp, data.len(), offset)));
        }
        verify(flow, Layer::Tcp, data).map_err(|e| dropped(ts, e))?;

        debug!(
            "\ttcp {} > {} [{}] seq {} ack {} win {} len {}",
            header.src_port,
            header.dst_port,
            header.flags(),
            header.seq_number,
            header.ack_number,
            header.window_size,
            data.len() - offset
        );
        Ok(())
    }

    /// Log a UDP datagram after checking its header and checksum
    ///
    /// Trailing bytes past the declared length are ignored, and a zero
    /// checksum is accepted as "not computed".
    pub fn analyze_udp(&self, flow: &Ipv4Flow, data: &[u8]) -> Result<()> {
        let ts = flow.packet.ts;
        let header = UdpHeader::from_bytes(data).map_err(|e| dropped(ts, e))?;
        let datagram = &data[..header.length as usize];
        if header.has_checksum() {
            verify(flow, Layer::Udp, datagram).map_err(|e| dropped(ts, e))?;
        }

        debug!(
            "\tudp {} > {} len {}",
            header.src_port,
            header.dst_port,
            datagram.len() - crate::transport::udp::UDP_HEADER_LEN
        );
        Ok(())
    }
}

fn verify(flow: &Ipv4Flow, layer: Layer, segment: &[u8]) -> Result<()> {
    match pseudo_header_checksum(flow.src, flow.dst, flow.protocol, segment) {
        0 => Ok(()),
        sum => Err(Error::ChecksumMismatch { layer, sum }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iface::interface::{Packet, Timestamp};
    use crate::iface::responder::tests::Recorder;
    use crate::network::{EtherAddr, IpProtocol};
    use hex_literal::hex;
    use std::net::Ipv4Addr;

    // 10.0.0.1:80 > 10.0.0.103:33002 SYN+ACK
    const SYN_ACK: [u8; 20] =
        hex!("00 50 80 ea 00 00 00 00 95 9d 2e c7 50 12 ff ff 55 cc 00 00");
    // 192.168.1.1:53 > 192.168.1.2:50000, four bytes of payload
    const DATAGRAM: [u8; 12] = hex!("00 35 c3 50 00 0c 1e 2d ab cd ef 01");

    fn flow<'a>(
        packet: &'a Packet<'a>,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        protocol: IpProtocol,
    ) -> Ipv4Flow<'a> {
        Ipv4Flow {
            packet,
            ether_src: EtherAddr::BROADCAST,
            src,
            dst,
            protocol,
        }
    }

    fn analyze_tcp(data: &[u8]) -> Result<()> {
        let responder = Responder::new(Recorder::new());
        let packet = Packet::new(data, Timestamp::default());
        let flow = flow(
            &packet,
            Ipv4Addr::new(10, 0, 0, 103),
            Ipv4Addr::new(10, 0, 0, 1),
            IpProtocol::Tcp,
        );
        let result = responder.analyze_tcp(&flow, data);
        assert!(responder.iface().sent.borrow().is_empty());
        result
    }

    fn analyze_udp(data: &[u8]) -> Result<()> {
        let responder = Responder::new(Recorder::new());
        let packet = Packet::new(data, Timestamp::default());
        let flow = flow(
            &packet,
            Ipv4Addr::new(192, 168, 1, 1),
            Ipv4Addr::new(192, 168, 1, 2),
            IpProtocol::Udp,
        );
        let result = responder.analyze_udp(&flow, data);
        assert!(responder.iface().sent.borrow().is_empty());
        result
    }

    #[test]
    fn test_tcp_observed() {
        assert!(analyze_tcp(&SYN_ACK).is_ok());
    }

    #[test]
    fn test_tcp_bad_checksum() {
        let mut segment = SYN_ACK;
        segment[15] ^= 0x01;
        assert!(matches!(
            analyze_tcp(&segment),
            Err(Error::ChecksumMismatch { layer: Layer::Tcp, .. })
        ));
    }

    #[test]
    fn test_tcp_bad_offset() {
        let mut segment = SYN_ACK;
        segment[12] = 0x40;
        assert!(matches!(
            analyze_tcp(&segment),
            Err(Error::Truncated { layer: Layer::Tcp, len: 16, min: 20 })
        ));
        segment[12] = 0x60;
        assert!(matches!(
            analyze_tcp(&segment),
            Err(Error::Truncated { layer: Layer::Tcp, len: 20, min: 24 })
        ));
    }

    #[test]
    fn test_udp_observed() {
        assert!(analyze_udp(&DATAGRAM).is_ok());
    }

    #[test]
    fn test_udp_padding_ignored() {
        let mut padded = DATAGRAM.to_vec();
        padded.extend_from_slice(&[0xff; 6]);
        assert!(analyze_udp(&padded).is_ok());
    }

    #[test]
    fn test_udp_without_checksum() {
        let mut datagram = DATAGRAM;
        datagram[6..8].copy_from_slice(&[0, 0]);
        datagram[8] = 0;
        assert!(analyze_udp(&datagram).is_ok());
    }

    #[test]
    fn test_udp_bad_checksum() {
        let mut datagram = DATAGRAM;
        datagram[11] ^= 0x10;
        assert!(matches!(
            analyze_udp(&datagram),
            Err(Error::ChecksumMismatch { layer: Layer::Udp, .. })
        ));
    }
}
