use tracing::debug;

use crate::error::{Result, Unsupported};
use crate::iface::interface::{Interface, Packet};
use crate::iface::responder::{dropped, Responder};
use crate::network::{ArpOperation, ArpPacket, EtherType};

impl<I: Interface> Responder<I> {
    /// Dissect an ARP message and answer who-has queries for reserved addresses
    ///
    /// Queries for anything else are ignored, and is-at messages are only
    /// logged: nothing received ever changes the cache.
    pub fn analyze_arp(&self, packet: &Packet, data: &[u8]) -> Result<()> {
        let arp = ArpPacket::from_bytes(data).map_err(|e| dropped(packet.ts, e))?;

        match arp.oper {
            ArpOperation::WhoHas => {
                debug!("\twho-has {} tell {} ({})", arp.tpa, arp.spa, arp.sha);
                let claimed = match self.find(arp.tpa) {
                    Some(claimed) => claimed,
                    None => return Ok(()),
                };
                let reply = arp.is_at(claimed);
                debug!("\t{} is-at {}", reply.spa, reply.sha);
                self.send_ethernet(EtherType::Arp, arp.sha, &reply.to_bytes())?;
                Ok(())
            }
            ArpOperation::IsAt => {
                debug!("\t{} is-at {} (to {})", arp.spa, arp.sha, arp.tpa);
                Ok(())
            }
            ArpOperation::Other(op) => Err(dropped(
                packet.ts,
                Unsupported::ArpOperation(op).into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Layer};
    use crate::iface::interface::Timestamp;
    use crate::iface::responder::tests::Recorder;
    use crate::network::{EtherAddr, EthernetHeader};
    use hex_literal::hex;
    use std::net::Ipv4Addr;

    // who-has 10.0.0.99 tell 10.0.0.2 (52:54:00:12:34:56)
    const WHO_HAS: [u8; 28] = hex!(
        "00 01 08 00 06 04 00 01 52 54 00 12 34 56 0a 00 00 02
         00 00 00 00 00 00 0a 00 00 63"
    );
    const QUERIER: EtherAddr = EtherAddr([0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
    const CLAIMED: EtherAddr = EtherAddr([0x02, 0x00, 0x18, 0x11, 0x09, 0x02]);

    fn responder() -> Responder<Recorder> {
        let mut responder = Responder::new(Recorder::new());
        responder.reserve(Ipv4Addr::new(10, 0, 0, 99), CLAIMED);
        responder
    }

    fn analyze(responder: &Responder<Recorder>, data: &[u8]) -> Result<()> {
        responder.analyze_arp(&Packet::new(data, Timestamp::default()), data)
    }

    #[test]
    fn test_who_has_reserved() {
        let responder = responder();
        analyze(&responder, &WHO_HAS).unwrap();

        let sent = responder.iface().sent.borrow();
        assert_eq!(sent.len(), 1);
        let eh = EthernetHeader::from_bytes(&sent[0]).unwrap();
        assert_eq!(eh.dst, QUERIER);
        assert_eq!(eh.src, responder.iface().ether);
        assert_eq!(eh.ethertype, EtherType::Arp);

        let reply = ArpPacket::from_bytes(&sent[0][14..]).unwrap();
        assert_eq!(reply.oper, ArpOperation::IsAt);
        assert_eq!(reply.sha, CLAIMED);
        assert_eq!(reply.spa, Ipv4Addr::new(10, 0, 0, 99));
        assert_eq!(reply.tha, QUERIER);
        assert_eq!(reply.tpa, Ipv4Addr::new(10, 0, 0, 2));
    }

    #[test]
    fn test_who_has_unreserved() {
        let responder = Responder::new(Recorder::new());
        analyze(&responder, &WHO_HAS).unwrap();
        assert!(responder.iface().sent.borrow().is_empty());
    }

    #[test]
    fn test_is_at_is_not_learned() {
        let responder = responder();
        let mut is_at = WHO_HAS;
        is_at[7] = 2;
        analyze(&responder, &is_at).unwrap();
        assert!(responder.iface().sent.borrow().is_empty());
        assert_eq!(responder.find(Ipv4Addr::new(10, 0, 0, 2)), None);
        assert_eq!(responder.cache().len(), 1);
    }

    #[test]
    fn test_unknown_operation() {
        let responder = responder();
        let mut rarp = WHO_HAS;
        rarp[7] = 3;
        assert!(matches!(
            analyze(&responder, &rarp),
            Err(Error::Unsupported(Unsupported::ArpOperation(3)))
        ));
        assert!(responder.iface().sent.borrow().is_empty());
    }

    #[test]
    fn test_truncated() {
        let responder = responder();
        assert!(matches!(
            analyze(&responder, &WHO_HAS[..20]),
            Err(Error::Truncated { layer: Layer::Arp, .. })
        ));
    }

    #[test]
    fn test_transmit_failure_propagates() {
        let mut responder = Responder::new(Recorder::failing());
        responder.reserve(Ipv4Addr::new(10, 0, 0, 99), CLAIMED);
        assert!(matches!(analyze(&responder, &WHO_HAS), Err(Error::Io(_))));
    }
}
