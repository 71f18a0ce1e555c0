use std::io;

use tracing::debug;

use crate::error::{Result, Unsupported};
use crate::iface::interface::Interface;
use crate::iface::ipv4::Ipv4Flow;
use crate::iface::responder::{dropped, Responder};
use crate::network::icmp::IcmpEcho;
use crate::network::{IcmpHeader, IcmpType, IpProtocol};

impl<I: Interface> Responder<I> {
    /// Dissect an ICMP message and answer echo requests to reserved addresses
    ///
    /// The checksum covers the whole message and is checked before anything
    /// else is looked at. Every type but echo request is logged and dropped.
    pub fn analyze_icmp4(&self, flow: &Ipv4Flow, data: &[u8]) -> Result<()> {
        let ts = flow.packet.ts;
        let header = IcmpHeader::from_bytes(data).map_err(|e| dropped(ts, e))?;
        IcmpHeader::validate_checksum(data).map_err(|e| dropped(ts, e))?;

        match header.msg_type {
            IcmpType::EchoRequest => {
                let echo = IcmpEcho::from_bytes(data).map_err(|e| dropped(ts, e))?;
                debug!(
                    "\techo request id 0x{:04x} seq 0x{:04x}",
                    echo.identifier, echo.sequence
                );
                if self.find(flow.dst).is_none() {
                    debug!("\t{} is not reserved", flow.dst);
                    return Ok(());
                }
                self.icmp_reply(flow, echo.identifier, echo.sequence, echo.payload)?;
                Ok(())
            }
            other => {
                debug!("\t{} code {}", other, header.msg_code);
                Err(dropped(ts, Unsupported::IcmpType(other.id()).into()))
            }
        }
    }

    /// Answer an echo request with the same identifier, sequence and payload
    pub fn icmp_reply(&self, flow: &Ipv4Flow, id: u16, seq: u16, payload: &[u8]) -> io::Result<()> {
        let echo = IcmpEcho {
            identifier: id,
            sequence: seq,
            payload,
        };
        let message = echo.to_message(IcmpType::EchoReply);
        self.ipv4_reply(flow, IpProtocol::Icmp, &message)
    }
}
