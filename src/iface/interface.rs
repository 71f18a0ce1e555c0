//! Network interface abstraction and captured packets
//!
//! The pipeline never touches a device directly. It is handed frames wrapped
//! in a `Packet`, and it sends through whatever implements `Interface`.

use std::fmt;
use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::network::EtherAddr;

/// A link the responder receives frames from and transmits replies on
pub trait Interface {
    /// Link-layer address used as the source of every transmitted frame
    fn ether_addr(&self) -> EtherAddr;

    /// Put a complete frame on the wire
    fn transmit(&self, frame: &[u8]) -> io::Result<()>;
}

impl<T: Interface + ?Sized> Interface for &T {
    fn ether_addr(&self) -> EtherAddr {
        (**self).ether_addr()
    }

    fn transmit(&self, frame: &[u8]) -> io::Result<()> {
        (**self).transmit(frame)
    }
}

/// Capture time, as seconds and microseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp(pub Duration);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        )
    }

    pub fn from_micros(secs: u64, usecs: u32) -> Self {
        Timestamp(Duration::from_secs(secs) + Duration::from_micros(u64::from(usecs)))
    }

    pub fn secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn micros(&self) -> u32 {
        self.0.subsec_micros()
    }
}

impl fmt::Display for Timestamp {
    /// Seconds and milliseconds, e.g. `1476712345.067`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.secs(), self.0.subsec_millis())
    }
}

/// A frame as received from an interface
///
/// Read-only while it is threaded through the layers; each layer is handed
/// the slice of `data` it owns.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub ts: Timestamp,
    pub data: &'a [u8],
}

impl<'a> Packet<'a> {
    pub fn new(data: &'a [u8], ts: Timestamp) -> Self {
        Packet { ts, data }
    }

    /// Wrap a frame that has just been received
    pub fn now(data: &'a [u8]) -> Self {
        Self::new(data, Timestamp::now())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
