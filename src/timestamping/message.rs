use crate::cmsg::ControlMessage;
use crate::timestamping::codec;
use crate::timestamping::sys;
use crate::timestamping::MaskError;
use crate::timestamping::TimestampKind;
use crate::timestamping::TimestampSource;
use crate::timestamping::TimestampingMask;

use libc::c_int;

use std::any::Any;
use std::convert::TryFrom;
use std::fmt;

/// A packet id joined with the timestamp the kernel took for that packet.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Unified {
    pub packet_id: u32,
    pub kind: TimestampKind,
    pub source: TimestampSource,
    pub seconds: i64,
    pub nanoseconds: i64,
}

impl fmt::Display for Unified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "packet {} {} at {}.{:09} ({})",
            self.packet_id, self.kind, self.seconds, self.nanoseconds, self.source
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimestampRecord {
    Unset,
    /// From an `IP_RECVERR`/`IPV6_RECVERR` timestamping notification.
    PacketId {
        packet_id: u32,
        kind: TimestampKind,
    },
    /// From an `SCM_TIMESTAMPING` message.
    TimestampInfo {
        source: TimestampSource,
        seconds: i64,
        nanoseconds: i64,
    },
    Unified(Unified),
}

impl TimestampRecord {
    pub fn name(&self) -> &'static str {
        match self {
            TimestampRecord::Unset => "unset",
            TimestampRecord::PacketId { .. } => "packet id",
            TimestampRecord::TimestampInfo { .. } => "timestamp info",
            TimestampRecord::Unified(_) => "unified",
        }
    }
}

impl Default for TimestampRecord {
    fn default() -> Self {
        TimestampRecord::Unset
    }
}

impl fmt::Display for TimestampRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampRecord::Unset => write!(f, "unset"),
            TimestampRecord::PacketId { packet_id, kind } => {
                write!(f, "packet {} {}", packet_id, kind)
            }
            TimestampRecord::TimestampInfo {
                source,
                seconds,
                nanoseconds,
            } => write!(f, "{}.{:09} ({})", seconds, nanoseconds, source),
            TimestampRecord::Unified(u) => write!(f, "{}", u),
        }
    }
}

/// An `SCM_TIMESTAMPING` control message.
///
/// Outgoing messages carry a [`TimestampingMask`] requesting transmit timestamps for the packet
/// they're sent with.  Received messages carry a [`TimestampRecord`] decoded by
/// [`codec::deserialize`].  Every variant reports `SOL_SOCKET`/`SCM_TIMESTAMPING`, including packet
/// ids decoded from the IP error queue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimestampingMessage {
    mask: TimestampingMask,
    pub(crate) record: TimestampRecord,
}

impl TimestampingMessage {
    /// Bytes written by [`serialize`](ControlMessage::serialize): one `int` of flags.
    pub const SEND_SIZE: usize = std::mem::size_of::<c_int>();

    /// Bytes in a received `SCM_TIMESTAMPING` payload.
    pub const RECV_SIZE: usize = sys::scm_timestamping::SIZE;

    pub fn new() -> Self {
        TimestampingMessage::default()
    }

    /// An outgoing message requesting the timestamps in `bits`, a [`TimestampingMask`] bit set.
    pub fn with_mask(bits: u32) -> Result<Self, MaskError> {
        let mask = TimestampingMask::try_from(bits)?;

        Ok(TimestampingMessage::from(mask))
    }

    pub fn mask(&self) -> TimestampingMask {
        self.mask
    }

    /// The decoded record, or `None` for an outgoing request that carries only a mask.
    pub fn record(&self) -> Option<&TimestampRecord> {
        match self.record {
            TimestampRecord::Unset => None,
            ref record => Some(record),
        }
    }

    pub fn unified(&self) -> Option<Unified> {
        match self.record {
            TimestampRecord::Unified(u) => Some(u),
            _ => None,
        }
    }
}

impl Default for TimestampingMessage {
    fn default() -> Self {
        TimestampingMessage::from(TimestampingMask::empty())
    }
}

impl From<TimestampingMask> for TimestampingMessage {
    fn from(mask: TimestampingMask) -> Self {
        TimestampingMessage {
            mask,
            record: TimestampRecord::Unset,
        }
    }
}

impl From<TimestampRecord> for TimestampingMessage {
    fn from(record: TimestampRecord) -> Self {
        TimestampingMessage {
            mask: TimestampingMask::empty(),
            record,
        }
    }
}

impl From<Unified> for TimestampingMessage {
    fn from(unified: Unified) -> Self {
        TimestampingMessage::from(TimestampRecord::Unified(unified))
    }
}

impl ControlMessage for TimestampingMessage {
    fn level(&self) -> c_int {
        libc::SOL_SOCKET
    }

    fn msg_type(&self) -> c_int {
        sys::SCM_TIMESTAMPING
    }

    fn size(&self) -> usize {
        TimestampingMessage::SEND_SIZE
    }

    /// # Panics
    ///
    /// If `buf` is shorter than [`SEND_SIZE`](TimestampingMessage::SEND_SIZE).
    fn serialize(&self, buf: &mut [u8]) {
        codec::serialize(self.mask, buf)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
