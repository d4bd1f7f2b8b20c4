use crate::timestamping::sys;
use crate::timestamping::MaskError;

use std::convert::TryFrom;
use std::fmt;

bitflags! {
    /// Transmit timestamps requested for an outgoing packet.
    pub struct TimestampingMask: u32 {
        const SCHEDULED     = 1 << 0;
        const SEND_SOFTWARE = 1 << 1;
        const SEND_HARDWARE = 1 << 2;
        const ANY           = Self::SCHEDULED.bits
                            | Self::SEND_SOFTWARE.bits
                            | Self::SEND_HARDWARE.bits;
    }
}

impl TimestampingMask {
    /// The `SOF_TIMESTAMPING_TX_*` word the kernel expects in an outgoing `SCM_TIMESTAMPING`
    /// control message.
    pub fn kernel_flags(&self) -> u32 {
        let mut flags = 0;

        if self.contains(TimestampingMask::SCHEDULED) {
            flags |= libc::SOF_TIMESTAMPING_TX_SCHED;
        }

        if self.contains(TimestampingMask::SEND_SOFTWARE) {
            flags |= libc::SOF_TIMESTAMPING_TX_SOFTWARE;
        }

        if self.contains(TimestampingMask::SEND_HARDWARE) {
            flags |= libc::SOF_TIMESTAMPING_TX_HARDWARE;
        }

        flags
    }
}

impl TryFrom<u32> for TimestampingMask {
    type Error = MaskError;

    fn try_from(bits: u32) -> Result<TimestampingMask, MaskError> {
        TimestampingMask::from_bits(bits).ok_or(MaskError::Invalid(bits))
    }
}

/// Clock domain a received timestamp came from.
///
/// The discriminant is the slot index in the kernel's `scm_timestamping` array.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TimestampSource {
    Software = 0,
    Transformed = 1,
    Hardware = 2,
}

impl TimestampSource {
    /// Order in which slots are consulted when more than one is filled in.
    pub const PRIORITY: [TimestampSource; 3] = [
        TimestampSource::Hardware,
        TimestampSource::Transformed,
        TimestampSource::Software,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(TimestampSource::Software),
            1 => Some(TimestampSource::Transformed),
            2 => Some(TimestampSource::Hardware),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimestampSource::Software => "software",
            TimestampSource::Transformed => "transformed",
            TimestampSource::Hardware => "hardware",
        }
    }

    pub fn name_of(raw: u32) -> &'static str {
        TimestampSource::from_raw(raw).map_or("invalid", |s| s.name())
    }
}

impl fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Point in the transmit path a timestamp was taken at.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TimestampKind {
    Send,
    Scheduled,
    Acknowledged,
}

impl TimestampKind {
    /// Maps the `ee_info` field of a timestamping error queue notification.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            sys::SCM_TSTAMP_SND => Some(TimestampKind::Send),
            sys::SCM_TSTAMP_SCHED => Some(TimestampKind::Scheduled),
            sys::SCM_TSTAMP_ACK => Some(TimestampKind::Acknowledged),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimestampKind::Send => "send",
            TimestampKind::Scheduled => "scheduled",
            TimestampKind::Acknowledged => "acknowledged",
        }
    }

    pub fn name_of(raw: u32) -> &'static str {
        TimestampKind::from_raw(raw).map_or("invalid", |k| k.name())
    }
}

impl fmt::Display for TimestampKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
