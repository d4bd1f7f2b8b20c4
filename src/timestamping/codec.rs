use crate::cmsg::Cmsg;
use crate::cmsg::ControlMessage;
use crate::timestamping::sys;
use crate::timestamping::TimestampKind;
use crate::timestamping::TimestampRecord;
use crate::timestamping::TimestampSource;
use crate::timestamping::TimestampingMask;
use crate::timestamping::TimestampingMessage;

use libc::c_int;

use tracing::trace;
use tracing::warn;

/// Writes the kernel flags word for `mask` into the front of `buf`.
pub fn serialize(mask: TimestampingMask, buf: &mut [u8]) {
    let flags = mask.kernel_flags();

    buf[..TimestampingMessage::SEND_SIZE].copy_from_slice(&flags.to_ne_bytes());
}

/// Decodes one raw ancillary entry.
///
/// Returns `None` for entries owned by other control message types, for error queue
/// notifications that aren't timestamping notifications, and (with a warning) for malformed or
/// empty timestamping payloads.
pub fn deserialize(level: c_int, msg_type: c_int, data: &[u8]) -> Option<TimestampingMessage> {
    let record = if is_recverr(level, msg_type) {
        packet_id(data)?
    } else if level == libc::SOL_SOCKET && msg_type == sys::SCM_TIMESTAMPING {
        timestamp_info(data)?
    } else {
        return None;
    };

    trace!("decoded timestamping {}: {}", record.name(), record);

    Some(TimestampingMessage::from(record))
}

/// [`deserialize`] in the shape a [`Registry`](crate::cmsg::Registry) expects.
pub fn deserialize_cmsg(cmsg: &Cmsg<'_>) -> Option<Box<dyn ControlMessage>> {
    deserialize(cmsg.level, cmsg.msg_type, cmsg.data)
        .map(|m| Box::new(m) as Box<dyn ControlMessage>)
}

fn is_recverr(level: c_int, msg_type: c_int) -> bool {
    (level == libc::SOL_IP && msg_type == libc::IP_RECVERR)
        || (level == libc::SOL_IPV6 && msg_type == libc::IPV6_RECVERR)
}

fn packet_id(data: &[u8]) -> Option<TimestampRecord> {
    let err = match sys::extended_err(data) {
        Some(e) => e,
        None => {
            warn!(
                "Expected an extended error of at least {} bytes but got {} bytes of data",
                sys::EXTENDED_ERR_SIZE,
                data.len()
            );
            return None;
        }
    };

    if err.ee_errno != libc::ENOMSG as u32 || err.ee_origin != libc::SO_EE_ORIGIN_TIMESTAMPING {
        return None;
    }

    let kind = match TimestampKind::from_raw(err.ee_info) {
        Some(k) => k,
        None => {
            warn!(
                "Unknown timestamping kind {} for packet {}",
                err.ee_info, err.ee_data
            );
            return None;
        }
    };

    Some(TimestampRecord::PacketId {
        packet_id: err.ee_data,
        kind,
    })
}

fn timestamp_info(data: &[u8]) -> Option<TimestampRecord> {
    let stamping = match sys::scm_timestamping::from_bytes(data) {
        Some(s) => s,
        None => {
            warn!(
                "Expected a timestamping struct of {} bytes but got {} bytes of data",
                TimestampingMessage::RECV_SIZE,
                data.len()
            );
            return None;
        }
    };

    let found = TimestampSource::PRIORITY
        .iter()
        .map(|source| (*source, stamping.ts[source.index()]))
        .find(|(_, ts)| ts.is_set());

    let (source, ts) = match found {
        Some(f) => f,
        None => {
            warn!("Timestamping message carried no timestamps");
            return None;
        }
    };

    if ts.sec < 0 || ts.nsec < 0 {
        warn!(
            "Timestamping message carried a negative {} timestamp {}.{}",
            source, ts.sec, ts.nsec
        );
        return None;
    }

    Some(TimestampRecord::TimestampInfo {
        source,
        seconds: ts.sec,
        nanoseconds: ts.nsec,
    })
}
