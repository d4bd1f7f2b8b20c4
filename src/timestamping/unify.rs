use crate::cmsg::ControlMessage;
use crate::timestamping::sys;
use crate::timestamping::PairError;
use crate::timestamping::TimestampKind;
use crate::timestamping::TimestampRecord;
use crate::timestamping::TimestampSource;
use crate::timestamping::TimestampingMessage;
use crate::timestamping::Unified;

/// Joins the packet id and the timestamp the kernel delivered for one packet.
///
/// `messages` is the set of control messages received together; order doesn't matter.  Exactly
/// one packet id and exactly one timestamp must be present.
pub fn unify(messages: &[&dyn ControlMessage]) -> Result<Unified, PairError> {
    let mut packet_ids: Vec<(u32, TimestampKind)> = Vec::with_capacity(1);
    let mut timestamps: Vec<(TimestampSource, i64, i64)> = Vec::with_capacity(1);

    for message in messages {
        if message.level() != libc::SOL_SOCKET || message.msg_type() != sys::SCM_TIMESTAMPING {
            return Err(PairError::WrongProtocol {
                level: message.level(),
                msg_type: message.msg_type(),
            });
        }

        let timestamping = match message.downcast_ref::<TimestampingMessage>() {
            Some(t) => t,
            None => return Err(PairError::WrongKind(None)),
        };

        match timestamping.record {
            TimestampRecord::PacketId { packet_id, kind } => packet_ids.push((packet_id, kind)),
            TimestampRecord::TimestampInfo {
                source,
                seconds,
                nanoseconds,
            } => timestamps.push((source, seconds, nanoseconds)),
            ref other => return Err(PairError::WrongKind(Some(other.name()))),
        }
    }

    match (packet_ids.as_slice(), timestamps.as_slice()) {
        ([(packet_id, kind)], [(source, seconds, nanoseconds)]) => Ok(Unified {
            packet_id: *packet_id,
            kind: *kind,
            source: *source,
            seconds: *seconds,
            nanoseconds: *nanoseconds,
        }),
        _ => Err(PairError::Incomplete),
    }
}

/// [`unify`] for two decoded timestamping messages.
pub fn unify_pair(
    first: &TimestampingMessage,
    second: &TimestampingMessage,
) -> Result<Unified, PairError> {
    unify(&[first as &dyn ControlMessage, second])
}
