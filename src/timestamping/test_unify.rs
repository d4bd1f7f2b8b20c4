use crate::cmsg::ControlMessage;
use crate::timestamping::*;

use libc::c_int;

use std::any::Any;

fn packet_id(packet_id: u32, kind: TimestampKind) -> TimestampingMessage {
    TimestampingMessage::from(TimestampRecord::PacketId { packet_id, kind })
}

fn info(source: TimestampSource, seconds: i64, nanoseconds: i64) -> TimestampingMessage {
    TimestampingMessage::from(TimestampRecord::TimestampInfo {
        source,
        seconds,
        nanoseconds,
    })
}

#[derive(Debug)]
struct Foreign {
    level: c_int,
    msg_type: c_int,
}

impl ControlMessage for Foreign {
    fn level(&self) -> c_int {
        self.level
    }

    fn msg_type(&self) -> c_int {
        self.msg_type
    }

    fn size(&self) -> usize {
        0
    }

    fn serialize(&self, _buf: &mut [u8]) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_unify() {
    let id = packet_id(7, TimestampKind::Send);
    let ts = info(TimestampSource::Hardware, 100, 5);

    let expected = Unified {
        packet_id: 7,
        kind: TimestampKind::Send,
        source: TimestampSource::Hardware,
        seconds: 100,
        nanoseconds: 5,
    };

    assert_eq!(Ok(expected), unify(&[&id, &ts]));
}

#[test]
fn test_unify_reversed() {
    let id = packet_id(3, TimestampKind::Scheduled);
    let ts = info(TimestampSource::Software, 1, 2);

    let unified = unify_pair(&ts, &id).unwrap();

    assert_eq!(3, unified.packet_id);
    assert_eq!(TimestampKind::Scheduled, unified.kind);
    assert_eq!(TimestampSource::Software, unified.source);
    assert_eq!(1, unified.seconds);
    assert_eq!(2, unified.nanoseconds);

    let message = TimestampingMessage::from(unified);
    assert_eq!(Some(unified), message.unified());
    assert_eq!(Some("unified"), message.record().map(TimestampRecord::name));
}

#[test]
fn test_unify_two_packet_ids() {
    let first = packet_id(1, TimestampKind::Send);
    let second = packet_id(2, TimestampKind::Send);

    assert_eq!(Err(PairError::Incomplete), unify_pair(&first, &second));
}

#[test]
fn test_unify_two_timestamps() {
    let first = info(TimestampSource::Software, 1, 0);
    let second = info(TimestampSource::Hardware, 1, 0);

    assert_eq!(Err(PairError::Incomplete), unify_pair(&first, &second));
}

#[test]
fn test_unify_missing() {
    let id = packet_id(1, TimestampKind::Send);

    assert_eq!(Err(PairError::Incomplete), unify(&[]));
    assert_eq!(Err(PairError::Incomplete), unify(&[&id]));
}

#[test]
fn test_unify_extra() {
    let id = packet_id(1, TimestampKind::Send);
    let ts = info(TimestampSource::Software, 1, 0);
    let again = packet_id(2, TimestampKind::Send);

    assert_eq!(Err(PairError::Incomplete), unify(&[&id, &ts, &again]));
}

#[test]
fn test_unify_wrong_kind() {
    let unset = TimestampingMessage::new();
    let ts = info(TimestampSource::Software, 1, 0);

    assert_eq!(Err(PairError::WrongKind(Some("unset"))), unify_pair(&unset, &ts));

    let request = TimestampingMessage::from(TimestampingMask::ANY);

    assert_eq!(Err(PairError::WrongKind(Some("unset"))), unify_pair(&ts, &request));
}

#[test]
fn test_unify_already_unified() {
    let id = packet_id(1, TimestampKind::Send);
    let ts = info(TimestampSource::Software, 1, 0);
    let unified = TimestampingMessage::from(unify_pair(&id, &ts).unwrap());

    assert_eq!(
        Err(PairError::WrongKind(Some("unified"))),
        unify_pair(&unified, &ts)
    );
}

#[test]
fn test_unify_foreign_type() {
    let id = packet_id(1, TimestampKind::Send);
    let foreign = Foreign {
        level: libc::SOL_SOCKET,
        msg_type: sys::SCM_TIMESTAMPING,
    };

    assert_eq!(
        Err(PairError::WrongKind(None)),
        unify(&[&id, &foreign])
    );
}

#[test]
fn test_unify_wrong_protocol() {
    let id = packet_id(1, TimestampKind::Send);
    let rights = Foreign {
        level: libc::SOL_SOCKET,
        msg_type: libc::SCM_RIGHTS,
    };

    assert_eq!(
        Err(PairError::WrongProtocol {
            level: libc::SOL_SOCKET,
            msg_type: libc::SCM_RIGHTS,
        }),
        unify(&[&id, &rights])
    );
}
