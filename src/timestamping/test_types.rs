use crate::timestamping::*;

use std::convert::TryFrom;

#[test]
fn test_source_name() {
    assert_eq!("software", TimestampSource::Software.name());
    assert_eq!("transformed", TimestampSource::Transformed.name());
    assert_eq!("hardware", TimestampSource::Hardware.name());

    assert_eq!("hardware", TimestampSource::name_of(2));
    assert_eq!("invalid", TimestampSource::name_of(3));
    assert_eq!("invalid", TimestampSource::name_of(u32::MAX));

    assert_eq!("transformed", format!("{}", TimestampSource::Transformed));
}

#[test]
fn test_source_index() {
    for source in &TimestampSource::PRIORITY {
        assert_eq!(Some(*source), TimestampSource::from_raw(source.index() as u32));
    }

    assert_eq!(0, TimestampSource::Software.index());
    assert_eq!(2, TimestampSource::Hardware.index());
}

#[test]
fn test_source_priority() {
    assert_eq!(
        [
            TimestampSource::Hardware,
            TimestampSource::Transformed,
            TimestampSource::Software
        ],
        TimestampSource::PRIORITY
    );
}

#[test]
fn test_kind_name() {
    assert_eq!("send", TimestampKind::Send.name());
    assert_eq!("scheduled", TimestampKind::Scheduled.name());
    assert_eq!("acknowledged", TimestampKind::Acknowledged.name());

    assert_eq!("send", TimestampKind::name_of(sys::SCM_TSTAMP_SND));
    assert_eq!("acknowledged", TimestampKind::name_of(sys::SCM_TSTAMP_ACK));
    assert_eq!("invalid", TimestampKind::name_of(3));

    assert_eq!("scheduled", format!("{}", TimestampKind::Scheduled));
}

#[test]
fn test_kind_from_raw() {
    assert_eq!(Some(TimestampKind::Send), TimestampKind::from_raw(0));
    assert_eq!(Some(TimestampKind::Scheduled), TimestampKind::from_raw(1));
    assert_eq!(Some(TimestampKind::Acknowledged), TimestampKind::from_raw(2));
    assert_eq!(None, TimestampKind::from_raw(3));
}

#[test]
fn test_mask_try_from() {
    assert_eq!(Ok(TimestampingMask::empty()), TimestampingMask::try_from(0));
    assert_eq!(Ok(TimestampingMask::ANY), TimestampingMask::try_from(7));
    assert_eq!(
        Ok(TimestampingMask::SCHEDULED | TimestampingMask::SEND_HARDWARE),
        TimestampingMask::try_from(5)
    );
    assert_eq!(Err(MaskError::Invalid(8)), TimestampingMask::try_from(8));
    assert_eq!(Err(MaskError::Invalid(9)), TimestampingMask::try_from(9));
}

#[test]
fn test_with_mask() {
    let message = TimestampingMessage::with_mask(2).unwrap();

    assert_eq!(TimestampingMask::SEND_SOFTWARE, message.mask());
    assert_eq!(None, message.record());
    assert_eq!(None, message.unified());

    assert_eq!(
        Err(MaskError::Invalid(16)),
        TimestampingMessage::with_mask(16)
    );
}

#[test]
fn test_new() {
    let message = TimestampingMessage::new();

    assert_eq!(TimestampingMask::empty(), message.mask());
    assert_eq!(None, message.record());
    assert_eq!("unset", TimestampRecord::default().name());
    assert_eq!(TimestampingMessage::default(), message);
}

#[test]
fn test_record_display() {
    let id = TimestampRecord::PacketId {
        packet_id: 4,
        kind: TimestampKind::Send,
    };

    assert_eq!("packet 4 send", id.to_string());

    let info = TimestampRecord::TimestampInfo {
        source: TimestampSource::Hardware,
        seconds: 12,
        nanoseconds: 5,
    };

    assert_eq!("12.000000005 (hardware)", info.to_string());

    let unified = Unified {
        packet_id: 4,
        kind: TimestampKind::Send,
        source: TimestampSource::Hardware,
        seconds: 12,
        nanoseconds: 5,
    };

    assert_eq!(
        "packet 4 send at 12.000000005 (hardware)",
        TimestampRecord::Unified(unified).to_string()
    );
}
