use crate::cmsg::Cmsg;
use crate::cmsg::CmsgBuffer;
use crate::cmsg::ControlMessage;

use libc::c_int;

use tracing::trace;

/// Builds a typed message from a raw entry, or returns `None` if the entry isn't one it handles.
pub type DeserializeFn = fn(&Cmsg<'_>) -> Option<Box<dyn ControlMessage>>;

#[derive(Clone, Copy, Debug)]
pub struct Registration {
    pub level: c_int,
    pub msg_type: c_int,
    pub deserialize: DeserializeFn,
}

/// Control message types known to a receiver.
///
/// Each registration is keyed by the `(level, type)` pair of the messages it produces, but every
/// deserializer is offered every entry: a deserializer may recognise entries delivered under other
/// pairs (timestamping claims `IP_RECVERR` notifications, for example).
#[derive(Clone, Debug, Default)]
pub struct Registry {
    registrations: Vec<Registration>,
}

impl Registry {
    /// Installs `deserialize` for `(level, msg_type)`, replacing any earlier registration of the
    /// same pair.
    pub fn register(&mut self, level: c_int, msg_type: c_int, deserialize: DeserializeFn) {
        let registration = Registration {
            level,
            msg_type,
            deserialize,
        };

        match self
            .registrations
            .iter_mut()
            .find(|r| r.level == level && r.msg_type == msg_type)
        {
            Some(existing) => *existing = registration,
            None => self.registrations.push(registration),
        }

        trace!("registered control message level {} type {}", level, msg_type);
    }

    pub fn is_registered(&self, level: c_int, msg_type: c_int) -> bool {
        self.registrations
            .iter()
            .any(|r| r.level == level && r.msg_type == msg_type)
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// The first registered deserializer that recognises `cmsg` wins.
    pub fn deserialize(&self, cmsg: &Cmsg<'_>) -> Option<Box<dyn ControlMessage>> {
        let message = self
            .registrations
            .iter()
            .find_map(|r| (r.deserialize)(cmsg));

        if message.is_none() {
            trace!(
                "no deserializer for control message level {} type {} ({} bytes)",
                cmsg.level,
                cmsg.msg_type,
                cmsg.data.len()
            );
        }

        message
    }

    /// Deserializes every entry of `buffer`, skipping unrecognised ones.
    pub fn decode(&self, buffer: &CmsgBuffer) -> Vec<Box<dyn ControlMessage>> {
        buffer
            .cmsgs()
            .filter_map(|cmsg| self.deserialize(&cmsg))
            .collect()
    }
}
