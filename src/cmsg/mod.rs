//! Socket control messages (ancillary data).
//!
//! [`CmsgBuffer`] holds raw ancillary data as exchanged with `sendmsg`/`recvmsg`, [`Cmsgs`] walks
//! it entry by entry, and a [`Registry`] turns each entry into a typed [`ControlMessage`] using the
//! deserializers installed into it.

mod buffer;
mod registry;

pub use buffer::CmsgBuffer;
pub use buffer::Cmsgs;
pub use registry::DeserializeFn;
pub use registry::Registration;
pub use registry::Registry;

use libc::c_int;

use std::any::Any;
use std::fmt::Debug;

/// A typed control message that can be written into ancillary data.
pub trait ControlMessage: Any + Debug {
    /// `cmsg_level`
    fn level(&self) -> c_int;

    /// `cmsg_type`
    fn msg_type(&self) -> c_int;

    /// Number of payload bytes [`serialize`](ControlMessage::serialize) writes.
    fn size(&self) -> usize;

    /// Writes the payload into the first [`size`](ControlMessage::size) bytes of `buf`.
    fn serialize(&self, buf: &mut [u8]);

    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn ControlMessage + 'a {
    pub fn downcast_ref<T: ControlMessage>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// One raw entry of ancillary data.
///
/// The payload is borrowed from the buffer it was read from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cmsg<'a> {
    pub level: c_int,
    pub msg_type: c_int,
    pub data: &'a [u8],
}

impl<'a> Cmsg<'a> {
    pub fn new(level: c_int, msg_type: c_int, data: &'a [u8]) -> Self {
        Cmsg {
            level,
            msg_type,
            data,
        }
    }
}
