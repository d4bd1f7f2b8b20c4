//! `SO_TIMESTAMPING` transmit timestamps.
//!
//! The kernel reports a transmit timestamp as two control messages read together from the socket
//! error queue: an `IP_RECVERR` (or `IPV6_RECVERR`) notification carrying the packet id, and an
//! `SCM_TIMESTAMPING` message carrying the timestamps.  [`deserialize`] decodes each of them into a
//! [`TimestampingMessage`] and [`unify`] joins the pair into a [`Unified`] record.

mod codec;
mod enable;
mod error;
mod message;
pub mod sys;
mod types;
mod unify;

pub use codec::deserialize;
pub use codec::deserialize_cmsg;
pub use codec::serialize;
pub use enable::enable_hardware_timestamping;
pub use enable::enable_raw_timestamping;
pub use enable::enable_socket_timestamping;
pub use enable::is_supported;
pub use enable::socket_timestamping_enabled;
pub use enable::socket_timestamping_flags;
pub use enable::SOCKET_FLAGS;
pub use error::Error;
pub use error::MaskError;
pub use error::PairError;
pub use message::TimestampRecord;
pub use message::TimestampingMessage;
pub use message::Unified;
pub use types::TimestampKind;
pub use types::TimestampSource;
pub use types::TimestampingMask;
pub use unify::unify;
pub use unify::unify_pair;

use crate::cmsg::Registry;

/// Installs the timestamping deserializer under `SOL_SOCKET`/`SCM_TIMESTAMPING`.
pub fn register(registry: &mut Registry) {
    registry.register(libc::SOL_SOCKET, sys::SCM_TIMESTAMPING, deserialize_cmsg);
}


#[cfg(test)]
mod test_enable;

#[cfg(test)]
mod test_types;

#[cfg(test)]
mod test_unify;
