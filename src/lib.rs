pub mod cmsg;
pub mod configuration;
pub mod socket;
pub mod timestamping;

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate nix;

pub use socket::TimestampedSocket;
pub use timestamping::TimestampingMessage;
pub use timestamping::Unified;
