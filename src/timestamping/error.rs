use libc::c_int;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("interface name {0} is longer than {max} bytes", max = libc::IFNAMSIZ - 1)]
    InterfaceNameTooLong(String),
    #[error("unable to open control socket: {0}")]
    Socket(nix::Error),
    #[error("unable to get hardware timestamping configuration of {interface}: {source}")]
    GetConfig { interface: String, source: nix::Error },
    #[error("unable to set hardware timestamping configuration of {interface}: {source}")]
    SetConfig { interface: String, source: nix::Error },
    #[error("unable to enable socket timestamping: {0}")]
    SetOption(nix::Error),
    #[error("unable to read socket timestamping flags: {0}")]
    GetOption(nix::Error),
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum MaskError {
    #[error("timestamping mask {0:#x} has bits outside of {any:#x}", any = crate::timestamping::TimestampingMask::ANY.bits())]
    Invalid(u32),
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PairError {
    #[error("need exactly one packet id and one timestamp to unify")]
    Incomplete,
    /// Carries the record name, or `None` for a message type this crate doesn't decode.
    #[error("cannot unify a {} message", .0.unwrap_or("foreign"))]
    WrongKind(Option<&'static str>),
    #[error("control message level {level} type {msg_type} is not a timestamping message")]
    WrongProtocol { level: c_int, msg_type: c_int },
}
