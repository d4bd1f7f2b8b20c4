use crate::timestamping::sys;
use crate::timestamping::Error;

use libc::c_int;

use nix::errno::Errno;
use nix::sys::socket::socket;
use nix::sys::socket::AddressFamily;
use nix::sys::socket::SockFlag;
use nix::sys::socket::SockType;

use std::mem;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;

use tracing::debug;
use tracing::trace;
use tracing::warn;

/// Socket timestamping flags set by [`enable_socket_timestamping`].
///
/// Software and raw hardware reporting, software and hardware transmit timestamps delivered
/// together, a per-packet id, and timestamps delivered without the looped back payload.
pub const SOCKET_FLAGS: u32 = libc::SOF_TIMESTAMPING_SOFTWARE
    | libc::SOF_TIMESTAMPING_RAW_HARDWARE
    | libc::SOF_TIMESTAMPING_OPT_TX_SWHW
    | libc::SOF_TIMESTAMPING_OPT_ID
    | libc::SOF_TIMESTAMPING_OPT_TSONLY;

/// Turns on `SO_TIMESTAMPING` reporting for `socket`.
///
/// Which transmit timestamps are generated is chosen per packet with an outgoing
/// [`TimestampingMessage`](crate::timestamping::TimestampingMessage).
pub fn enable_socket_timestamping<S: AsRawFd>(socket: &S) -> Result<(), Error> {
    let fd = socket.as_raw_fd();
    let flags = SOCKET_FLAGS as c_int;

    // SAFETY: SO_TIMESTAMPING takes an int, and flags outlives the call
    let res = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_TIMESTAMPING,
            &flags as *const c_int as *const libc::c_void,
            mem::size_of::<c_int>() as libc::socklen_t,
        )
    };

    Errno::result(res).map_err(Error::SetOption)?;

    debug!("enabled timestamping {:#x} on fd {}", SOCKET_FLAGS, fd);

    Ok(())
}

/// Current `SO_TIMESTAMPING` flags of `socket`.
pub fn socket_timestamping_flags<S: AsRawFd>(socket: &S) -> Result<u32, Error> {
    let fd = socket.as_raw_fd();
    let mut flags: c_int = 0;
    let mut len = mem::size_of::<c_int>() as libc::socklen_t;

    // SAFETY: flags and len are valid for writes of the advertised size
    let res = unsafe {
        libc::getsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_TIMESTAMPING,
            &mut flags as *mut c_int as *mut libc::c_void,
            &mut len,
        )
    };

    Errno::result(res).map_err(Error::GetOption)?;

    Ok(flags as u32)
}

/// Whether every flag [`enable_socket_timestamping`] sets is on for `socket`.
pub fn socket_timestamping_enabled<S: AsRawFd>(socket: &S) -> Result<bool, Error> {
    let flags = socket_timestamping_flags(socket)?;

    Ok(flags & SOCKET_FLAGS == SOCKET_FLAGS)
}

/// Turns on transmit hardware timestamping in the driver for `interface`.
///
/// Nothing is written if transmit timestamping is already on.  Usually requires `CAP_NET_ADMIN`.
#[tracing::instrument]
pub fn enable_hardware_timestamping(interface: &str) -> Result<(), Error> {
    validate_interface_name(interface)?;

    let control = ControlSocket::open()?;

    let mut config = libc::hwtstamp_config {
        flags: 0,
        tx_type: 0,
        rx_filter: 0,
    };
    let mut request = sys::hwtstamp_request(interface, &mut config);

    // SAFETY: request points at config, both live until the ioctl returns
    if let Err(e) = unsafe { sys::get_hwtstamp(control.fd, &mut request) } {
        return Err(Error::GetConfig {
            interface: interface.to_string(),
            source: e,
        });
    }

    trace!("hardware timestamping config of {}: {:?}", interface, config);

    if config.tx_type == libc::HWTSTAMP_TX_ON as c_int {
        debug!("transmit hardware timestamping already on for {}", interface);
        return Ok(());
    }

    config.tx_type = libc::HWTSTAMP_TX_ON as c_int;
    let mut request = sys::hwtstamp_request(interface, &mut config);

    // SAFETY: as above
    if let Err(e) = unsafe { sys::set_hwtstamp(control.fd, &mut request) } {
        return Err(Error::SetConfig {
            interface: interface.to_string(),
            source: e,
        });
    }

    debug!("enabled transmit hardware timestamping for {}", interface);

    Ok(())
}

/// Alias for [`enable_hardware_timestamping`].
pub fn enable_raw_timestamping(interface: &str) -> Result<(), Error> {
    enable_hardware_timestamping(interface)
}

/// Whether timestamping control messages exist on this platform.
pub fn is_supported() -> bool {
    cfg!(target_os = "linux")
}

fn validate_interface_name(interface: &str) -> Result<(), Error> {
    if interface.is_empty() {
        return Err(Error::InvalidArgument("interface name is empty".to_string()));
    }

    if interface.as_bytes().contains(&0) {
        return Err(Error::InvalidArgument(format!(
            "interface name {:?} contains NUL",
            interface
        )));
    }

    if interface.len() >= libc::IFNAMSIZ {
        return Err(Error::InterfaceNameTooLong(interface.to_string()));
    }

    Ok(())
}

/// Throwaway socket for interface ioctls, closed on drop.
struct ControlSocket {
    fd: RawFd,
}

impl ControlSocket {
    fn open() -> Result<Self, Error> {
        let fd = socket(
            AddressFamily::Inet,
            SockType::Datagram,
            SockFlag::SOCK_CLOEXEC,
            None,
        )
        .map_err(Error::Socket)?;

        trace!("opened control socket fd {}", fd);

        Ok(ControlSocket { fd })
    }
}

impl Drop for ControlSocket {
    fn drop(&mut self) {
        if let Err(e) = nix::unistd::close(self.fd) {
            warn!("unable to close control socket fd {} ({})", self.fd, e);
        }
    }
}
