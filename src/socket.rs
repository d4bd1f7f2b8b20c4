use crate::cmsg::CmsgBuffer;
use crate::cmsg::ControlMessage;
use crate::cmsg::Registry;
use crate::timestamping;
use crate::timestamping::TimestampingMask;
use crate::timestamping::TimestampingMessage;
use crate::timestamping::Unified;

use nix::errno::Errno;

use std::io;
use std::mem;
use std::net::SocketAddr;
use std::net::UdpSocket;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;

use thiserror::Error;

use tracing::debug;
use tracing::trace;
use tracing::warn;

// Room for a sock_extended_err with its offender address and an scm_timestamping, with slack for
// whatever else the kernel attaches.
const CONTROL_CAPACITY: usize = 512;

// OPT_TSONLY leaves the looped back payload empty
const PAYLOAD_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum SocketError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Timestamping(#[from] timestamping::Error),
    #[error("unable to send: {0}")]
    Send(nix::Error),
    #[error("unable to read the error queue: {0}")]
    Receive(nix::Error),
}

impl SocketError {
    /// Errors from a single `sendmsg` or `recvmsg`, such as a pending `ECONNREFUSED` from an ICMP
    /// port unreachable.  The socket remains usable.
    pub fn is_transient(&self) -> bool {
        matches!(self, SocketError::Send(_) | SocketError::Receive(_))
    }
}

/// A connected UDP socket reporting transmit timestamps through its error queue.
#[derive(Debug)]
pub struct TimestampedSocket {
    socket: UdpSocket,
}

impl TimestampedSocket {
    /// Binds to `bind`, connects to `target` and enables socket timestamping.
    pub fn connect(bind: SocketAddr, target: SocketAddr) -> Result<Self, SocketError> {
        let socket = UdpSocket::bind(bind)?;
        socket.connect(target)?;

        timestamping::enable_socket_timestamping(&socket)?;

        debug!(
            "timestamping socket {} connected to {}",
            socket.local_addr()?,
            target
        );

        Ok(TimestampedSocket { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sends `payload` requesting the transmit timestamps in `mask`.
    pub fn send(&self, payload: &[u8], mask: TimestampingMask) -> Result<usize, SocketError> {
        let mut control = CmsgBuffer::new();
        control.push_message(&TimestampingMessage::from(mask));

        let mut iov = libc::iovec {
            iov_base: payload.as_ptr() as *mut libc::c_void,
            iov_len: payload.len(),
        };

        // SAFETY: msghdr is plain old data
        let mut hdr: libc::msghdr = unsafe { mem::zeroed() };
        hdr.msg_iov = &mut iov;
        hdr.msg_iovlen = 1;
        hdr.msg_control = control.as_bytes().as_ptr() as *mut libc::c_void;
        hdr.msg_controllen = control.len() as _;

        // SAFETY: iov and control outlive the call and sendmsg only reads them
        let sent = unsafe { libc::sendmsg(self.socket.as_raw_fd(), &hdr, 0) };
        let sent = Errno::result(sent).map_err(SocketError::Send)?;

        trace!("sent {} bytes requesting {:?}", sent, mask);

        Ok(sent as usize)
    }

    /// Reads one notification from the error queue without blocking and decodes its control
    /// messages through `registry`.
    ///
    /// Returns `None` when the error queue is empty.
    pub fn recv_error_queue(
        &self,
        registry: &Registry,
    ) -> Result<Option<Vec<Box<dyn ControlMessage>>>, SocketError> {
        let mut payload = [0u8; PAYLOAD_CAPACITY];
        let mut control = CmsgBuffer::with_capacity(CONTROL_CAPACITY);
        let control_bytes = control.as_mut_capacity();

        let mut iov = libc::iovec {
            iov_base: payload.as_mut_ptr() as *mut libc::c_void,
            iov_len: payload.len(),
        };

        // SAFETY: msghdr is plain old data
        let mut hdr: libc::msghdr = unsafe { mem::zeroed() };
        hdr.msg_iov = &mut iov;
        hdr.msg_iovlen = 1;
        hdr.msg_control = control_bytes.as_mut_ptr() as *mut libc::c_void;
        hdr.msg_controllen = control_bytes.len() as _;

        // SAFETY: iov and control are valid for writes of the advertised sizes
        let res = unsafe {
            libc::recvmsg(
                self.socket.as_raw_fd(),
                &mut hdr,
                libc::MSG_ERRQUEUE | libc::MSG_DONTWAIT,
            )
        };

        match Errno::result(res) {
            Ok(_) => (),
            Err(Errno::EAGAIN) => return Ok(None),
            Err(e) => return Err(SocketError::Receive(e)),
        }

        if hdr.msg_flags & libc::MSG_CTRUNC != 0 {
            warn!("error queue control data truncated to {} bytes", CONTROL_CAPACITY);
        }

        control.set_len(hdr.msg_controllen as usize);

        let messages = registry.decode(&control);
        trace!("error queue delivered {} known control messages", messages.len());

        Ok(Some(messages))
    }

    /// Drains the error queue until a packet id and its timestamp unify.
    ///
    /// Notifications that don't pair up are logged and skipped.  Returns `None` once the error
    /// queue is empty.
    pub fn next_unified(&self, registry: &Registry) -> Result<Option<Unified>, SocketError> {
        while let Some(messages) = self.recv_error_queue(registry)? {
            let stamping: Vec<&dyn ControlMessage> = messages
                .iter()
                .map(|m| &**m)
                .filter(|m| m.downcast_ref::<TimestampingMessage>().is_some())
                .collect();

            match timestamping::unify(&stamping) {
                Ok(unified) => return Ok(Some(unified)),
                Err(e) => debug!("skipping error queue notification: {}", e),
            }
        }

        Ok(None)
    }
}

impl AsRawFd for TimestampedSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}
