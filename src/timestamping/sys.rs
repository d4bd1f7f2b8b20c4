#![allow(non_camel_case_types)]

use libc::c_char;
use libc::c_int;

use std::mem;
use std::ptr;

pub const SCM_TIMESTAMPING: c_int = libc::SO_TIMESTAMPING;

pub const SCM_TSTAMP_SND:   u32 = 0; // driver passed the packet to the NIC
pub const SCM_TSTAMP_SCHED: u32 = 1; // packet entered the qdisc
pub const SCM_TSTAMP_ACK:   u32 = 2; // all data was acknowledged by the peer

/// Bytes of an `IP_RECVERR`/`IPV6_RECVERR` payload before the trailing offender address.
pub const EXTENDED_ERR_SIZE: usize = mem::size_of::<libc::sock_extended_err>();

/// Reads the extended error from the front of a control message payload.
pub fn extended_err(data: &[u8]) -> Option<libc::sock_extended_err> {
    if data.len() < EXTENDED_ERR_SIZE {
        return None;
    }

    // SAFETY: length checked above, and every bit pattern is a valid sock_extended_err
    Some(unsafe { ptr::read_unaligned(data.as_ptr().cast::<libc::sock_extended_err>()) })
}

/// An `IP_RECVERR` payload as the kernel lays it out, with a zeroed offender address.
#[cfg(test)]
pub(crate) fn recverr_payload(errno: c_int, origin: u8, info: u32, data: u32) -> Vec<u8> {
    let err = libc::sock_extended_err {
        ee_errno: errno as u32,
        ee_origin: origin,
        ee_type: 0,
        ee_code: 0,
        ee_pad: 0,
        ee_info: info,
        ee_data: data,
    };

    // SAFETY: sock_extended_err is plain old data without padding
    let bytes = unsafe {
        std::slice::from_raw_parts(
            (&err as *const libc::sock_extended_err).cast::<u8>(),
            EXTENDED_ERR_SIZE,
        )
    };

    let mut payload = bytes.to_vec();
    payload.extend_from_slice(&[0; mem::size_of::<libc::sockaddr_in>()]);
    payload
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct timespec {
    pub sec:  i64,
    pub nsec: i64,
}

impl timespec {
    pub const SIZE: usize = 16;

    pub fn is_set(&self) -> bool {
        self.sec != 0 || self.nsec != 0
    }
}

/// Payload of an `SCM_TIMESTAMPING` control message.
///
/// `ts[0]` holds the software timestamp, `ts[1]` the (deprecated) transformed hardware timestamp,
/// `ts[2]` the raw hardware timestamp.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct scm_timestamping {
    pub ts: [timespec; 3],
}

impl scm_timestamping {
    pub const SIZE: usize = 3 * timespec::SIZE;

    /// Decodes native endian `{i64, i64}` triplets.  Returns `None` unless `data` is exactly
    /// [`SIZE`](Self::SIZE) bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() != Self::SIZE {
            return None;
        }

        let mut stamping = scm_timestamping::default();

        for (slot, chunk) in stamping.ts.iter_mut().zip(data.chunks_exact(timespec::SIZE)) {
            let (sec, nsec) = chunk.split_at(8);
            slot.sec = i64::from_ne_bytes(sec.try_into().ok()?);
            slot.nsec = i64::from_ne_bytes(nsec.try_into().ok()?);
        }

        Some(stamping)
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];

        for (slot, chunk) in self.ts.iter().zip(bytes.chunks_exact_mut(timespec::SIZE)) {
            chunk[0..8].copy_from_slice(&slot.sec.to_ne_bytes());
            chunk[8..16].copy_from_slice(&slot.nsec.to_ne_bytes());
        }

        bytes
    }
}

/// `SIOC[GS]HWTSTAMP` request for `name` pointing at `config`.
///
/// `name` must be shorter than `IFNAMSIZ` and free of NUL bytes.
pub fn hwtstamp_request(name: &str, config: &mut libc::hwtstamp_config) -> libc::ifreq {
    let mut ifr_name = [0; libc::IFNAMSIZ];

    for (to, from) in ifr_name.iter_mut().zip(name.bytes()) {
        *to = from as c_char;
    }

    libc::ifreq {
        ifr_name,
        ifr_ifru: libc::__c_anonymous_ifr_ifru {
            ifru_data: (config as *mut libc::hwtstamp_config).cast::<c_char>(),
        },
    }
}

ioctl_readwrite_bad!(get_hwtstamp, libc::SIOCGHWTSTAMP, libc::ifreq);
ioctl_readwrite_bad!(set_hwtstamp, libc::SIOCSHWTSTAMP, libc::ifreq);
