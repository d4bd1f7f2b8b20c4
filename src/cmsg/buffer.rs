use crate::cmsg::Cmsg;
use crate::cmsg::ControlMessage;

use libc::c_uint;
use libc::cmsghdr;
use libc::msghdr;

use std::cmp::min;
use std::iter::FusedIterator;
use std::mem;
use std::ptr;
use std::slice;

const WORD: usize = mem::size_of::<usize>();

/// Ancillary data storage, aligned for `cmsghdr` access.
///
/// Bytes past [`len`](CmsgBuffer::len) are capacity available to `recvmsg`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CmsgBuffer {
    words: Vec<usize>,
    len: usize,
}

impl CmsgBuffer {
    pub fn new() -> Self {
        CmsgBuffer::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        CmsgBuffer {
            words: vec![0; (bytes + WORD - 1) / WORD],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.words.len() * WORD
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Sets the length after the kernel filled the buffer, clamped to the capacity.
    pub fn set_len(&mut self, len: usize) {
        self.len = min(len, self.capacity());
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: len never exceeds the byte size of words
        unsafe { slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), self.len) }
    }

    /// The whole capacity, for handing to `recvmsg` as `msg_control`.
    pub fn as_mut_capacity(&mut self) -> &mut [u8] {
        let capacity = self.capacity();

        // SAFETY: usize words are plain bytes of the same extent
        unsafe { slice::from_raw_parts_mut(self.words.as_mut_ptr().cast::<u8>(), capacity) }
    }

    /// Appends one control message with the given raw payload.
    pub fn push(&mut self, level: libc::c_int, msg_type: libc::c_int, data: &[u8]) {
        let (space, cmsg_len) = unsafe {
            (
                libc::CMSG_SPACE(data.len() as c_uint) as usize,
                libc::CMSG_LEN(data.len() as c_uint) as usize,
            )
        };

        let start = self.len;
        let end = start + space;

        if end > self.capacity() {
            self.words.resize((end + WORD - 1) / WORD, 0);
        }

        // SAFETY: start is a multiple of the cmsg alignment within a word aligned allocation that
        // is at least end bytes long
        unsafe {
            let base = self.words.as_mut_ptr().cast::<u8>().add(start);
            ptr::write_bytes(base, 0, space);

            let hdr = base.cast::<cmsghdr>();
            (*hdr).cmsg_len = cmsg_len as _;
            (*hdr).cmsg_level = level;
            (*hdr).cmsg_type = msg_type;

            ptr::copy_nonoverlapping(data.as_ptr(), libc::CMSG_DATA(hdr), data.len());
        }

        self.len = end;
    }

    /// Appends a serialized control message.
    pub fn push_message(&mut self, message: &dyn ControlMessage) {
        let mut payload = vec![0; message.size()];
        message.serialize(&mut payload);

        self.push(message.level(), message.msg_type(), &payload);
    }

    pub fn cmsgs(&self) -> Cmsgs<'_> {
        Cmsgs::new(self.as_bytes())
    }
}

/// Iterator over the entries of a [`CmsgBuffer`], in the order they were delivered.
///
/// Payloads are clipped to the end of the buffer and iteration stops at the first malformed
/// header.
pub struct Cmsgs<'a> {
    buf: &'a [u8],
    hdr: msghdr,
    cur: *const cmsghdr,
}

impl<'a> Cmsgs<'a> {
    fn new(buf: &'a [u8]) -> Self {
        // SAFETY: msghdr is plain old data
        let mut hdr: msghdr = unsafe { mem::zeroed() };
        hdr.msg_control = buf.as_ptr() as *mut _;
        hdr.msg_controllen = buf.len() as _;

        // SAFETY: msg_control and msg_controllen describe buf
        let cur = unsafe { libc::CMSG_FIRSTHDR(&hdr) };

        Cmsgs { buf, hdr, cur }
    }
}

impl<'a> Iterator for Cmsgs<'a> {
    type Item = Cmsg<'a>;

    fn next(&mut self) -> Option<Cmsg<'a>> {
        let end = self.buf.as_ptr_range().end;

        if self.cur.is_null() || self.cur.cast::<u8>() >= end {
            return None;
        }

        // SAFETY: CMSG_FIRSTHDR and CMSG_NXTHDR only return headers that fit inside the buffer
        let cmsg = unsafe { &*self.cur };
        let header_len = unsafe { libc::CMSG_LEN(0) } as usize;
        let cmsg_len = cmsg.cmsg_len as usize;

        if cmsg_len < header_len {
            self.cur = ptr::null();
            return None;
        }

        let data = unsafe {
            let data_ptr = libc::CMSG_DATA(cmsg);
            let available = (end as usize).saturating_sub(data_ptr as usize);

            // SAFETY: clipped to the end of buf
            slice::from_raw_parts(data_ptr, min(cmsg_len - header_len, available))
        };

        let remaining = (end as usize).saturating_sub(self.cur as usize);

        // a clipped entry is always the last one
        self.cur = if cmsg_len > remaining {
            ptr::null()
        } else {
            // SAFETY: cur came from CMSG_FIRSTHDR or CMSG_NXTHDR on the same msghdr
            unsafe { libc::CMSG_NXTHDR(&self.hdr, self.cur) }
        };

        Some(Cmsg::new(cmsg.cmsg_level, cmsg.cmsg_type, data))
    }
}

impl FusedIterator for Cmsgs<'_> {}
