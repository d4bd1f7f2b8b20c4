#[macro_use]
extern crate afl;
extern crate txstamp;

use txstamp::timestamping;

const PAIRS: [(libc::c_int, libc::c_int); 3] = [
    (libc::SOL_SOCKET, libc::SO_TIMESTAMPING),
    (libc::SOL_IP, libc::IP_RECVERR),
    (libc::SOL_IPV6, libc::IPV6_RECVERR),
];

fn main() {
    fuzz!(|input: &[u8]| {
        if let Some((selector, data)) = input.split_first() {
            let (level, msg_type) = PAIRS[*selector as usize % PAIRS.len()];
            let _ = timestamping::deserialize(level, msg_type, data);
        }
    });
}
