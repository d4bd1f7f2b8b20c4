#![no_main]
use libfuzzer_sys::fuzz_target;
extern crate txstamp;

use txstamp::cmsg::CmsgBuffer;
use txstamp::cmsg::ControlMessage;
use txstamp::cmsg::Registry;
use txstamp::timestamping;

const PAIRS: [(libc::c_int, libc::c_int); 4] = [
    (libc::SOL_SOCKET, libc::SO_TIMESTAMPING),
    (libc::SOL_IP, libc::IP_RECVERR),
    (libc::SOL_IPV6, libc::IPV6_RECVERR),
    (libc::SOL_SOCKET, libc::SCM_RIGHTS),
];

fuzz_target!(|input: &[u8]| {
    if let Some((selector, data)) = input.split_first() {
        let (level, msg_type) = PAIRS[*selector as usize % PAIRS.len()];
        let _ = timestamping::deserialize(level, msg_type, data);
    }

    decode(input);
});

fn decode(input: &[u8]) {
    let mut registry = Registry::default();
    timestamping::register(&mut registry);

    let mut buffer = CmsgBuffer::with_capacity(input.len());
    buffer.as_mut_capacity()[..input.len()].copy_from_slice(input);
    buffer.set_len(input.len());

    let messages = registry.decode(&buffer);
    let messages: Vec<&dyn ControlMessage> = messages.iter().map(|m| &**m).collect();

    let _ = timestamping::unify(&messages);
}
