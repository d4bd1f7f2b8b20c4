use crate::timestamping::*;

use std::fs;
use std::net::UdpSocket;

fn loopback() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").unwrap()
}

#[test]
fn test_socket_flags() {
    assert_eq!(0x48d0, SOCKET_FLAGS);
}

#[test]
fn test_enable_socket_timestamping() {
    let socket = loopback();

    assert!(!socket_timestamping_enabled(&socket).unwrap());

    enable_socket_timestamping(&socket).unwrap();

    assert_eq!(SOCKET_FLAGS, socket_timestamping_flags(&socket).unwrap());
    assert!(socket_timestamping_enabled(&socket).unwrap());
}

#[test]
fn test_enable_socket_timestamping_twice() {
    let socket = loopback();

    enable_socket_timestamping(&socket).unwrap();
    enable_socket_timestamping(&socket).unwrap();

    assert!(socket_timestamping_enabled(&socket).unwrap());
}

#[test]
fn test_hardware_empty_name() {
    match enable_hardware_timestamping("") {
        Err(Error::InvalidArgument(_)) => (),
        r => unreachable!("unexpected result {:?}", r),
    }
}

#[test]
fn test_hardware_nul_name() {
    match enable_hardware_timestamping("eth\00") {
        Err(Error::InvalidArgument(_)) => (),
        r => unreachable!("unexpected result {:?}", r),
    }
}

#[test]
fn test_hardware_long_name() {
    let name = "x".repeat(libc::IFNAMSIZ);

    match enable_raw_timestamping(&name) {
        Err(Error::InterfaceNameTooLong(n)) => assert_eq!(name, n),
        r => unreachable!("unexpected result {:?}", r),
    }
}

#[test]
fn test_hardware_missing_interface() {
    match enable_hardware_timestamping("txstampnone0") {
        Err(Error::GetConfig { interface, .. }) => assert_eq!("txstampnone0", interface),
        r => unreachable!("unexpected result {:?}", r),
    }
}

fn open_fds() -> usize {
    fs::read_dir("/proc/self/fd").unwrap().count()
}

#[test]
fn test_hardware_closes_control_socket() {
    let before = open_fds();

    for _ in 0..512 {
        match enable_hardware_timestamping("txstampnone0") {
            Err(Error::GetConfig { .. }) => (),
            r => unreachable!("unexpected result {:?}", r),
        }
    }

    // other tests open sockets concurrently, but far fewer than one per call above
    let after = open_fds();
    assert!(after < before + 64, "{} fds open before, {} after", before, after);
}

#[test]
fn test_is_supported() {
    assert_eq!(cfg!(target_os = "linux"), is_supported());
}
