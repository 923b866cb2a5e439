#![no_main]
use autoconf6::wire::{Dhcpv6Packet, Dhcpv6Repr};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let packet = match Dhcpv6Packet::new_checked(data) {
        Ok(packet) => packet,
        Err(_) => return,
    };
    if let Ok(repr) = Dhcpv6Repr::parse(&packet) {
        let mut buffer = vec![0; repr.buffer_len()];
        let mut out = Dhcpv6Packet::new_unchecked(&mut buffer[..]);
        let _ = repr.emit(&mut out);
    }
});
