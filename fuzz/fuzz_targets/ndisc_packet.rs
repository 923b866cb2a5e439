#![no_main]
use autoconf6::wire::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let frame = match EthernetFrame::new_checked(data) {
        Ok(frame) if frame.ethertype() == EthernetProtocol::Ipv6 => frame,
        _ => return,
    };
    let packet = match Ipv6Packet::new_checked(frame.payload()) {
        Ok(packet) => packet,
        Err(_) => return,
    };
    let ip_repr = match Ipv6Repr::parse(&packet) {
        Ok(ip_repr) if ip_repr.next_header == IpProtocol::Icmpv6 => ip_repr,
        _ => return,
    };
    let icmp = match Icmpv6Packet::new_checked(packet.payload()) {
        Ok(icmp) if icmp.msg_type().is_ndisc() => icmp,
        _ => return,
    };
    if let Ok(repr) = NdiscRepr::parse(&icmp) {
        let mut buffer = vec![0; repr.buffer_len()];
        let mut out = Icmpv6Packet::new_unchecked(&mut buffer[..]);
        repr.emit(&mut out);
        out.fill_checksum(&ip_repr.src_addr, &ip_repr.dst_addr);
    }
});
