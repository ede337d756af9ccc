use std::net::{IpAddr, Ipv4Addr};

use pcapng_decode::*;

static SAMPLE_LE: &[u8] = include_bytes!("../assets/sample-le.pcapng");

/// Offsets of the blocks in the sample file
const OFFSETS: [usize; 11] = [0, 76, 152, 192, 288, 408, 484, 532, 588, 700, 764];

fn block_at(index: usize) -> Block {
    let (_, block) = parse_block_le(&SAMPLE_LE[OFFSETS[index]..]).expect("could not parse block");
    block
}

#[test]
fn test_blocks_are_contiguous() {
    let mut i = SAMPLE_LE;
    let mut offsets = Vec::new();
    while !i.is_empty() {
        offsets.push(SAMPLE_LE.len() - i.len());
        let (rem, _block) = parse_block_le(i).expect("could not parse block");
        i = rem;
    }
    assert_eq!(offsets, OFFSETS.to_vec());
}

#[test]
fn test_section_header() {
    let (rem, shb) = parse_sectionheaderblock_le(SAMPLE_LE).expect("could not parse SHB");
    assert_eq!(rem.len(), SAMPLE_LE.len() - 76);
    assert!(shb.byte_order_matches());
    assert_eq!((shb.major_version, shb.minor_version), (1, 0));
    assert_eq!(shb.section_length(), None);
    assert_eq!(shb.hardware.as_deref(), Some("x86_64"));
    assert_eq!(shb.os.as_deref(), Some("Linux 6.1"));
    assert_eq!(shb.user_application.as_deref(), Some("pcapng-gen"));
}

#[test]
fn test_interfaces() {
    let idb0 = match block_at(1) {
        Block::InterfaceDescription(idb) => idb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(idb0.linktype, Linktype::ETHERNET);
    assert_eq!(idb0.snaplen, 65535);
    assert_eq!(idb0.name.as_deref(), Some("eth0"));
    assert_eq!(idb0.comment.as_deref(), Some("primary interface"));
    assert_eq!(
        idb0.ipv4_address,
        Some((
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::new(255, 255, 255, 0)
        ))
    );
    assert_eq!(idb0.ts_resolution, Some(6));
    assert!(!idb0.timestamp_transformer().unwrap().precision_loss());

    let idb1 = match block_at(2) {
        Block::InterfaceDescription(idb) => idb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(idb1.linktype, Linktype::RAW);
    assert_eq!(idb1.name.as_deref(), Some("lo"));
    assert_eq!(idb1.ts_resolution, Some(9));
    assert!(idb1.timestamp_transformer().unwrap().precision_loss());
}

#[test]
fn test_name_resolution() {
    let nrb = match block_at(3) {
        Block::NameResolution(nrb) => nrb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(nrb.records.len(), 2);
    assert_eq!(
        nrb.records[0].address,
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))
    );
    assert_eq!(nrb.records[0].dns_entries, vec!["gateway", "router.lan"]);
    assert!(nrb.records[1].is_ipv6());
    assert_eq!(
        nrb.records[1].address,
        "2001:db8::1".parse::<IpAddr>().unwrap()
    );
    assert_eq!(nrb.records[1].dns_entries, vec!["v6host"]);
    assert_eq!(nrb.name_server_name.as_deref(), Some("ns.lan"));
    assert_eq!(nrb.name_server_ipv4, Some(Ipv4Addr::new(192, 168, 1, 1)));
}

#[test]
fn test_enhanced_packets() {
    let epb = match block_at(4) {
        Block::EnhancedPacket(epb) => epb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(epb.interface_id, 0);
    assert_eq!(epb.timestamp, 1_434_416_300_606_680);
    assert_eq!(epb.timestamp_ticks(), 635_700_131_006_066_800);
    assert_eq!(epb.captured_length, 60);
    assert_eq!(epb.data, (0u8..60).collect::<Vec<_>>());
    assert_eq!(epb.comment.as_deref(), Some("first packet"));
    let flags = epb.flags.expect("no flags");
    assert!(flags.is_inbound());
    assert_eq!(flags.reception_type(), ReceptionType::Unicast);

    // nanosecond interface
    let (_, idb1) = parse_interfacedescriptionblock_le(&SAMPLE_LE[152..]).unwrap();
    let epb = match block_at(5) {
        Block::EnhancedPacket(epb) => epb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(epb.interface_id, 1);
    assert_eq!(epb.data.len(), 42);
    let (ticks, lossy) = epb.timestamp_ticks_with(&idb1).unwrap();
    assert_eq!(ticks, 635_700_131_006_066_801);
    assert!(lossy);

    let epb = match block_at(10) {
        Block::EnhancedPacket(epb) => epb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert!(epb.is_truncated());
    assert_eq!(epb.data.len(), 1500);
    assert_eq!(epb.data_length, 1514);
    assert_eq!(epb.timestamp_ticks(), 635_700_131_011_268_200);
}

#[test]
fn test_simple_and_legacy_packets() {
    let spb = match block_at(6) {
        Block::SimplePacket(spb) => spb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(spb.data_length, 30);
    assert_eq!(spb.data.len(), 32);
    assert_eq!(spb.packet_data(), &[0xab; 30][..]);

    let pb = match block_at(7) {
        Block::Packet(pb) => pb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(pb.interface_id, 0);
    assert_eq!(pb.drops_count, 3);
    assert_eq!(pb.data, (0u8..8).collect::<Vec<_>>());
    assert_eq!(pb.hash_algorithm, Some(HashAlgorithm::Crc32));
    assert_eq!(pb.hash.as_deref(), Some(&[0x11, 0x22, 0x33, 0x44][..]));
}

#[test]
fn test_statistics() {
    let isb = match block_at(9) {
        Block::InterfaceStatistics(isb) => isb,
        b => panic!("unexpected block {:?}", b.block_type()),
    };
    assert_eq!(isb.interface_id, 0);
    assert_eq!(isb.timestamp, 1_434_416_308_690_049);
    assert_eq!(isb.start_time, Some(1_434_416_300_000_000));
    assert_eq!(isb.packets_received, Some(4));
    assert_eq!(isb.packets_dropped, Some(0));
    assert_eq!(isb.end_time, None);
}

#[test]
fn test_big_endian_entry_point() {
    // little-endian data does not decode as big-endian
    let res = parse_block_be(SAMPLE_LE);
    assert!(res.is_err());
}
