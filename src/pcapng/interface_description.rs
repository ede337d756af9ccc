use std::convert::TryFrom;
use std::net::{Ipv4Addr, Ipv6Addr};

use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::{Linktype, PcapError};

use super::*;

const IF_NAME: OptionCode = OptionCode(2);
const IF_DESCRIPTION: OptionCode = OptionCode(3);
const IF_IPV4ADDR: OptionCode = OptionCode(4);
const IF_IPV6ADDR: OptionCode = OptionCode(5);
const IF_MACADDR: OptionCode = OptionCode(6);
const IF_EUIADDR: OptionCode = OptionCode(7);
const IF_SPEED: OptionCode = OptionCode(8);
const IF_TSRESOL: OptionCode = OptionCode(9);
const IF_TZONE: OptionCode = OptionCode(10);
const IF_FILTER: OptionCode = OptionCode(11);
const IF_OS: OptionCode = OptionCode(12);
const IF_FCSLEN: OptionCode = OptionCode(13);
const IF_TSOFFSET: OptionCode = OptionCode(14);

/// An Interface Description Block (IDB) is the container for information
/// describing an interface on which packet data is captured.
///
/// Interfaces are numbered in the order of their description blocks inside a section,
/// starting from 0. Packet blocks reference them by this index.
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDescriptionBlock {
    pub total_length: u32,
    pub linktype: Linktype,
    pub snaplen: u32,
    pub comment: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Interface address and netmask
    pub ipv4_address: Option<(Ipv4Addr, Ipv4Addr)>,
    /// Interface address and prefix length
    pub ipv6_address: Option<(Ipv6Addr, u8)>,
    pub mac_address: Option<Vec<u8>>,
    pub eui_address: Option<Vec<u8>>,
    /// Interface speed, in bits per second
    pub speed: Option<i64>,
    /// Raw `if_tsresol` value
    pub ts_resolution: Option<u8>,
    /// Time zone (GMT offset)
    pub time_zone: Option<i32>,
    /// Capture filter, first byte is the filter type
    pub filter: Option<Vec<u8>>,
    pub os: Option<String>,
    pub fcs_length: Option<u8>,
    /// Offset in seconds added to packet timestamps
    pub ts_offset: Option<i64>,
}

impl InterfaceDescriptionBlock {
    /// Return the timestamp resolution byte, or the default (6, microseconds) if the
    /// interface has none
    #[inline]
    pub fn ts_resolution_or_default(&self) -> u8 {
        self.ts_resolution.unwrap_or(DEFAULT_TS_RESOLUTION)
    }

    /// Build the transformer for timestamps of packets captured on this interface
    ///
    /// Fails with [`PcapError::UnsupportedResolution`] for power-of-two resolutions.
    pub fn timestamp_transformer(&self) -> Result<TimestampTransformer, PcapError> {
        TimestampTransformer::new(self.ts_resolution_or_default())
    }
}

fn ipv4_with_mask(b: &[u8]) -> Option<(Ipv4Addr, Ipv4Addr)> {
    if b.len() < 8 {
        return None;
    }
    let addr = Ipv4Addr::new(b[0], b[1], b[2], b[3]);
    let mask = Ipv4Addr::new(b[4], b[5], b[6], b[7]);
    Some((addr, mask))
}

fn ipv6_with_prefix(b: &[u8]) -> Option<(Ipv6Addr, u8)> {
    if b.len() < 17 {
        return None;
    }
    let octets = <[u8; 16]>::try_from(&b[..16]).ok()?;
    Some((Ipv6Addr::from(octets), b[16]))
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for InterfaceDescriptionBlock {
    const HDR_SZ: usize = 20;
    const MAGIC: BlockType = BlockType::InterfaceDescription;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let (i, linktype) = En::parse_u16(i)?;
        let (i, _reserved) = En::parse_u16(i)?;
        let (i, snaplen) = En::parse_u32(i)?;
        let mut block = InterfaceDescriptionBlock {
            total_length: header.total_length,
            linktype: Linktype(linktype),
            snaplen,
            comment: None,
            name: None,
            description: None,
            ipv4_address: None,
            ipv6_address: None,
            mac_address: None,
            eui_address: None,
            speed: None,
            ts_resolution: None,
            time_zone: None,
            filter: None,
            os: None,
            fcs_length: None,
            ts_offset: None,
        };
        let (i, comment) = opt_parse_options::<En, _>(
            i,
            header.total_length as usize,
            <Self as PcapNGBlockParser<En>>::HDR_SZ,
            |opt| {
                match opt.code {
                    IF_NAME => block.name = Some(opt.as_string()),
                    IF_DESCRIPTION => block.description = Some(opt.as_string()),
                    IF_IPV4ADDR => match ipv4_with_mask(opt.value) {
                        Some(v) => block.ipv4_address = Some(v),
                        None => return false,
                    },
                    IF_IPV6ADDR => match ipv6_with_prefix(opt.value) {
                        Some(v) => block.ipv6_address = Some(v),
                        None => return false,
                    },
                    IF_MACADDR => block.mac_address = Some(opt.to_vec()),
                    IF_EUIADDR => block.eui_address = Some(opt.to_vec()),
                    IF_SPEED => match opt.as_i64::<En>() {
                        Some(v) => block.speed = Some(v),
                        None => return false,
                    },
                    IF_TSRESOL => block.ts_resolution = opt.as_u8(),
                    IF_TZONE => match opt.as_i32::<En>() {
                        Some(v) => block.time_zone = Some(v),
                        None => return false,
                    },
                    IF_FILTER => block.filter = Some(opt.to_vec()),
                    IF_OS => block.os = Some(opt.as_string()),
                    IF_FCSLEN => block.fcs_length = opt.as_u8(),
                    IF_TSOFFSET => match opt.as_i64::<En>() {
                        Some(v) => block.ts_offset = Some(v),
                        None => return false,
                    },
                    _ => return false,
                }
                true
            },
        )?;
        block.comment = comment;
        let (i, ()) = parse_closing_field::<En>(i, header.total_length)?;
        Ok((i, block))
    }
}

/// Parse an Interface Description Block (little-endian)
pub fn parse_interfacedescriptionblock_le(
    i: &[u8],
) -> IResult<&[u8], InterfaceDescriptionBlock, PcapError> {
    ng_block_parser::<InterfaceDescriptionBlock, PcapLE>(i)
}

/// Parse an Interface Description Block (big-endian)
pub fn parse_interfacedescriptionblock_be(
    i: &[u8],
) -> IResult<&[u8], InterfaceDescriptionBlock, PcapError> {
    ng_block_parser::<InterfaceDescriptionBlock, PcapBE>(i)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn idb_without_options() {
        let data = hex!(
            "01 00 00 00 14 00 00 00
             01 00 00 00 ff ff 00 00
             14 00 00 00"
        );
        let (rem, idb) = parse_interfacedescriptionblock_le(&data).unwrap();
        assert!(rem.is_empty());
        assert_eq!(idb.linktype, Linktype::ETHERNET);
        assert_eq!(idb.snaplen, 65535);
        assert_eq!(idb.ts_resolution, None);
        assert_eq!(idb.ts_resolution_or_default(), 6);
        assert_eq!(idb.comment, None);
    }

    #[test]
    fn idb_with_options() {
        let data = hex!(
            "01 00 00 00 60 00 00 00
             01 00 00 00 00 00 04 00
             02 00 04 00 65 74 68 30
             04 00 08 00 c0 a8 01 02 ff ff ff 00
             06 00 06 00 00 11 22 33 44 55 00 00
             08 00 08 00 00 ca 9a 3b 00 00 00 00
             09 00 01 00 09 00 00 00
             0e 00 08 00 10 00 00 00 00 00 00 00
             01 00 02 00 68 69 00 00
             00 00 00 00
             60 00 00 00"
        );
        let (rem, idb) = parse_interfacedescriptionblock_le(&data).unwrap();
        assert!(rem.is_empty());
        assert_eq!(idb.snaplen, 0x40000);
        assert_eq!(idb.name.as_deref(), Some("eth0"));
        assert_eq!(
            idb.ipv4_address,
            Some((
                Ipv4Addr::new(192, 168, 1, 2),
                Ipv4Addr::new(255, 255, 255, 0)
            ))
        );
        assert_eq!(
            idb.mac_address.as_deref(),
            Some(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55][..])
        );
        assert_eq!(idb.speed, Some(1_000_000_000));
        assert_eq!(idb.ts_resolution, Some(9));
        assert_eq!(idb.ts_offset, Some(16));
        assert_eq!(idb.comment.as_deref(), Some("hi"));
        let transformer = idb.timestamp_transformer().unwrap();
        assert!(transformer.precision_loss());
    }

    #[test]
    fn idb_short_address_ignored() {
        // 4-byte if_IPv4addr, without the netmask
        let data = hex!(
            "01 00 00 00 20 00 00 00
             01 00 00 00 00 00 00 00
             04 00 04 00 c0 a8 01 02
             00 00 00 00
             20 00 00 00"
        );
        let (rem, idb) = parse_interfacedescriptionblock_le(&data).unwrap();
        assert!(rem.is_empty());
        assert_eq!(idb.ipv4_address, None);
        assert_eq!(idb.ipv6_address, None);
    }

    #[test]
    fn idb_base2_resolution() {
        let data = hex!(
            "01 00 00 00 20 00 00 00
             01 00 00 00 00 00 00 00
             09 00 01 00 8a 00 00 00
             00 00 00 00
             20 00 00 00"
        );
        let (_, idb) = parse_interfacedescriptionblock_le(&data).unwrap();
        assert_eq!(idb.ts_resolution, Some(0x8a));
        assert!(matches!(
            idb.timestamp_transformer(),
            Err(PcapError::UnsupportedResolution(0x8a))
        ));
    }
}
