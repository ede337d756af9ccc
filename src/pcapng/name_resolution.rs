use std::convert::TryFrom;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use nom::bytes::complete::take;
use nom::error::{ErrorKind, ParseError};
use nom::{Err, IResult};
use rusticata_macros::{align32, newtype_enum};

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

const NS_DNSNAME: OptionCode = OptionCode(2);
const NS_DNSIP4ADDR: OptionCode = OptionCode(3);
const NS_DNSIP6ADDR: OptionCode = OptionCode(4);

#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct NameRecordType(pub u16);

newtype_enum! {
    impl debug NameRecordType {
        End = 0,
        Ipv4 = 1,
        Ipv6 = 2,
    }
}

/// One entry of a Name Resolution Block: an address and the names it resolves to
///
/// Record types other than IPv6 are decoded as IPv4 records.
#[derive(Clone, Debug, PartialEq)]
pub struct NameResolutionRecord {
    pub record_type: NameRecordType,
    pub address: IpAddr,
    pub dns_entries: Vec<String>,
}

impl NameResolutionRecord {
    #[inline]
    pub fn is_ipv6(&self) -> bool {
        self.address.is_ipv6()
    }
}

/// The Name Resolution Block (NRB) is used to support the correlation of numeric addresses
/// (present in the captured packets) and their corresponding canonical names.
#[derive(Clone, Debug, PartialEq)]
pub struct NameResolutionBlock {
    pub total_length: u32,
    pub records: Vec<NameResolutionRecord>,
    pub comment: Option<String>,
    pub name_server_name: Option<String>,
    pub name_server_ipv4: Option<Ipv4Addr>,
    pub name_server_ipv6: Option<Ipv6Addr>,
}

/// Split NUL-terminated names; bytes after the last NUL are dropped
fn split_dns_entries(i: &[u8]) -> Vec<String> {
    let mut entries: Vec<String> = i
        .split(|&b| b == 0)
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    entries.pop();
    entries
}

fn ipv4_from(b: &[u8]) -> Option<Ipv4Addr> {
    let octets = <[u8; 4]>::try_from(b.get(..4)?).ok()?;
    Some(Ipv4Addr::from(octets))
}

fn ipv6_from(b: &[u8]) -> Option<Ipv6Addr> {
    let octets = <[u8; 16]>::try_from(b.get(..16)?).ok()?;
    Some(Ipv6Addr::from(octets))
}

fn short_record(i: &[u8]) -> PcapError {
    PcapError::from_error_kind(i, ErrorKind::LengthValue)
}

/// Parse one record, or `None` for the end record
pub(crate) fn parse_name_record<En: PcapEndianness>(
    i: &[u8],
) -> IResult<&[u8], Option<NameResolutionRecord>, PcapError> {
    let (i, record_type) = En::parse_u16(i)?;
    let (i, value_length) = En::parse_u16(i)?;
    let record_type = NameRecordType(record_type);
    if record_type == NameRecordType::End {
        return Ok((i, None));
    }
    let len = value_length as usize;
    let (i, value) = take(len)(i)?;
    let (i, _padding) = take(align32!(len) - len)(i)?;
    let (address, names) = if record_type == NameRecordType::Ipv6 {
        match ipv6_from(value) {
            Some(a) => (IpAddr::V6(a), &value[16..]),
            None => return Err(Err::Error(short_record(i))),
        }
    } else {
        match ipv4_from(value) {
            Some(a) => (IpAddr::V4(a), &value[4..]),
            None => return Err(Err::Error(short_record(i))),
        }
    };
    let record = NameResolutionRecord {
        record_type,
        address,
        dns_entries: split_dns_entries(names),
    };
    Ok((i, Some(record)))
}

/// Parse a record list, up to and including the end record
pub(crate) fn parse_name_record_list<En: PcapEndianness>(
    mut i: &[u8],
) -> IResult<&[u8], Vec<NameResolutionRecord>, PcapError> {
    let mut records = Vec::new();
    loop {
        let (rem, record) = parse_name_record::<En>(i)?;
        i = rem;
        match record {
            Some(record) => records.push(record),
            None => break,
        }
    }
    Ok((i, records))
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for NameResolutionBlock {
    const HDR_SZ: usize = 12;
    const MAGIC: BlockType = BlockType::NameResolution;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let start_len = i.len();
        let (i, records) = parse_name_record_list::<En>(i)?;
        let current_offset = BLOCK_HEADER_LEN + (start_len - i.len()) + BLOCK_FOOTER_LEN;
        let mut name_server_name = None;
        let mut name_server_ipv4 = None;
        let mut name_server_ipv6 = None;
        let total_length = header.total_length as usize;
        let (i, comment) = opt_parse_options::<En, _>(i, total_length, current_offset, |opt| {
            match opt.code {
                NS_DNSNAME => name_server_name = Some(opt.as_string()),
                NS_DNSIP4ADDR => match ipv4_from(opt.value) {
                    Some(a) => name_server_ipv4 = Some(a),
                    None => return false,
                },
                NS_DNSIP6ADDR => match ipv6_from(opt.value) {
                    Some(a) => name_server_ipv6 = Some(a),
                    None => return false,
                },
                _ => return false,
            }
            true
        })?;
        let (i, ()) = parse_closing_field::<En>(i, header.total_length)?;
        let block = NameResolutionBlock {
            total_length: header.total_length,
            records,
            comment,
            name_server_name,
            name_server_ipv4,
            name_server_ipv6,
        };
        Ok((i, block))
    }
}

/// Parse a Name Resolution Block (little-endian)
#[inline]
pub fn parse_nameresolutionblock_le(i: &[u8]) -> IResult<&[u8], NameResolutionBlock, PcapError> {
    ng_block_parser::<NameResolutionBlock, PcapLE>(i)
}

/// Parse a Name Resolution Block (big-endian)
#[inline]
pub fn parse_nameresolutionblock_be(i: &[u8]) -> IResult<&[u8], NameResolutionBlock, PcapError> {
    ng_block_parser::<NameResolutionBlock, PcapBE>(i)
}
