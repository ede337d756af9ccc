use nom::bytes::complete::take;
use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

const PACK_FLAGS: OptionCode = OptionCode(2);
const PACK_HASH: OptionCode = OptionCode(3);

/// The Packet Block is obsolete, and MUST NOT be used in new files.
///
/// Use the Enhanced Packet Block or Simple Packet Block instead. It is still decoded so
/// that old captures can be read.
///
/// The packet data is not followed by alignment padding: options (or the closing length
/// field) start right after the captured bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct PacketBlock {
    pub total_length: u32,
    pub interface_id: u16,
    pub drops_count: u16,
    /// Raw timestamp, in units of the interface resolution
    pub timestamp: i64,
    pub captured_length: u32,
    pub data_length: u32,
    pub data: Vec<u8>,
    pub comment: Option<String>,
    pub flags: Option<PacketFlags>,
    pub hash_algorithm: Option<HashAlgorithm>,
    pub hash: Option<Vec<u8>>,
}

impl PacketBlock {
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.captured_length < self.data_length
    }

    /// Timestamp in 100 ns ticks, assuming the default resolution (microseconds)
    #[inline]
    pub fn timestamp_ticks(&self) -> i64 {
        default_ticks(self.timestamp as u64)
    }

    /// Timestamp in 100 ns ticks, using the resolution of the capturing interface
    ///
    /// The returned flag is true when the conversion lost precision.
    pub fn timestamp_ticks_with(
        &self,
        idb: &InterfaceDescriptionBlock,
    ) -> Result<(i64, bool), PcapError> {
        ticks_with_resolution(self.timestamp as u64, idb.ts_resolution_or_default())
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for PacketBlock {
    const HDR_SZ: usize = 32;
    const MAGIC: BlockType = BlockType::Packet;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let (i, interface_id) = En::parse_u16(i)?;
        let (i, drops_count) = En::parse_u16(i)?;
        let (i, timestamp) = En::parse_i64(i)?;
        let (i, captured_length) = En::parse_u32(i)?;
        let (i, data_length) = En::parse_u32(i)?;
        let caplen = captured_length as usize;
        let (i, data) = take(caplen)(i)?;
        let mut block = PacketBlock {
            total_length: header.total_length,
            interface_id,
            drops_count,
            timestamp,
            captured_length,
            data_length,
            data: data.to_vec(),
            comment: None,
            flags: None,
            hash_algorithm: None,
            hash: None,
        };
        let current_offset = <Self as PcapNGBlockParser<En>>::HDR_SZ + caplen;
        let total_length = header.total_length as usize;
        let (i, comment) = opt_parse_options::<En, _>(i, total_length, current_offset, |opt| {
            match opt.code {
                PACK_FLAGS => match opt.as_u32::<En>() {
                    Some(v) => block.flags = Some(PacketFlags(v)),
                    None => return false,
                },
                PACK_HASH => match split_hash(opt.value) {
                    Some((algorithm, digest)) => {
                        block.hash_algorithm = Some(algorithm);
                        block.hash = Some(digest);
                    }
                    None => return false,
                },
                _ => return false,
            }
            true
        })?;
        block.comment = comment;
        let (i, ()) = parse_closing_field::<En>(i, header.total_length)?;
        Ok((i, block))
    }
}

/// Parse a Packet Block (little-endian)
pub fn parse_packetblock_le(i: &[u8]) -> IResult<&[u8], PacketBlock, PcapError> {
    ng_block_parser::<PacketBlock, PcapLE>(i)
}

/// Parse a Packet Block (big-endian)
pub fn parse_packetblock_be(i: &[u8]) -> IResult<&[u8], PacketBlock, PcapError> {
    ng_block_parser::<PacketBlock, PcapBE>(i)
}
