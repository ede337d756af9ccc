use nom::bytes::complete::take;
use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

/// The Simple Packet Block (SPB) is a lightweight container for storing
/// the packets coming from the network.
///
/// It has no interface id, timestamp or options. All bytes between the length
/// field and the closing length are kept in `data`, padding included.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplePacketBlock {
    pub total_length: u32,
    /// Original packet length
    pub data_length: u32,
    pub data: Vec<u8>,
}

impl SimplePacketBlock {
    /// Return the packet bytes, without the trailing padding
    pub fn packet_data(&self) -> &[u8] {
        let len = self.data_length as usize;
        if len < self.data.len() {
            &self.data[..len]
        } else {
            &self.data
        }
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for SimplePacketBlock {
    const HDR_SZ: usize = 16;
    const MAGIC: BlockType = BlockType::SimplePacket;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let (i, data_length) = En::parse_u32(i)?;
        let data_len = header.total_length as usize - <Self as PcapNGBlockParser<En>>::HDR_SZ;
        let (i, data) = take(data_len)(i)?;
        let (i, ()) = parse_closing_field::<En>(i, header.total_length)?;
        let block = SimplePacketBlock {
            total_length: header.total_length,
            data_length,
            data: data.to_vec(),
        };
        Ok((i, block))
    }
}

/// Parse a Simple Packet Block (little-endian)
///
/// *Note: this function does not remove padding in the `data` field.
/// Use `packet_data` to get field without padding.*
pub fn parse_simplepacketblock_le(i: &[u8]) -> IResult<&[u8], SimplePacketBlock, PcapError> {
    ng_block_parser::<SimplePacketBlock, PcapLE>(i)
}

/// Parse a Simple Packet Block (big-endian)
///
/// *Note: this function does not remove padding*
pub fn parse_simplepacketblock_be(i: &[u8]) -> IResult<&[u8], SimplePacketBlock, PcapError> {
    ng_block_parser::<SimplePacketBlock, PcapBE>(i)
}
