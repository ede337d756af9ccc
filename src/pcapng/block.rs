use nom::bytes::complete::take;
use nom::error::{ErrorKind, ParseError};
use nom::{Err, IResult};

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

/// Size of the block type and total length fields
pub const BLOCK_HEADER_LEN: usize = 8;
/// Size of the closing total length field
pub const BLOCK_FOOTER_LEN: usize = 4;

/// The generic block header, common to all blocks
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockHeader {
    pub block_type: BlockType,
    /// Total length of the block, including header and closing length
    pub total_length: u32,
}

/// A block from a PcapNG file
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    SectionHeader(SectionHeaderBlock),
    InterfaceDescription(InterfaceDescriptionBlock),
    InterfaceStatistics(InterfaceStatisticsBlock),
    EnhancedPacket(EnhancedPacketBlock),
    Packet(PacketBlock),
    SimplePacket(SimplePacketBlock),
    NameResolution(NameResolutionBlock),
}

impl Block {
    /// Returns true if blocks contains a network packet
    pub fn is_data_block(&self) -> bool {
        matches!(
            self,
            &Block::EnhancedPacket(_) | &Block::Packet(_) | &Block::SimplePacket(_)
        )
    }

    /// Return the type code of the block
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::SectionHeader(_) => BlockType::SectionHeader,
            Block::InterfaceDescription(_) => BlockType::InterfaceDescription,
            Block::InterfaceStatistics(_) => BlockType::InterfaceStatistics,
            Block::EnhancedPacket(_) => BlockType::EnhancedPacket,
            Block::Packet(_) => BlockType::Packet,
            Block::SimplePacket(_) => BlockType::SimplePacket,
            Block::NameResolution(_) => BlockType::NameResolution,
        }
    }

    /// Return the total length of the block, as declared in its header
    pub fn total_length(&self) -> u32 {
        match self {
            Block::SectionHeader(b) => b.total_length,
            Block::InterfaceDescription(b) => b.total_length,
            Block::InterfaceStatistics(b) => b.total_length,
            Block::EnhancedPacket(b) => b.total_length,
            Block::Packet(b) => b.total_length,
            Block::SimplePacket(b) => b.total_length,
            Block::NameResolution(b) => b.total_length,
        }
    }

    /// Return the value of the comment option, if present
    ///
    /// Simple Packet Blocks have no options, so this is always `None` for them.
    pub fn comment(&self) -> Option<&str> {
        let comment = match self {
            Block::SectionHeader(b) => &b.comment,
            Block::InterfaceDescription(b) => &b.comment,
            Block::InterfaceStatistics(b) => &b.comment,
            Block::EnhancedPacket(b) => &b.comment,
            Block::Packet(b) => &b.comment,
            Block::SimplePacket(_) => return None,
            Block::NameResolution(b) => &b.comment,
        };
        comment.as_deref()
    }
}

/// A concrete block type, which can be extracted from a [`Block`]
///
/// This is used by [`PcapNGReader::blocks_of_type`] to select which blocks are decoded.
pub trait PcapNGBlock: Sized {
    const BLOCK_TYPE: BlockType;

    /// Return the inner block, if `block` has the matching variant
    fn from_block(block: Block) -> Option<Self>;
}

macro_rules! impl_block_variant {
    ($t:ident, $variant:ident) => {
        impl From<$t> for Block {
            fn from(b: $t) -> Block {
                Block::$variant(b)
            }
        }

        impl PcapNGBlock for $t {
            const BLOCK_TYPE: BlockType = BlockType::$variant;

            fn from_block(block: Block) -> Option<$t> {
                match block {
                    Block::$variant(b) => Some(b),
                    _ => None,
                }
            }
        }
    };
}

impl_block_variant!(SectionHeaderBlock, SectionHeader);
impl_block_variant!(InterfaceDescriptionBlock, InterfaceDescription);
impl_block_variant!(InterfaceStatisticsBlock, InterfaceStatistics);
impl_block_variant!(EnhancedPacketBlock, EnhancedPacket);
impl_block_variant!(PacketBlock, Packet);
impl_block_variant!(SimplePacketBlock, SimplePacket);
impl_block_variant!(NameResolutionBlock, NameResolution);

/// Read the 8-byte block header (type and total length)
pub(crate) fn parse_block_header<En: PcapEndianness>(
    i: &[u8],
) -> IResult<&[u8], BlockHeader, PcapError> {
    let (i, block_type) = En::parse_u32(i)?;
    let (i, total_length) = En::parse_u32(i)?;
    let header = BlockHeader {
        block_type: BlockType(block_type),
        total_length,
    };
    Ok((i, header))
}

/// Read the closing length field, which must repeat the opening one
pub(crate) fn parse_closing_field<En: PcapEndianness>(
    i: &[u8],
    expected: u32,
) -> IResult<&[u8], (), PcapError> {
    let (i, found) = En::parse_u32(i)?;
    if found != expected {
        return Err(Err::Failure(PcapError::MalformedBlock { expected, found }));
    }
    Ok((i, ()))
}

pub(crate) trait PcapNGBlockParser<En: PcapEndianness>: Sized {
    /// Minimum block size (framing and fixed fields), in bytes
    const HDR_SZ: usize;
    /// Type code for this block type
    const MAGIC: BlockType;

    /// Decode the block content, including the closing length field
    ///
    /// `i` starts after the block header and stops at the declared end of the block.
    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError>;
}

/// Decode one complete block, given the block object and endianness
pub(crate) fn ng_block_parser<P, En>(i: &[u8]) -> IResult<&[u8], P, PcapError>
where
    P: PcapNGBlockParser<En>,
    En: PcapEndianness,
{
    if i.len() < BLOCK_HEADER_LEN {
        return Err(Err::Failure(PcapError::Truncated));
    }
    let (i, header) = parse_block_header::<En>(i)?;
    if header.block_type != P::MAGIC {
        return Err(Err::Error(PcapError::from_error_kind(i, ErrorKind::Tag)));
    }
    let total_length = header.total_length as usize;
    if total_length < P::HDR_SZ {
        return Err(Err::Failure(PcapError::InvalidBlockLength(
            header.total_length,
        )));
    }
    if i.len() < total_length - BLOCK_HEADER_LEN {
        return Err(Err::Failure(PcapError::Truncated));
    }
    let (rem, content) = take(total_length - BLOCK_HEADER_LEN)(i)?;
    let (trailing, block) = P::inner_parse(header, content)?;
    // the closing field must end the block
    if !trailing.is_empty() {
        return Err(Err::Failure(PcapError::MalformedBlock {
            expected: header.total_length,
            found: (total_length - trailing.len()) as u32,
        }));
    }
    Ok((rem, block))
}

type BlockDecoder = fn(&[u8]) -> IResult<&[u8], Block, PcapError>;

fn decode_as<P, En>(i: &[u8]) -> IResult<&[u8], Block, PcapError>
where
    P: PcapNGBlockParser<En> + Into<Block>,
    En: PcapEndianness,
{
    let (i, block) = ng_block_parser::<P, En>(i)?;
    Ok((i, block.into()))
}

/// Map a block type code to the function decoding it
fn block_decoder<En: PcapEndianness>(block_type: BlockType) -> Option<BlockDecoder> {
    let decoder: BlockDecoder = match block_type {
        BlockType::SectionHeader => decode_as::<SectionHeaderBlock, En>,
        BlockType::InterfaceDescription => decode_as::<InterfaceDescriptionBlock, En>,
        BlockType::InterfaceStatistics => decode_as::<InterfaceStatisticsBlock, En>,
        BlockType::EnhancedPacket => decode_as::<EnhancedPacketBlock, En>,
        BlockType::Packet => decode_as::<PacketBlock, En>,
        BlockType::SimplePacket => decode_as::<SimplePacketBlock, En>,
        BlockType::NameResolution => decode_as::<NameResolutionBlock, En>,
        _ => return None,
    };
    Some(decoder)
}

fn parse_block<En: PcapEndianness>(i: &[u8]) -> IResult<&[u8], Block, PcapError> {
    let (_, id) = En::parse_u32(i).map_err(|_| Err::Failure(PcapError::Truncated))?;
    let block_type = BlockType(id);
    match block_decoder::<En>(block_type) {
        Some(decoder) => decoder(i),
        None => Err(Err::Failure(PcapError::UnknownBlockType(block_type))),
    }
}

/// Parse any block, as little-endian
///
/// The input must start with the block header. The remaining bytes after the block
/// are returned.
pub fn parse_block_le(i: &[u8]) -> IResult<&[u8], Block, PcapError> {
    parse_block::<PcapLE>(i)
}

/// Parse any block, as big-endian
pub fn parse_block_be(i: &[u8]) -> IResult<&[u8], Block, PcapError> {
    parse_block::<PcapBE>(i)
}
