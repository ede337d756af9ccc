use nom::bytes::complete::take;
use nom::IResult;
use rusticata_macros::align32;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

const EPB_FLAGS: OptionCode = OptionCode(2);
const EPB_HASH: OptionCode = OptionCode(3);
const EPB_DROPCOUNT: OptionCode = OptionCode(4);

/// An Enhanced Packet Block (EPB) is the standard container for storing
/// the packets coming from the network.
///
/// The `data` field holds the captured bytes only, without the alignment padding.
///
/// ## Examples
///
/// ```rust
/// use pcapng_decode::pcapng::parse_enhancedpacketblock_le;
///
/// # let input_data = include_bytes!("../../assets/sample-le.pcapng");
/// # let block_data = &input_data[288..];
/// let (_, epb) = parse_enhancedpacketblock_le(block_data).unwrap();
/// if epb.is_truncated() {
///     // packet was cut to the interface snaplen
/// }
/// let ticks = epb.timestamp_ticks();
/// # assert!(ticks > 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EnhancedPacketBlock {
    pub total_length: u32,
    pub interface_id: u32,
    /// Raw timestamp, in units of the interface resolution
    pub timestamp: u64,
    /// Number of bytes captured
    pub captured_length: u32,
    /// Length of the packet on the wire
    pub data_length: u32,
    pub data: Vec<u8>,
    pub comment: Option<String>,
    pub flags: Option<PacketFlags>,
    pub hash_algorithm: Option<HashAlgorithm>,
    pub hash: Option<Vec<u8>>,
    pub drop_count: Option<i64>,
}

impl EnhancedPacketBlock {
    /// Returns true if the packet was not captured entirely
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.captured_length < self.data_length
    }

    /// Timestamp in 100 ns ticks, assuming the default resolution (microseconds)
    #[inline]
    pub fn timestamp_ticks(&self) -> i64 {
        default_ticks(self.timestamp)
    }

    /// Timestamp in 100 ns ticks, using the resolution of the capturing interface
    ///
    /// The returned flag is true when the conversion lost precision.
    pub fn timestamp_ticks_with(
        &self,
        idb: &InterfaceDescriptionBlock,
    ) -> Result<(i64, bool), PcapError> {
        ticks_with_resolution(self.timestamp, idb.ts_resolution_or_default())
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for EnhancedPacketBlock {
    const HDR_SZ: usize = 32;
    const MAGIC: BlockType = BlockType::EnhancedPacket;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let (i, interface_id) = En::parse_u32(i)?;
        // high 32 bits are stored first, whatever the byte order
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, captured_length) = En::parse_u32(i)?;
        let (i, data_length) = En::parse_u32(i)?;
        let caplen = captured_length as usize;
        let (i, data) = take(caplen)(i)?;
        let (i, _padding) = take(align32!(caplen) - caplen)(i)?;
        let mut block = EnhancedPacketBlock {
            total_length: header.total_length,
            interface_id,
            timestamp: ((ts_high as u64) << 32) | (ts_low as u64),
            captured_length,
            data_length,
            data: data.to_vec(),
            comment: None,
            flags: None,
            hash_algorithm: None,
            hash: None,
            drop_count: None,
        };
        let current_offset = <Self as PcapNGBlockParser<En>>::HDR_SZ + align32!(caplen);
        let total_length = header.total_length as usize;
        let (i, comment) = opt_parse_options::<En, _>(i, total_length, current_offset, |opt| {
            match opt.code {
                EPB_FLAGS => match opt.as_u32::<En>() {
                    Some(v) => block.flags = Some(PacketFlags(v)),
                    None => return false,
                },
                EPB_HASH => match split_hash(opt.value) {
                    Some((algorithm, digest)) => {
                        block.hash_algorithm = Some(algorithm);
                        block.hash = Some(digest);
                    }
                    None => return false,
                },
                EPB_DROPCOUNT => match opt.as_i64::<En>() {
                    Some(v) => block.drop_count = Some(v),
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

/// Parse an Enhanced Packet Block (little-endian)
pub fn parse_enhancedpacketblock_le(i: &[u8]) -> IResult<&[u8], EnhancedPacketBlock, PcapError> {
    ng_block_parser::<EnhancedPacketBlock, PcapLE>(i)
}

/// Parse an Enhanced Packet Block (big-endian)
pub fn parse_enhancedpacketblock_be(i: &[u8]) -> IResult<&[u8], EnhancedPacketBlock, PcapError> {
    ng_block_parser::<EnhancedPacketBlock, PcapBE>(i)
}
