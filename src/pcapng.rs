//! PCAPNG file format
//!
//! See <https://github.com/pcapng/pcapng> for details.
//!
//! ## File format and parsing
//!
//! A capture file is organized in blocks. Every block starts with its type and total length,
//! and ends with a copy of the total length, which makes blocks self-delimiting:
//!
//! ```text
//! [ BlockType   : u32 ]
//! [ TotalLength : u32 ]
//! [ ... block-specific body ... ]
//! [ TotalLength : u32 ]
//! ```
//!
//! Most blocks end their body with a list of options, each encoded as a
//! type-length-value record padded to 32 bits, and terminated by an option with a zero
//! length.
//!
//! There are two ways of decoding a file:
//!
//! - use a [`PcapNGReader`] over any `Read + Seek` source, and iterate over all blocks
//!   ([`PcapNGReader::all_blocks`]) or only the blocks of one type
//!   ([`PcapNGReader::blocks_of_type`]),
//! - or decode blocks manually from a byte slice using [`parse_block_le`] or
//!   [`parse_block_be`].
//!
//! ## Endianness
//!
//! The byte order of a section is indicated by the byte-order magic of its Section Header
//! Block. The reader does not switch byte order according to this field: it always decodes
//! little-endian blocks, and logs a warning when a section declares the other byte order.

use rusticata_macros::newtype_enum;

mod block;
mod enhanced_packet;
mod interface_description;
mod interface_statistics;
mod name_resolution;
mod option;
mod packet;
mod packet_flags;
mod reader;
mod section_header;
mod simple_packet;
mod time;

pub use block::*;
pub use enhanced_packet::*;
pub use interface_description::*;
pub use interface_statistics::*;
pub use name_resolution::*;
pub use option::*;
pub use packet::*;
pub use packet_flags::*;
pub use reader::*;
pub use section_header::*;
pub use simple_packet::*;
pub use time::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Packet Block magic (obsolete)
pub const PB_MAGIC: u32 = 0x0000_0002;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Name Resolution Block magic
pub const NRB_MAGIC: u32 = 0x0000_0004;
/// Interface Statistic Block magic
pub const ISB_MAGIC: u32 = 0x0000_0005;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;

/// Byte Order magic
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;

/// Block type code, as found in the first field of every block
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct BlockType(pub u32);

newtype_enum! {
impl debug BlockType {
    InterfaceDescription = 0x0000_0001,
    Packet = 0x0000_0002,
    SimplePacket = 0x0000_0003,
    NameResolution = 0x0000_0004,
    InterfaceStatistics = 0x0000_0005,
    EnhancedPacket = 0x0000_0006,
    SectionHeader = 0x0A0D_0D0A,
}
}

impl BlockType {
    /// All block types this crate can decode
    pub const KNOWN: [BlockType; 7] = [
        BlockType::SectionHeader,
        BlockType::InterfaceDescription,
        BlockType::Packet,
        BlockType::SimplePacket,
        BlockType::NameResolution,
        BlockType::InterfaceStatistics,
        BlockType::EnhancedPacket,
    ];

    /// Returns true if the type code is one of the decodable block types
    pub fn is_known(self) -> bool {
        Self::KNOWN.contains(&self)
    }
}

/// Option code of a TLV option
///
/// Codes other than `EndOfOpt` and `Comment` depend on the block containing the option.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
}
}
