use rusticata_macros::newtype_enum;

/// Link-layer information attached to a packet (`epb_flags` / `pack_flags` option)
///
/// ```text
/// bits 0-1   direction (0 unknown, 1 inbound, 2 outbound)
/// bits 2-4   reception type (0 unspecified, 1 unicast, 2 multicast, 3 broadcast,
///            4 promiscuous)
/// bits 5-8   FCS length in bytes (0 if unknown)
/// bits 24-31 link-layer errors
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct PacketFlags(pub u32);

/// Direction of a packet, relative to the capturing interface
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Unknown,
    Inbound,
    Outbound,
}

/// How a packet was received by the capturing interface
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceptionType {
    Unspecified,
    Unicast,
    Multicast,
    Broadcast,
    Promiscuous,
    /// Reserved value
    Other(u8),
}

const DIRECTION_MASK: u32 = 0x0000_0003;
const RECEPTION_MASK: u32 = 0x0000_001c;
const RECEPTION_SHIFT: u32 = 2;
const FCS_LENGTH_MASK: u32 = 0x0000_01e0;
const FCS_LENGTH_SHIFT: u32 = 5;

const ERR_SYMBOL: u32 = 1 << 31;
const ERR_PREAMBLE: u32 = 1 << 30;
const ERR_START_FRAME_DELIMITER: u32 = 1 << 29;
const ERR_UNALIGNED_FRAME: u32 = 1 << 28;
const ERR_WRONG_INTERFRAME_GAP: u32 = 1 << 27;
const ERR_PACKET_TOO_SHORT: u32 = 1 << 26;
const ERR_PACKET_TOO_LONG: u32 = 1 << 25;
const ERR_CRC: u32 = 1 << 24;

impl PacketFlags {
    pub fn direction(self) -> Direction {
        match self.0 & DIRECTION_MASK {
            1 => Direction::Inbound,
            2 => Direction::Outbound,
            _ => Direction::Unknown,
        }
    }

    #[inline]
    pub fn is_inbound(self) -> bool {
        self.direction() == Direction::Inbound
    }

    #[inline]
    pub fn is_outbound(self) -> bool {
        self.direction() == Direction::Outbound
    }

    pub fn reception_type(self) -> ReceptionType {
        match ((self.0 & RECEPTION_MASK) >> RECEPTION_SHIFT) as u8 {
            0 => ReceptionType::Unspecified,
            1 => ReceptionType::Unicast,
            2 => ReceptionType::Multicast,
            3 => ReceptionType::Broadcast,
            4 => ReceptionType::Promiscuous,
            n => ReceptionType::Other(n),
        }
    }

    /// Length of the Frame Check Sequence, in bytes
    #[inline]
    pub fn fcs_length(self) -> u8 {
        ((self.0 & FCS_LENGTH_MASK) >> FCS_LENGTH_SHIFT) as u8
    }

    #[inline]
    pub fn has_symbol_error(self) -> bool {
        self.0 & ERR_SYMBOL != 0
    }

    #[inline]
    pub fn has_preamble_error(self) -> bool {
        self.0 & ERR_PREAMBLE != 0
    }

    #[inline]
    pub fn has_start_frame_delimiter_error(self) -> bool {
        self.0 & ERR_START_FRAME_DELIMITER != 0
    }

    #[inline]
    pub fn has_unaligned_frame_error(self) -> bool {
        self.0 & ERR_UNALIGNED_FRAME != 0
    }

    #[inline]
    pub fn has_wrong_interframe_gap_error(self) -> bool {
        self.0 & ERR_WRONG_INTERFRAME_GAP != 0
    }

    #[inline]
    pub fn has_packet_too_short_error(self) -> bool {
        self.0 & ERR_PACKET_TOO_SHORT != 0
    }

    #[inline]
    pub fn has_packet_too_long_error(self) -> bool {
        self.0 & ERR_PACKET_TOO_LONG != 0
    }

    #[inline]
    pub fn has_crc_error(self) -> bool {
        self.0 & ERR_CRC != 0
    }

    /// Returns true if any link-layer error bit is set
    #[inline]
    pub fn has_link_layer_error(self) -> bool {
        self.0 & 0xff00_0000 != 0
    }
}

/// Algorithm of a packet hash (`epb_hash` / `pack_hash` option)
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct HashAlgorithm(pub u8);

newtype_enum! {
impl debug HashAlgorithm {
    TwosComplement = 0,
    Xor = 1,
    Crc32 = 2,
    Md5 = 3,
    Sha1 = 4,
}
}

/// Split a hash option value into algorithm and digest
pub(crate) fn split_hash(value: &[u8]) -> Option<(HashAlgorithm, Vec<u8>)> {
    let (algorithm, digest) = value.split_first()?;
    Some((HashAlgorithm(*algorithm), digest.to_vec()))
}
