use nom::number::complete::{be_i64, be_u16, be_u32, le_i64, le_u16, le_u32};
use nom::IResult;

use crate::PcapError;

pub(crate) struct PcapBE;
pub(crate) struct PcapLE;

/// Byte order used to decode a block
///
/// Block contents are always fully buffered before decoding, so the `complete`
/// nom parsers are used: running out of input means the block overruns its
/// declared length.
pub(crate) trait PcapEndianness {
    fn parse_u16(i: &[u8]) -> IResult<&[u8], u16, PcapError>;
    fn parse_u32(i: &[u8]) -> IResult<&[u8], u32, PcapError>;
    fn parse_i64(i: &[u8]) -> IResult<&[u8], i64, PcapError>;

    fn u32_from_bytes(i: [u8; 4]) -> u32;
    fn i32_from_bytes(i: [u8; 4]) -> i32;
    fn i64_from_bytes(i: [u8; 8]) -> i64;
}

impl PcapEndianness for PcapBE {
    #[inline]
    fn parse_u16(i: &[u8]) -> IResult<&[u8], u16, PcapError> {
        be_u16(i)
    }

    #[inline]
    fn parse_u32(i: &[u8]) -> IResult<&[u8], u32, PcapError> {
        be_u32(i)
    }

    #[inline]
    fn parse_i64(i: &[u8]) -> IResult<&[u8], i64, PcapError> {
        be_i64(i)
    }

    #[inline]
    fn u32_from_bytes(i: [u8; 4]) -> u32 {
        u32::from_be_bytes(i)
    }

    #[inline]
    fn i32_from_bytes(i: [u8; 4]) -> i32 {
        i32::from_be_bytes(i)
    }

    #[inline]
    fn i64_from_bytes(i: [u8; 8]) -> i64 {
        i64::from_be_bytes(i)
    }
}

impl PcapEndianness for PcapLE {
    #[inline]
    fn parse_u16(i: &[u8]) -> IResult<&[u8], u16, PcapError> {
        le_u16(i)
    }

    #[inline]
    fn parse_u32(i: &[u8]) -> IResult<&[u8], u32, PcapError> {
        le_u32(i)
    }

    #[inline]
    fn parse_i64(i: &[u8]) -> IResult<&[u8], i64, PcapError> {
        le_i64(i)
    }

    #[inline]
    fn u32_from_bytes(i: [u8; 4]) -> u32 {
        u32::from_le_bytes(i)
    }

    #[inline]
    fn i32_from_bytes(i: [u8; 4]) -> i32 {
        i32::from_le_bytes(i)
    }

    #[inline]
    fn i64_from_bytes(i: [u8; 8]) -> i64 {
        i64::from_le_bytes(i)
    }
}
