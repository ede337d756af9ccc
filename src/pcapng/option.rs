use std::convert::TryFrom;

use log::trace;
use nom::bytes::complete::take;
use nom::IResult;
use rusticata_macros::align32;

use crate::endianness::PcapEndianness;
use crate::PcapError;

use super::OptionCode;

/// A TLV option, borrowed from the block being decoded
///
/// The value does not include the padding bytes.
#[derive(Debug)]
pub struct PcapNGOption<'a> {
    pub code: OptionCode,
    pub value: &'a [u8],
}

impl<'a> PcapNGOption<'a> {
    /// Return the option value as raw bytes
    #[inline]
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Return the option value as an owned byte buffer
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.value.to_vec()
    }

    /// Return the option value as UTF-8 text
    ///
    /// Invalid sequences are replaced, the text is never rejected.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(self.value).into_owned()
    }

    /// Return the first byte of the option value, or None if value is empty
    pub fn as_u8(&self) -> Option<u8> {
        self.value.first().copied()
    }

    /// Return the option value interpreted as u32, or None
    ///
    /// Option data must be at least 4 bytes, extra bytes are ignored.
    pub(crate) fn as_u32<En: PcapEndianness>(&self) -> Option<u32> {
        self.value
            .get(..4)
            .and_then(|b| <[u8; 4]>::try_from(b).ok())
            .map(En::u32_from_bytes)
    }

    /// Return the option value interpreted as i32, or None
    ///
    /// Option data must be at least 4 bytes, extra bytes are ignored.
    pub(crate) fn as_i32<En: PcapEndianness>(&self) -> Option<i32> {
        self.value
            .get(..4)
            .and_then(|b| <[u8; 4]>::try_from(b).ok())
            .map(En::i32_from_bytes)
    }

    /// Return the option value interpreted as i64, or None
    ///
    /// Option data must be at least 8 bytes, extra bytes are ignored.
    pub(crate) fn as_i64<En: PcapEndianness>(&self) -> Option<i64> {
        self.value
            .get(..8)
            .and_then(|b| <[u8; 8]>::try_from(b).ok())
            .map(En::i64_from_bytes)
    }
}

/// Number of bytes used by an option with a value of `len` bytes (header and padding
/// included)
#[inline]
pub fn option_encoded_len(len: u16) -> usize {
    4 + align32!(len as usize)
}

/// Parse one option
///
/// Returns `None` when the option has a zero length, which marks the end of the list.
pub(crate) fn parse_option<En: PcapEndianness>(
    i: &[u8],
) -> IResult<&[u8], Option<PcapNGOption>, PcapError> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    if len == 0 {
        return Ok((i, None));
    }
    let len = len as usize;
    let (i, value) = take(len)(i)?;
    let (i, _padding) = take(align32!(len) - len)(i)?;
    let option = PcapNGOption {
        code: OptionCode(code),
        value,
    };
    Ok((i, Some(option)))
}

/// Parse an option list, up to and including the end marker
///
/// The comment option is handled here and returned. All other options are passed to
/// `dispatch`, which returns false for codes it does not handle; these are ignored.
pub(crate) fn parse_options<'a, En, F>(
    mut i: &'a [u8],
    mut dispatch: F,
) -> IResult<&'a [u8], Option<String>, PcapError>
where
    En: PcapEndianness,
    F: FnMut(&PcapNGOption<'a>) -> bool,
{
    let mut comment = None;
    loop {
        let (rem, option) = parse_option::<En>(i)?;
        i = rem;
        match option {
            None => break,
            Some(opt) if opt.code == OptionCode::Comment => comment = Some(opt.as_string()),
            Some(opt) => {
                if !dispatch(&opt) {
                    trace!("ignoring option {:?} ({} bytes)", opt.code, opt.value.len());
                }
            }
        }
    }
    Ok((i, comment))
}

/// Parse the option list of a block, if the block has room for one
///
/// `opt_offset` is the size of the block without options: header, fields already read,
/// and closing length field. Options are read only if the block is larger.
pub(crate) fn opt_parse_options<'a, En, F>(
    i: &'a [u8],
    block_len: usize,
    opt_offset: usize,
    dispatch: F,
) -> IResult<&'a [u8], Option<String>, PcapError>
where
    En: PcapEndianness,
    F: FnMut(&PcapNGOption<'a>) -> bool,
{
    if block_len > opt_offset {
        parse_options::<En, F>(i, dispatch)
    } else {
        Ok((i, None))
    }
}
