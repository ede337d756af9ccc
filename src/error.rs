use std::io;

use nom::error::{ErrorKind, ParseError};

use crate::pcapng::BlockType;

/// Errors raised while decoding a PCAPNG stream
///
/// All errors are fatal for the block being decoded: the reader does not try
/// to resynchronize, and a sequence stops at the first error.
#[derive(Debug, thiserror::Error)]
pub enum PcapError {
    /// The closing length field does not match the opening one
    ///
    /// `found` is the closing value, or the length the block decoded to when bytes are
    /// left over after the closing field.
    #[error("malformed block: declared length {expected}, found {found}")]
    MalformedBlock { expected: u32, found: u32 },
    /// The declared block length cannot even hold the block framing
    #[error("invalid block length {0}")]
    InvalidBlockLength(u32),
    /// A field, option or record extends past the declared block length
    #[error("block content overruns declared length ({0:?})")]
    BlockOverrun(ErrorKind),
    #[error("unknown block type {0:?}")]
    UnknownBlockType(BlockType),
    /// The timestamp resolution uses a power-of-two base
    #[error("unsupported timestamp resolution 0x{0:02x}")]
    UnsupportedResolution(u8),
    /// The stream ended before a declared field could be read
    #[error("unexpected end of stream")]
    Truncated,
    #[error("read error: {0}")]
    ReadError(io::Error),
}

impl PcapError {
    /// Returns true if the error means the file is corrupt (as opposed to an
    /// unsupported feature or an I/O failure)
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            PcapError::UnsupportedResolution(_) | PcapError::ReadError(_)
        )
    }
}

impl From<io::Error> for PcapError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            PcapError::Truncated
        } else {
            PcapError::ReadError(e)
        }
    }
}

impl<I> ParseError<I> for PcapError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        PcapError::BlockOverrun(kind)
    }
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}
