use std::io::{self, Read, Seek, SeekFrom};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use circular::Buffer;
use log::{debug, trace, warn};

use crate::endianness::{PcapEndianness, PcapLE};
use crate::error::PcapError;
use crate::pcapng::*;

/// Default capacity of the read-ahead buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 65536;

/// Smallest possible block: header and closing length field
const MIN_BLOCK_LEN: u32 = (BLOCK_HEADER_LEN + BLOCK_FOOTER_LEN) as u32;

/// Decoder for a pcap-ng stream
///
/// ## Pcap-NG Reader
///
/// This reader wraps any input providing the `Read` and `Seek` traits. It keeps a circular
/// read-ahead buffer, which grows when a block does not fit, so that every block is decoded
/// from a complete slice.
///
/// Blocks are always decoded as little-endian. A Section Header Block declaring the other
/// byte order is logged, but the section is not decoded differently.
///
/// There are two ways to walk the stream:
///
/// - [`all_blocks`](PcapNGReader::all_blocks) decodes every block, in file order,
/// - [`blocks_of_type`](PcapNGReader::blocks_of_type) decodes only the blocks of one type.
///   Other blocks are skipped using their declared length, and the source is seeked forward
///   without reading them.
///
/// **When a sequence is exhausted, the reader is reset to the start of the stream**, so the
/// same sequence (or another one) can be walked again. A sequence stops at the first error,
/// and does not reset the reader in that case.
///
/// Sequences borrow the reader mutably: only one can be active at a time.
///
/// ## Example
///
/// ```rust
/// use pcapng_decode::pcapng::*;
/// use std::fs::File;
///
/// # let path = "assets/sample-le.pcapng";
/// let file = File::open(path).unwrap();
/// let mut reader = PcapNGReader::with_default_capacity(file).expect("PcapNGReader");
/// let mut if_linktypes = Vec::new();
/// for block in reader.all_blocks() {
///     match block {
///         Ok(Block::SectionHeader(_)) => {
///             // starting a new section, clear known interfaces
///             if_linktypes.clear();
///         }
///         Ok(Block::InterfaceDescription(idb)) => if_linktypes.push(idb.linktype),
///         Ok(Block::EnhancedPacket(epb)) => {
///             assert!((epb.interface_id as usize) < if_linktypes.len());
///         }
///         Ok(_) => (),
///         Err(e) => panic!("error while reading: {}", e),
///     }
/// }
/// // the reader was reset, and can be used again
/// let num_packets = reader.blocks_of_type::<EnhancedPacketBlock>().count();
/// # assert!(num_packets > 0);
/// ```
pub struct PcapNGReader<R>
where
    R: Read + Seek,
{
    reader: R,
    buffer: Buffer,
    /// Stream offset where decoding started
    start: u64,
    /// Stream offset of the next block
    position: u64,
    reader_exhausted: bool,
}

impl<R> PcapNGReader<R>
where
    R: Read + Seek,
{
    /// Creates a new `PcapNGReader<R>` with the provided buffer capacity.
    ///
    /// Decoding starts at the current position of `reader`.
    pub fn new(capacity: usize, mut reader: R) -> Result<PcapNGReader<R>, PcapError> {
        let start = reader.stream_position()?;
        let buffer = Buffer::with_capacity(capacity.max(MIN_BLOCK_LEN as usize));
        Ok(PcapNGReader {
            reader,
            buffer,
            start,
            position: start,
            reader_exhausted: false,
        })
    }

    /// Creates a new `PcapNGReader<R>` with a 64 KiB buffer.
    pub fn with_default_capacity(reader: R) -> Result<PcapNGReader<R>, PcapError> {
        Self::new(DEFAULT_BUFFER_CAPACITY, reader)
    }

    /// Stream offset of the next block to be decoded
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Rewind to the start of the stream
    pub fn reset(&mut self) -> Result<(), PcapError> {
        debug!("resetting reader to offset {}", self.start);
        self.reader.seek(SeekFrom::Start(self.start))?;
        self.buffer.reset();
        self.position = self.start;
        self.reader_exhausted = false;
        Ok(())
    }

    /// Consume the reader, returning the underlying source
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read from the source until `n` bytes are buffered, or the source is exhausted
    fn fill_to(&mut self, n: usize) -> Result<(), PcapError> {
        while self.buffer.available_data() < n && !self.reader_exhausted {
            self.buffer.shift();
            if self.buffer.available_space() == 0 {
                let new_size = self.buffer.capacity().saturating_mul(2);
                trace!("growing buffer to {} bytes", new_size);
                self.buffer.grow(new_size);
            }
            let sz = match self.reader.read(self.buffer.space()) {
                Ok(sz) => sz,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.reader_exhausted = sz == 0;
            self.buffer.fill(sz);
        }
        Ok(())
    }

    /// Return the type of the next block, without consuming it
    ///
    /// Returns `None` at the end of the stream. A stream ending inside the type field is
    /// truncated.
    pub fn peek_type(&mut self) -> Result<Option<BlockType>, PcapError> {
        self.fill_to(4)?;
        match self.buffer.available_data() {
            0 => Ok(None),
            1..=3 => Err(PcapError::Truncated),
            _ => {
                let (_, id) = PcapLE::parse_u32(self.buffer.data())
                    .map_err(|_| PcapError::Truncated)?;
                Ok(Some(BlockType(id)))
            }
        }
    }

    /// Read the header of the next block, without consuming it
    fn peek_header(&mut self) -> Result<BlockHeader, PcapError> {
        self.fill_to(BLOCK_HEADER_LEN)?;
        let (_, header) = parse_block_header::<PcapLE>(self.buffer.data())
            .map_err(|_| PcapError::Truncated)?;
        if header.total_length < MIN_BLOCK_LEN {
            warn!(
                "{:?} block at offset {} has invalid length {}",
                header.block_type, self.position, header.total_length
            );
            return Err(PcapError::InvalidBlockLength(header.total_length));
        }
        Ok(header)
    }

    fn advance(&mut self, len: u32) {
        self.buffer.consume(len as usize);
        self.position += u64::from(len);
    }

    /// Decode the next block
    ///
    /// Returns `None` at the end of the stream.
    pub fn read_next_block(&mut self) -> Result<Option<Block>, PcapError> {
        let block_type = match self.peek_type()? {
            Some(t) => t,
            None => return Ok(None),
        };
        if !block_type.is_known() {
            warn!(
                "unknown block type {:?} at offset {}",
                block_type, self.position
            );
            return Err(PcapError::UnknownBlockType(block_type));
        }
        let header = self.peek_header()?;
        let len = header.total_length as usize;
        self.fill_to(len)?;
        if self.buffer.available_data() < len {
            warn!(
                "{:?} block at offset {} truncated ({} of {} bytes)",
                block_type,
                self.position,
                self.buffer.available_data(),
                len
            );
            return Err(PcapError::Truncated);
        }
        let block = match parse_block_le(&self.buffer.data()[..len]) {
            Ok((_, block)) => block,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                warn!(
                    "failed to decode {:?} block at offset {}: {}",
                    block_type, self.position, e
                );
                return Err(e);
            }
            Err(nom::Err::Incomplete(_)) => return Err(PcapError::Truncated),
        };
        if let Block::SectionHeader(ref shb) = block {
            if !shb.byte_order_matches() {
                warn!(
                    "section at offset {} uses another byte order (magic 0x{:08x}), decoding as little-endian",
                    self.position, shb.bom
                );
            }
        }
        trace!(
            "decoded {:?} block at offset {} ({} bytes)",
            block_type, self.position, len
        );
        self.advance(header.total_length);
        Ok(Some(block))
    }

    /// Skip the next block using its declared length
    fn skip_block(&mut self, header: BlockHeader) -> Result<(), PcapError> {
        let len = header.total_length;
        let buffered = self.buffer.available_data();
        if buffered >= len as usize {
            self.advance(len);
        } else {
            // the source is positioned right after the buffered data
            let remaining = u64::from(len) - buffered as u64;
            debug!(
                "seeking past {:?} block at offset {} ({} bytes)",
                header.block_type, self.position, len
            );
            self.buffer.consume(buffered);
            self.reader.seek(SeekFrom::Current(remaining as i64))?;
            self.reader_exhausted = false;
            self.position += u64::from(len);
        }
        Ok(())
    }

    /// Decode the next block of type `kind`, skipping other blocks
    ///
    /// Returns `None` at the end of the stream.
    pub fn read_next_block_of_kind(&mut self, kind: BlockType) -> Result<Option<Block>, PcapError> {
        loop {
            match self.peek_type()? {
                None => return Ok(None),
                Some(t) if t == kind => return self.read_next_block(),
                Some(_) => {
                    let header = self.peek_header()?;
                    self.skip_block(header)?;
                }
            }
        }
    }

    /// Return an iterator over all blocks of the stream
    ///
    /// When the iterator is exhausted, the reader is reset to the start of the stream.
    pub fn all_blocks(&mut self) -> Blocks<'_, R> {
        Blocks {
            reader: self,
            kind: None,
            done: false,
        }
    }

    /// Return an iterator over the blocks of type `kind`
    ///
    /// Blocks of other types are skipped without being decoded. When the iterator is
    /// exhausted, the reader is reset to the start of the stream.
    pub fn blocks_of_kind(&mut self, kind: BlockType) -> Blocks<'_, R> {
        Blocks {
            reader: self,
            kind: Some(kind),
            done: false,
        }
    }

    /// Return an iterator over the blocks of type `T`
    ///
    /// ```rust
    /// use pcapng_decode::pcapng::*;
    /// use std::fs::File;
    ///
    /// # let path = "assets/sample-le.pcapng";
    /// let file = File::open(path).unwrap();
    /// let mut reader = PcapNGReader::with_default_capacity(file).unwrap();
    /// for idb in reader.blocks_of_type::<InterfaceDescriptionBlock>() {
    ///     let idb = idb.unwrap();
    ///     println!("interface {:?}, linktype {}", idb.name, idb.linktype);
    /// }
    /// ```
    pub fn blocks_of_type<T: PcapNGBlock>(&mut self) -> BlocksOfType<'_, R, T> {
        BlocksOfType {
            inner: self.blocks_of_kind(T::BLOCK_TYPE),
            _marker: PhantomData,
        }
    }
}

/// Iterator over the blocks of a [`PcapNGReader`]
///
/// See [`PcapNGReader::all_blocks`] and [`PcapNGReader::blocks_of_kind`].
pub struct Blocks<'r, R>
where
    R: Read + Seek,
{
    reader: &'r mut PcapNGReader<R>,
    kind: Option<BlockType>,
    done: bool,
}

impl<'r, R> Iterator for Blocks<'r, R>
where
    R: Read + Seek,
{
    type Item = Result<Block, PcapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let res = match self.kind {
            Some(kind) => self.reader.read_next_block_of_kind(kind),
            None => self.reader.read_next_block(),
        };
        match res {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                self.reader.reset().err().map(Err)
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'r, R> FusedIterator for Blocks<'r, R> where R: Read + Seek {}

/// Iterator over the blocks of one type of a [`PcapNGReader`]
///
/// See [`PcapNGReader::blocks_of_type`].
pub struct BlocksOfType<'r, R, T>
where
    R: Read + Seek,
{
    inner: Blocks<'r, R>,
    _marker: PhantomData<T>,
}

impl<'r, R, T> Iterator for BlocksOfType<'r, R, T>
where
    R: Read + Seek,
    T: PcapNGBlock,
{
    type Item = Result<T, PcapError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(block) => {
                    if let Some(b) = T::from_block(block) {
                        return Some(Ok(b));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<'r, R, T> FusedIterator for BlocksOfType<'r, R, T>
where
    R: Read + Seek,
    T: PcapNGBlock,
{
}
