//! # PCAPNG decoder
//!
//! This crate decodes capture files in the PCAP Next Generation (pcapng) format.
//!
//! A pcapng file is a sequence of self-delimiting blocks. The decoder supports the seven
//! standard block types (section header, interface description, interface statistics,
//! enhanced packet, simple packet, name resolution and the obsolete packet block), their
//! options, and the conversion of packet timestamps to 100 ns ticks.
//!
//! Decoded blocks own their data, so they can be kept after the reader has moved on.
//!
//! # Example: streaming decoder
//!
//! The following code shows how to walk a file using a
//! [PcapNGReader](pcapng/struct.PcapNGReader.html).
//!
//! ```rust
//! use pcapng_decode::pcapng::*;
//! use std::fs::File;
//!
//! # let path = "assets/sample-le.pcapng";
//! let file = File::open(path).unwrap();
//! let mut reader = PcapNGReader::with_default_capacity(file).expect("PcapNGReader");
//! let mut num_blocks = 0;
//! for block in reader.all_blocks() {
//!     match block {
//!         Ok(_block) => num_blocks += 1,
//!         Err(e) => panic!("error while reading: {}", e),
//!     }
//! }
//! println!("num_blocks: {}", num_blocks);
//! ```
//!
//! Only the blocks of one type can be decoded, in which case other blocks are skipped
//! without being decoded:
//!
//! ```rust
//! use pcapng_decode::pcapng::*;
//! use std::fs::File;
//!
//! # let path = "assets/sample-le.pcapng";
//! let file = File::open(path).unwrap();
//! let mut reader = PcapNGReader::with_default_capacity(file).expect("PcapNGReader");
//! for epb in reader.blocks_of_type::<EnhancedPacketBlock>() {
//!     let epb = epb.expect("could not decode block");
//!     println!("{} bytes at tick {}", epb.captured_length, epb.timestamp_ticks());
//! }
//! ```
//!
//! See [PcapNGReader](pcapng/struct.PcapNGReader.html) for details on the reader behavior,
//! and the [pcapng](pcapng/index.html) module for decoding blocks from byte slices.

mod endianness;
mod error;
mod linktype;
pub use error::*;
pub use linktype::*;

pub mod pcapng;
pub use pcapng::*;
