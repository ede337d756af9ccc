use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

const SHB_HARDWARE: OptionCode = OptionCode(2);
const SHB_OS: OptionCode = OptionCode(3);
const SHB_USERAPPL: OptionCode = OptionCode(4);

/// The Section Header Block (SHB) identifies the
/// beginning of a section of the capture capture file.
///
/// The
/// Section Header Block does not contain data but it rather identifies a
/// list of blocks (interfaces, packets) that are logically correlated.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionHeaderBlock {
    pub total_length: u32,
    /// Byte-order magic
    pub bom: u32,
    pub major_version: u16,
    pub minor_version: u16,
    /// Length of the section in bytes, or -1 if unknown
    pub section_len: i64,
    pub comment: Option<String>,
    pub hardware: Option<String>,
    pub os: Option<String>,
    pub user_application: Option<String>,
}

impl SectionHeaderBlock {
    /// Returns true if the byte-order magic was read as expected, meaning the section
    /// uses the byte order this block was decoded with
    pub fn byte_order_matches(&self) -> bool {
        self.bom == BOM_MAGIC
    }

    /// Return the section length, or `None` if it is not specified
    pub fn section_length(&self) -> Option<u64> {
        if self.section_len < 0 {
            None
        } else {
            Some(self.section_len as u64)
        }
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for SectionHeaderBlock {
    const HDR_SZ: usize = 28;
    const MAGIC: BlockType = BlockType::SectionHeader;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let (i, bom) = En::parse_u32(i)?;
        let (i, major_version) = En::parse_u16(i)?;
        let (i, minor_version) = En::parse_u16(i)?;
        let (i, section_len) = En::parse_i64(i)?;
        let mut hardware = None;
        let mut os = None;
        let mut user_application = None;
        let (i, comment) = opt_parse_options::<En, _>(
            i,
            header.total_length as usize,
            <Self as PcapNGBlockParser<En>>::HDR_SZ,
            |opt| {
                match opt.code {
                    SHB_HARDWARE => hardware = Some(opt.as_string()),
                    SHB_OS => os = Some(opt.as_string()),
                    SHB_USERAPPL => user_application = Some(opt.as_string()),
                    _ => return false,
                }
                true
            },
        )?;
        let (i, ()) = parse_closing_field::<En>(i, header.total_length)?;
        let block = SectionHeaderBlock {
            total_length: header.total_length,
            bom,
            major_version,
            minor_version,
            section_len,
            comment,
            hardware,
            os,
            user_application,
        };
        Ok((i, block))
    }
}

/// Parse a Section Header Block (little endian)
pub fn parse_sectionheaderblock_le(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapError> {
    ng_block_parser::<SectionHeaderBlock, PcapLE>(i)
}

/// Parse a Section Header Block (big endian)
pub fn parse_sectionheaderblock_be(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapError> {
    ng_block_parser::<SectionHeaderBlock, PcapBE>(i)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn shb_with_options() {
        let data = hex!(
            "0a 0d 0d 0a 3c 00 00 00
             4d 3c 2b 1a 01 00 00 00
             ff ff ff ff ff ff ff ff
             02 00 03 00 78 38 36 00
             03 00 05 00 4c 69 6e 75 78 00 00 00
             04 00 04 00 74 65 73 74
             00 00 00 00
             3c 00 00 00"
        );
        let (rem, shb) = parse_sectionheaderblock_le(&data).unwrap();
        assert!(rem.is_empty());
        assert!(shb.byte_order_matches());
        assert_eq!(shb.major_version, 1);
        assert_eq!(shb.minor_version, 0);
        assert_eq!(shb.section_len, -1);
        assert_eq!(shb.section_length(), None);
        assert_eq!(shb.hardware.as_deref(), Some("x86"));
        assert_eq!(shb.os.as_deref(), Some("Linux"));
        assert_eq!(shb.user_application.as_deref(), Some("test"));
        assert_eq!(shb.comment, None);
    }

    #[test]
    fn shb_big_endian() {
        let data = hex!(
            "0a 0d 0d 0a 00 00 00 1c
             1a 2b 3c 4d 00 01 00 00
             00 00 00 00 00 00 01 00
             00 00 00 1c"
        );
        let (rem, shb) = parse_sectionheaderblock_be(&data).unwrap();
        assert!(rem.is_empty());
        assert!(shb.byte_order_matches());
        assert_eq!(shb.section_length(), Some(256));
        // same bytes, decoded with the wrong byte order
        let res = parse_sectionheaderblock_le(&data);
        assert!(res.is_err());
    }
}
