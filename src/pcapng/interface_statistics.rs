use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapError;

use super::*;

const ISB_STARTTIME: OptionCode = OptionCode(2);
const ISB_ENDTIME: OptionCode = OptionCode(3);
const ISB_IFRECV: OptionCode = OptionCode(4);
const ISB_IFDROP: OptionCode = OptionCode(5);
const ISB_FILTERACCEPT: OptionCode = OptionCode(6);
const ISB_OSDROP: OptionCode = OptionCode(7);
const ISB_USRDELIV: OptionCode = OptionCode(8);

/// The Interface Statistics Block (ISB) contains the capture statistics for a given
/// interface.
///
/// All counters are optional, and refer to the interval between `start_time` and
/// `end_time` when present.
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceStatisticsBlock {
    pub total_length: u32,
    pub interface_id: u32,
    pub timestamp: i64,
    pub comment: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub packets_received: Option<i64>,
    pub packets_dropped: Option<i64>,
    pub packets_filter_accept: Option<i64>,
    pub packets_os_dropped: Option<i64>,
    pub total_packets_sent: Option<i64>,
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for InterfaceStatisticsBlock {
    const HDR_SZ: usize = 24;
    const MAGIC: BlockType = BlockType::InterfaceStatistics;

    fn inner_parse(header: BlockHeader, i: &[u8]) -> IResult<&[u8], Self, PcapError> {
        let (i, interface_id) = En::parse_u32(i)?;
        let (i, timestamp) = En::parse_i64(i)?;
        let mut block = InterfaceStatisticsBlock {
            total_length: header.total_length,
            interface_id,
            timestamp,
            comment: None,
            start_time: None,
            end_time: None,
            packets_received: None,
            packets_dropped: None,
            packets_filter_accept: None,
            packets_os_dropped: None,
            total_packets_sent: None,
        };
        let (i, comment) = opt_parse_options::<En, _>(
            i,
            header.total_length as usize,
            <Self as PcapNGBlockParser<En>>::HDR_SZ,
            |opt| {
                let field = match opt.code {
                    ISB_STARTTIME => &mut block.start_time,
                    ISB_ENDTIME => &mut block.end_time,
                    ISB_IFRECV => &mut block.packets_received,
                    ISB_IFDROP => &mut block.packets_dropped,
                    ISB_FILTERACCEPT => &mut block.packets_filter_accept,
                    ISB_OSDROP => &mut block.packets_os_dropped,
                    ISB_USRDELIV => &mut block.total_packets_sent,
                    _ => return false,
                };
                match opt.as_i64::<En>() {
                    Some(v) => {
                        *field = Some(v);
                        true
                    }
                    None => false,
                }
            },
        )?;
        block.comment = comment;
        let (i, ()) = parse_closing_field::<En>(i, header.total_length)?;
        Ok((i, block))
    }
}

/// Parse an Interface Statistics Block (little-endian)
#[inline]
pub fn parse_interfacestatisticsblock_le(
    i: &[u8],
) -> IResult<&[u8], InterfaceStatisticsBlock, PcapError> {
    ng_block_parser::<InterfaceStatisticsBlock, PcapLE>(i)
}

/// Parse an Interface Statistics Block (big-endian)
#[inline]
pub fn parse_interfacestatisticsblock_be(
    i: &[u8],
) -> IResult<&[u8], InterfaceStatisticsBlock, PcapError> {
    ng_block_parser::<InterfaceStatisticsBlock, PcapBE>(i)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn isb_with_counters() {
        let data = hex!(
            "05 00 00 00 3c 00 00 00
             01 00 00 00 10 00 00 00 00 00 00 00
             04 00 08 00 64 00 00 00 00 00 00 00
             05 00 08 00 02 00 00 00 00 00 00 00
             01 00 04 00 64 6f 6e 65
             00 00 00 00
             3c 00 00 00"
        );
        let (rem, isb) = parse_interfacestatisticsblock_le(&data).unwrap();
        assert!(rem.is_empty());
        assert_eq!(isb.interface_id, 1);
        assert_eq!(isb.timestamp, 16);
        assert_eq!(isb.packets_received, Some(100));
        assert_eq!(isb.packets_dropped, Some(2));
        assert_eq!(isb.start_time, None);
        assert_eq!(isb.total_packets_sent, None);
        assert_eq!(isb.comment.as_deref(), Some("done"));
    }

    #[test]
    fn isb_short_counter_ignored() {
        let data = hex!(
            "05 00 00 00 24 00 00 00
             00 00 00 00 00 00 00 00 00 00 00 00
             04 00 04 00 64 00 00 00
             00 00 00 00
             24 00 00 00"
        );
        let (_, isb) = parse_interfacestatisticsblock_le(&data).unwrap();
        assert_eq!(isb.packets_received, None);
    }
}
