//! CEA-861 extension block walking.
//!
//! Layout of a revision 3 block:
//!
//! ```text
//! 0      tag (0x02)
//! 1      revision
//! 2      offset d of the first detailed timing descriptor (0: none, and no data blocks)
//! 3      flags / native DTD count
//! 4..d   data block collection: [tag:3 | len:5] header followed by `len` payload bytes
//! d..127 18-byte descriptors
//! 127    checksum
//! ```

use crate::parse::MonitorName;
use crate::{
    DisplayDescriptor, ParseError, PhysicalAddress, Result, DESCRIPTOR_LEN, EDID_BLOCK_SIZE,
    HDMI_OUI, VENDOR_SPECIFIC_TAG,
};

const DATA_BLOCKS_START: usize = 4;
const CHECKSUM_OFFSET: usize = EDID_BLOCK_SIZE - 1;

pub(crate) fn parse_cea_block(
    index: usize,
    block: &[u8],
    out: &mut DisplayDescriptor,
    name: &mut MonitorName,
) -> Result<()> {
    debug_assert_eq!(block.len(), EDID_BLOCK_SIZE);

    let revision = block[1];
    if revision != 3 {
        tracing::debug!(index, revision, "skipping CEA block with unsupported revision");
        return Ok(());
    }

    let dtd_offset = usize::from(block[2]);
    if dtd_offset == 0 {
        return Ok(());
    }
    if !(DATA_BLOCKS_START..=CHECKSUM_OFFSET).contains(&dtd_offset) {
        return Err(ParseError::Truncated {
            block: index,
            offset: 2,
        });
    }

    let mut pos = DATA_BLOCKS_START;
    while pos < dtd_offset {
        let header = block[pos];
        let tag = header >> 5;
        let len = usize::from(header & 0x1F);
        let end = pos + 1 + len;
        if end > dtd_offset {
            return Err(ParseError::Truncated {
                block: index,
                offset: pos,
            });
        }
        if tag == VENDOR_SPECIFIC_TAG {
            parse_vendor_block(index, pos, &block[pos + 1..end], out)?;
        }
        pos = end;
    }

    let mut off = dtd_offset;
    while off + DESCRIPTOR_LEN <= CHECKSUM_OFFSET {
        name.feed(&block[off..off + DESCRIPTOR_LEN]);
        off += DESCRIPTOR_LEN;
    }
    Ok(())
}

fn parse_vendor_block(
    index: usize,
    pos: usize,
    payload: &[u8],
    out: &mut DisplayDescriptor,
) -> Result<()> {
    let truncated = ParseError::Truncated {
        block: index,
        offset: pos,
    };
    let oui = payload.get(..3).ok_or(truncated.clone())?;
    let oui = u32::from_le_bytes([oui[0], oui[1], oui[2], 0]);
    if oui != HDMI_OUI {
        tracing::debug!(index, oui = format_args!("{oui:06x}"), "ignoring vendor block");
        return Ok(());
    }
    let addr = payload.get(3..5).ok_or(truncated)?;
    let pa = PhysicalAddress::from_bytes(addr[0], addr[1]);
    out.physical_address = Some(pa);
    out.is_repeater = pa.b != 0;
    out.is_hdmi = true;
    Ok(())
}
