use ds_modes::ResolutionDescriptor;
use serde::{Deserialize, Serialize};

use crate::cea::parse_cea_block;
use crate::date::{current_year, ManufactureDate};
use crate::{
    ParseError, Result, BASE_DESCRIPTOR_OFFSETS, CEA_EXTENSION_TAG, DESCRIPTOR_LEN,
    EDID_BLOCK_SIZE, EDID_HEADER, MAX_MONITOR_NAME_LEN, MONITOR_NAME_TAG,
};

/// What to do with a base block whose checksum does not add up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Reject the blob with [`ParseError::BadChecksum`].
    #[default]
    Strict,
    /// Log and keep decoding. Some panels ship structurally valid EDIDs with a stale checksum.
    ///
    /// Lenient parsing also walks whatever extension blocks are present when byte 0x7E claims
    /// more than were read.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdidOptions {
    pub checksum: ChecksumPolicy,
    /// Year used by the manufacture-date heuristic; the system clock when `None`.
    pub current_year: Option<u16>,
}

impl EdidOptions {
    pub fn lenient() -> Self {
        Self {
            checksum: ChecksumPolicy::Lenient,
            current_year: None,
        }
    }
}

/// HDMI CEC physical address `A.B.C.D`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PhysicalAddress {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
}

impl PhysicalAddress {
    /// Decode from the two address bytes of an HDMI vendor-specific data block.
    pub fn from_bytes(ab: u8, cd: u8) -> Self {
        Self {
            a: ab >> 4,
            b: ab & 0x0F,
            c: cd >> 4,
            d: cd & 0x0F,
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [
            (self.a & 0x0F) << 4 | (self.b & 0x0F),
            (self.c & 0x0F) << 4 | (self.d & 0x0F),
        ]
    }
}

impl std::fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}.{:x}.{:x}.{:x}", self.a, self.b, self.c, self.d)
    }
}

/// Identity of an attached display as decoded from its EDID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayDescriptor {
    /// Three-letter PNP id, e.g. `"SAM"`.
    pub manufacturer_id: String,
    pub product_code: u16,
    pub serial_number: u32,
    pub manufacture_date: Option<ManufactureDate>,
    pub version: u8,
    pub revision: u8,
    /// Extension block count claimed by byte 0x7E.
    pub extension_count: u8,
    pub monitor_name: String,
    pub physical_address: Option<PhysicalAddress>,
    pub is_repeater: bool,
    /// An HDMI vendor-specific data block was found.
    pub is_hdmi: bool,
    /// Not decoded from the EDID: filled in by the port layer from the modes the display
    /// firmware reports.
    pub supported_resolutions: Vec<ResolutionDescriptor>,
}

/// Wrapping sum of a block. Zero for a block with a correct checksum byte.
pub fn block_checksum(block: &[u8]) -> u8 {
    block.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Check length, header magic and base-block checksum without decoding anything.
pub fn validate_edid(bytes: &[u8]) -> Result<()> {
    let base = base_block(bytes)?;
    match block_checksum(base) {
        0 => Ok(()),
        sum => Err(ParseError::BadChecksum { block: 0, sum }),
    }
}

fn base_block(bytes: &[u8]) -> Result<&[u8]> {
    let base = bytes
        .get(..EDID_BLOCK_SIZE)
        .ok_or(ParseError::TooShort { len: bytes.len() })?;
    if base[..8] != EDID_HEADER {
        return Err(ParseError::BadHeader);
    }
    Ok(base)
}

/// Parse with strict checksum checking and the system clock.
pub fn parse_edid(bytes: &[u8]) -> Result<DisplayDescriptor> {
    parse_edid_with(bytes, &EdidOptions::default())
}

pub fn parse_edid_with(bytes: &[u8], options: &EdidOptions) -> Result<DisplayDescriptor> {
    let base = base_block(bytes)?;

    let sum = block_checksum(base);
    if sum != 0 {
        match options.checksum {
            ChecksumPolicy::Strict => return Err(ParseError::BadChecksum { block: 0, sum }),
            ChecksumPolicy::Lenient => {
                tracing::warn!(sum, "EDID base block checksum mismatch, decoding anyway");
            }
        }
    }

    let year = options.current_year.unwrap_or_else(current_year);
    let mut out = DisplayDescriptor {
        manufacturer_id: decode_manufacturer_id(base[0x08], base[0x09]),
        product_code: u16::from_le_bytes([base[0x0A], base[0x0B]]),
        serial_number: u32::from_le_bytes([base[0x0C], base[0x0D], base[0x0E], base[0x0F]]),
        manufacture_date: ManufactureDate::decode(base[0x10], base[0x11], year),
        version: base[0x12],
        revision: base[0x13],
        extension_count: base[0x7E],
        ..Default::default()
    };

    let mut name = MonitorName::default();
    for off in BASE_DESCRIPTOR_OFFSETS {
        name.feed(&base[off..off + DESCRIPTOR_LEN]);
    }

    let present = bytes.len() / EDID_BLOCK_SIZE - 1;
    if bytes.len() % EDID_BLOCK_SIZE != 0 {
        tracing::debug!(len = bytes.len(), "ignoring trailing partial EDID block");
    }
    if usize::from(out.extension_count) > present {
        match options.checksum {
            ChecksumPolicy::Strict => {
                return Err(ParseError::ExtensionCountMismatch {
                    declared: out.extension_count,
                    present,
                })
            }
            ChecksumPolicy::Lenient => tracing::warn!(
                declared = out.extension_count,
                present,
                "EDID is missing extension blocks"
            ),
        }
    }

    for index in 1..=present {
        let block = &bytes[index * EDID_BLOCK_SIZE..(index + 1) * EDID_BLOCK_SIZE];
        if block[0] != CEA_EXTENSION_TAG {
            tracing::debug!(index, tag = block[0], "skipping non-CEA extension block");
            continue;
        }
        parse_cea_block(index, block, &mut out, &mut name)?;
    }

    out.monitor_name = name.finish();
    Ok(out)
}

fn decode_manufacturer_id(hi: u8, lo: u8) -> String {
    let packed = u16::from_be_bytes([hi, lo]);
    [10u16, 5, 0]
        .iter()
        .map(|shift| match (packed >> shift) & 0x1F {
            v @ 1..=26 => char::from(b'A' + v as u8 - 1),
            _ => '?',
        })
        .collect()
}

/// Accumulates monitor-name fragments across descriptor slots until a newline is seen.
///
/// Names longer than one slot are split over consecutive `0xFC` descriptors. NUL bytes are
/// skipped, `0x0A` ends the name, and the result is capped at [`MAX_MONITOR_NAME_LEN`].
#[derive(Debug, Default)]
pub(crate) struct MonitorName {
    buf: Vec<u8>,
    terminated: bool,
}

impl MonitorName {
    pub(crate) fn feed(&mut self, desc: &[u8]) {
        if self.terminated || !is_monitor_name(desc) {
            return;
        }
        for &b in &desc[5..DESCRIPTOR_LEN] {
            match b {
                b'\n' => {
                    self.terminated = true;
                    return;
                }
                0 => {}
                _ if self.buf.len() < MAX_MONITOR_NAME_LEN => self.buf.push(b),
                _ => {}
            }
        }
    }

    /// Non-ASCII bytes become `?`, so the string stays within the byte cap.
    pub(crate) fn finish(self) -> String {
        let s: String = self
            .buf
            .iter()
            .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
            .collect();
        s.trim_end().to_string()
    }
}

// Stricter than a tag-only check: timing descriptors with a nonzero pixel clock are never names.
fn is_monitor_name(desc: &[u8]) -> bool {
    desc.len() == DESCRIPTOR_LEN && desc[0] == 0 && desc[1] == 0 && desc[3] == MONITOR_NAME_TAG
}
