use crate::{
    PhysicalAddress, BASE_DESCRIPTOR_OFFSETS, CEA_EXTENSION_TAG, DESCRIPTOR_LEN, EDID_BLOCK_SIZE,
    EDID_HEADER, HDMI_OUI, MONITOR_NAME_TAG, VENDOR_SPECIFIC_TAG,
};

/// CEA-861 1920x1080@60 detailed timing (148.5 MHz).
pub const PREFERRED_1080P60_DTD: [u8; DESCRIPTOR_LEN] = [
    0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0x20, 0xC2, 0x31, 0x00,
    0x00, 0x1E,
];

// Display descriptor with the "dummy" tag.
const DUMMY_DESCRIPTOR: [u8; DESCRIPTOR_LEN] = {
    let mut d = [0u8; DESCRIPTOR_LEN];
    d[3] = 0x10;
    d
};

/// Monitor-name descriptor carrying `fragment` (at most 13 bytes, longer input is cut).
///
/// A fragment containing a newline is padded with spaces as the EDID standard asks; a fragment
/// without one is the first half of a split name and is padded with NULs.
pub fn name_descriptor(fragment: &[u8]) -> [u8; DESCRIPTOR_LEN] {
    let mut d = [0u8; DESCRIPTOR_LEN];
    d[3] = MONITOR_NAME_TAG;
    let text = &fragment[..fragment.len().min(13)];
    d[5..5 + text.len()].copy_from_slice(text);
    if text.contains(&b'\n') {
        d[5 + text.len()..].fill(b' ');
    }
    d
}

fn seal(block: &mut [u8]) {
    let sum = crate::block_checksum(&block[..EDID_BLOCK_SIZE - 1]);
    block[EDID_BLOCK_SIZE - 1] = sum.wrapping_neg();
}

/// Builds well-formed EDID blobs with valid checksums.
///
/// Defaults: EDID 1.3, manufacturer `RPI`, a 1080p60 preferred timing in slot 0 and dummy
/// descriptors elsewhere.
#[derive(Debug, Clone)]
pub struct EdidBuilder {
    base: [u8; EDID_BLOCK_SIZE],
    extensions: Vec<[u8; EDID_BLOCK_SIZE]>,
    corrupt_checksum: bool,
}

impl Default for EdidBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EdidBuilder {
    pub fn new() -> Self {
        let mut base = [0u8; EDID_BLOCK_SIZE];
        base[..8].copy_from_slice(&EDID_HEADER);
        base[0x12] = 1;
        base[0x13] = 3;
        let mut b = Self {
            base,
            extensions: Vec::new(),
            corrupt_checksum: false,
        };
        b = b.manufacturer("RPI");
        b = b.descriptor(0, PREFERRED_1080P60_DTD);
        for slot in 1..4 {
            b = b.descriptor(slot, DUMMY_DESCRIPTOR);
        }
        b
    }

    /// Three uppercase letters; anything else is encoded as zero bits.
    pub fn manufacturer(mut self, id: &str) -> Self {
        let mut packed = 0u16;
        for (i, c) in id.bytes().take(3).enumerate() {
            let v = if c.is_ascii_uppercase() {
                u16::from(c - b'A' + 1)
            } else {
                0
            };
            packed |= v << (10 - 5 * i);
        }
        self.base[0x08..0x0A].copy_from_slice(&packed.to_be_bytes());
        self
    }

    pub fn product_code(mut self, code: u16) -> Self {
        self.base[0x0A..0x0C].copy_from_slice(&code.to_le_bytes());
        self
    }

    pub fn serial_number(mut self, serial: u32) -> Self {
        self.base[0x0C..0x10].copy_from_slice(&serial.to_le_bytes());
        self
    }

    /// Raw week and year-offset bytes.
    pub fn manufacture(mut self, week: u8, year_offset: u8) -> Self {
        self.base[0x10] = week;
        self.base[0x11] = year_offset;
        self
    }

    /// Put `desc` into base-block descriptor slot `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` is not in `0..4`.
    pub fn descriptor(mut self, slot: usize, desc: [u8; DESCRIPTOR_LEN]) -> Self {
        let off = BASE_DESCRIPTOR_OFFSETS[slot];
        self.base[off..off + DESCRIPTOR_LEN].copy_from_slice(&desc);
        self
    }

    /// Store `name` in slot 1, spilling into slot 2 when it does not fit with its newline.
    pub fn monitor_name(self, name: &str) -> Self {
        let mut text = name.as_bytes().to_vec();
        text.push(b'\n');
        if text.len() <= 13 {
            return self.descriptor(1, name_descriptor(&text));
        }
        let (head, tail) = text.split_at(13);
        self.descriptor(1, name_descriptor(head))
            .descriptor(2, name_descriptor(tail))
    }

    pub fn extension(mut self, block: [u8; EDID_BLOCK_SIZE]) -> Self {
        self.extensions.push(block);
        self
    }

    /// Leave the base-block checksum one off.
    pub fn corrupt_checksum(mut self) -> Self {
        self.corrupt_checksum = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut base = self.base;
        base[0x7E] = u8::try_from(self.extensions.len()).unwrap_or(u8::MAX);
        seal(&mut base);
        if self.corrupt_checksum {
            base[EDID_BLOCK_SIZE - 1] = base[EDID_BLOCK_SIZE - 1].wrapping_add(1);
        }
        let mut out = base.to_vec();
        for ext in &self.extensions {
            out.extend_from_slice(ext);
        }
        out
    }
}

/// Builds a CEA-861 extension block.
#[derive(Debug, Clone)]
pub struct CeaExtensionBuilder {
    revision: u8,
    data_blocks: Vec<u8>,
    descriptors: Vec<[u8; DESCRIPTOR_LEN]>,
}

impl Default for CeaExtensionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CeaExtensionBuilder {
    pub fn new() -> Self {
        Self {
            revision: 3,
            data_blocks: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    pub fn revision(mut self, revision: u8) -> Self {
        self.revision = revision;
        self
    }

    /// Append a data block. `payload` is cut at 31 bytes.
    pub fn data_block(mut self, tag: u8, payload: &[u8]) -> Self {
        let payload = &payload[..payload.len().min(0x1F)];
        self.data_blocks
            .push((tag & 0x07) << 5 | payload.len() as u8);
        self.data_blocks.extend_from_slice(payload);
        self
    }

    /// Append an HDMI vendor-specific data block with `address`.
    pub fn hdmi_vendor_block(self, address: PhysicalAddress) -> Self {
        let oui = HDMI_OUI.to_le_bytes();
        let [ab, cd] = address.to_bytes();
        self.data_block(VENDOR_SPECIFIC_TAG, &[oui[0], oui[1], oui[2], ab, cd])
    }

    pub fn descriptor(mut self, desc: [u8; DESCRIPTOR_LEN]) -> Self {
        self.descriptors.push(desc);
        self
    }

    /// Assemble the block. Data blocks and descriptors that do not fit are dropped.
    pub fn build(&self) -> [u8; EDID_BLOCK_SIZE] {
        let mut b = [0u8; EDID_BLOCK_SIZE];
        b[0] = CEA_EXTENSION_TAG;
        b[1] = self.revision;
        let data_len = self.data_blocks.len().min(EDID_BLOCK_SIZE - 1 - 4);
        b[4..4 + data_len].copy_from_slice(&self.data_blocks[..data_len]);
        let dtd_offset = 4 + data_len;
        b[2] = dtd_offset as u8;
        let mut off = dtd_offset;
        for desc in &self.descriptors {
            if off + DESCRIPTOR_LEN > EDID_BLOCK_SIZE - 1 {
                break;
            }
            b[off..off + DESCRIPTOR_LEN].copy_from_slice(desc);
            off += DESCRIPTOR_LEN;
        }
        seal(&mut b);
        b
    }
}
