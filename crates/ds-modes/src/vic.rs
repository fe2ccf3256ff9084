use std::sync::OnceLock;

use crate::{PixelResolution, Result, TableError};

/// One row of the VIC table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VicMapEntry {
    pub vic: u8,
    pub resolution: PixelResolution,
}

const fn e(vic: u8, resolution: PixelResolution) -> VicMapEntry {
    VicMapEntry { vic, resolution }
}

/// CEA-861 VICs with a pixel-resolution bucket, in declaration order.
///
/// VICs without a bucket (640x480, the 64:27 1680x720/2560x1080 family) are absent. The order
/// is significant: [`vic_for_resolution`] returns the first VIC declared for a bucket.
pub static VIC_TABLE: [VicMapEntry; 87] = {
    use PixelResolution::*;
    [
        e(2, Res720x480),
        e(3, Res720x480),
        e(4, Res1280x720),
        e(5, Res1920x1080),
        e(6, Res720x480),
        e(7, Res720x480),
        e(8, Res720x480),
        e(9, Res720x480),
        e(10, Res720x480),
        e(11, Res720x480),
        e(12, Res720x480),
        e(13, Res720x480),
        e(14, Res720x480),
        e(15, Res720x480),
        e(16, Res1920x1080),
        e(17, Res720x576),
        e(18, Res720x576),
        e(19, Res1280x720),
        e(20, Res1920x1080),
        e(21, Res720x576),
        e(22, Res720x576),
        e(23, Res720x576),
        e(24, Res720x576),
        e(25, Res720x576),
        e(26, Res720x576),
        e(27, Res720x576),
        e(28, Res720x576),
        e(29, Res720x576),
        e(30, Res720x576),
        e(31, Res1920x1080),
        e(32, Res1920x1080),
        e(33, Res1920x1080),
        e(34, Res1920x1080),
        e(35, Res720x480),
        e(36, Res720x480),
        e(37, Res720x576),
        e(38, Res720x576),
        e(39, Res1920x1080),
        e(40, Res1920x1080),
        e(41, Res1280x720),
        e(42, Res720x576),
        e(43, Res720x576),
        e(44, Res720x576),
        e(45, Res720x576),
        e(46, Res1920x1080),
        e(47, Res1280x720),
        e(48, Res720x480),
        e(49, Res720x480),
        e(50, Res720x480),
        e(51, Res720x480),
        e(52, Res720x576),
        e(53, Res720x576),
        e(54, Res720x576),
        e(55, Res720x576),
        e(56, Res720x480),
        e(57, Res720x480),
        e(58, Res720x480),
        e(59, Res720x480),
        e(60, Res1280x720),
        e(61, Res1280x720),
        e(62, Res1280x720),
        e(63, Res1920x1080),
        e(64, Res1920x1080),
        e(65, Res1280x720),
        e(66, Res1280x720),
        e(67, Res1280x720),
        e(68, Res1280x720),
        e(69, Res1280x720),
        e(70, Res1280x720),
        e(71, Res1280x720),
        e(72, Res1920x1080),
        e(73, Res1920x1080),
        e(74, Res1920x1080),
        e(75, Res1920x1080),
        e(76, Res1920x1080),
        e(77, Res1920x1080),
        e(78, Res1920x1080),
        e(93, Res3840x2160),
        e(94, Res3840x2160),
        e(95, Res3840x2160),
        e(96, Res3840x2160),
        e(97, Res3840x2160),
        e(98, Res4096x2160),
        e(99, Res4096x2160),
        e(100, Res4096x2160),
        e(101, Res4096x2160),
        e(102, Res4096x2160),
    ]
};

/// A validated VIC table.
///
/// Duplicate rows that agree on the bucket are collapsed; rows that disagree are a
/// [`TableError::ConflictingVic`].
#[derive(Debug, Clone)]
pub struct VicTable {
    entries: Vec<VicMapEntry>,
}

impl VicTable {
    /// Build a table, failing on the first conflicting duplicate.
    pub fn from_entries(entries: &[VicMapEntry]) -> Result<Self> {
        let mut out: Vec<VicMapEntry> = Vec::with_capacity(entries.len());
        for &entry in entries {
            if let Some(prev) = out.iter().find(|p| p.vic == entry.vic) {
                if prev.resolution != entry.resolution {
                    return Err(TableError::ConflictingVic {
                        vic: entry.vic,
                        first: prev.resolution,
                        second: entry.resolution,
                    });
                }
                continue;
            }
            out.push(entry);
        }
        Ok(Self { entries: out })
    }

    /// Build a table, dropping conflicting duplicates. The first declaration wins.
    pub fn from_entries_lossy(entries: &[VicMapEntry]) -> Self {
        let mut out: Vec<VicMapEntry> = Vec::with_capacity(entries.len());
        for &entry in entries {
            match out.iter().find(|p| p.vic == entry.vic) {
                Some(prev) if prev.resolution != entry.resolution => {
                    tracing::warn!(
                        vic = entry.vic,
                        kept = ?prev.resolution,
                        dropped = ?entry.resolution,
                        "ignoring conflicting VIC table entry"
                    );
                }
                Some(_) => {}
                None => out.push(entry),
            }
        }
        Self { entries: out }
    }

    pub fn entries(&self) -> &[VicMapEntry] {
        &self.entries
    }

    pub fn resolution_for_vic(&self, vic: u8) -> Option<PixelResolution> {
        self.entries
            .iter()
            .find(|e| e.vic == vic)
            .map(|e| e.resolution)
    }

    /// First VIC declared for `resolution`.
    ///
    /// Lossy on purpose: a bucket like 1920x1080 is backed by many VICs at different rates and
    /// scan modes, and only the first one is returned. Whether callers should ever see a
    /// different representative is still an open question, so keep first-match semantics.
    pub fn vic_for_resolution(&self, resolution: PixelResolution) -> Option<u8> {
        self.entries
            .iter()
            .find(|e| e.resolution == resolution)
            .map(|e| e.vic)
    }

    /// Every VIC backing `resolution`, in declaration order.
    pub fn vics_for_resolution(&self, resolution: PixelResolution) -> Vec<u8> {
        self.entries
            .iter()
            .filter(|e| e.resolution == resolution)
            .map(|e| e.vic)
            .collect()
    }
}

/// The reference table, validated once on first use.
pub fn vic_table() -> &'static VicTable {
    static TABLE: OnceLock<VicTable> = OnceLock::new();
    TABLE.get_or_init(|| VicTable::from_entries_lossy(&VIC_TABLE))
}

pub fn resolution_for_vic(vic: u8) -> Option<PixelResolution> {
    vic_table().resolution_for_vic(vic)
}

pub fn vic_for_resolution(resolution: PixelResolution) -> Option<u8> {
    vic_table().vic_for_resolution(resolution)
}
