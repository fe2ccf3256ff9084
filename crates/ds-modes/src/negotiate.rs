use serde::Serialize;

use crate::{resolution_for_vic, ResolutionDescriptor, Result, TableError, RESOLUTIONS};

/// Vendor HDMI mode code as understood by the display firmware (`HDMI_CEA_RES_T` on VideoCore).
///
/// On this platform the CEA codes coincide numerically with CEA-861 VICs, but the two are kept as
/// separate types: the firmware may report codes the VIC table knows nothing about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HdmiMode(pub u32);

impl HdmiMode {
    pub const CEA_480P60: Self = Self(2);
    pub const CEA_720P60: Self = Self(4);
    pub const CEA_1080I60: Self = Self(5);
    pub const CEA_1080P60: Self = Self(16);
    pub const CEA_576P50: Self = Self(17);
    pub const CEA_720P50: Self = Self(19);
    pub const CEA_1080I50: Self = Self(20);
    pub const CEA_1080P50: Self = Self(31);
    pub const CEA_1080P24: Self = Self(32);
    pub const CEA_1080P25: Self = Self(33);
    pub const CEA_1080P30: Self = Self(34);
}

impl std::fmt::Display for HdmiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeMapEntry {
    pub name: &'static str,
    pub mode: HdmiMode,
}

const fn m(name: &'static str, mode: HdmiMode) -> ModeMapEntry {
    ModeMapEntry { name, mode }
}

/// Platform resolution name to vendor mode code.
pub static RESOLUTION_MAP: [ModeMapEntry; 11] = [
    m("480p", HdmiMode::CEA_480P60),
    m("576p50", HdmiMode::CEA_576P50),
    m("720p", HdmiMode::CEA_720P60),
    m("720p50", HdmiMode::CEA_720P50),
    m("1080i", HdmiMode::CEA_1080I60),
    m("1080i50", HdmiMode::CEA_1080I50),
    m("1080p24", HdmiMode::CEA_1080P24),
    m("1080p25", HdmiMode::CEA_1080P25),
    m("1080p30", HdmiMode::CEA_1080P30),
    m("1080p50", HdmiMode::CEA_1080P50),
    m("1080p60", HdmiMode::CEA_1080P60),
];

/// Resolution requested when a caller asks for a name the map does not know.
pub const FALLBACK_RESOLUTION: &str = "720p";

/// Maps between platform resolution names and vendor mode codes.
///
/// Stateless apart from the tables it borrows; cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct Negotiator {
    resolutions: &'static [ResolutionDescriptor],
    modes: &'static [ModeMapEntry],
    fallback: HdmiMode,
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::reference()
    }
}

impl Negotiator {
    /// The platform tables with `"720p"` as the fallback.
    pub const fn reference() -> Self {
        Self {
            resolutions: &RESOLUTIONS,
            modes: &RESOLUTION_MAP,
            fallback: HdmiMode::CEA_720P60,
        }
    }

    /// Validate a pair of tables and build a negotiator falling back to `fallback`.
    pub fn new(
        resolutions: &'static [ResolutionDescriptor],
        modes: &'static [ModeMapEntry],
        fallback: &str,
    ) -> Result<Self> {
        for (i, r) in resolutions.iter().enumerate() {
            if resolutions[..i].iter().any(|p| p.name == r.name) {
                return Err(TableError::DuplicateName(r.name));
            }
        }
        for (i, entry) in modes.iter().enumerate() {
            if modes[..i].iter().any(|p| p.name == entry.name) {
                return Err(TableError::DuplicateName(entry.name));
            }
            if modes[..i].iter().any(|p| p.mode == entry.mode) {
                return Err(TableError::DuplicateMode { mode: entry.mode });
            }
            if !resolutions.iter().any(|r| r.name == entry.name) {
                return Err(TableError::UnknownName(entry.name.to_string()));
            }
        }
        let fallback = modes
            .iter()
            .find(|e| e.name == fallback)
            .map(|e| e.mode)
            .ok_or_else(|| TableError::UnknownName(fallback.to_string()))?;
        Ok(Self {
            resolutions,
            modes,
            fallback,
        })
    }

    /// The reference tables with a different fallback resolution.
    pub fn with_fallback(fallback: &str) -> Result<Self> {
        Self::new(&RESOLUTIONS, &RESOLUTION_MAP, fallback)
    }

    pub fn fallback_mode(&self) -> HdmiMode {
        self.fallback
    }

    pub fn resolutions(&self) -> &'static [ResolutionDescriptor] {
        self.resolutions
    }

    pub fn find_resolution(&self, name: &str) -> Option<&'static ResolutionDescriptor> {
        self.resolutions.iter().find(|r| r.name == name)
    }

    /// Vendor mode for `name`. Never fails: unknown names get the fallback mode so the sink
    /// always receives some signal.
    pub fn mode_for_name(&self, name: &str) -> HdmiMode {
        match self.modes.iter().find(|e| e.name == name) {
            Some(entry) => entry.mode,
            None => {
                tracing::warn!(
                    name,
                    fallback = %self.fallback,
                    "unknown resolution name, requesting fallback mode"
                );
                self.fallback
            }
        }
    }

    pub fn name_for_mode(&self, mode: HdmiMode) -> Option<&'static str> {
        self.modes.iter().find(|e| e.mode == mode).map(|e| e.name)
    }

    /// Resolve a vendor-reported mode to a descriptor.
    ///
    /// The name map is consulted first. Codes it does not know are treated as VICs and matched
    /// by pixel geometry against the resolution table, taking the first descriptor with the same
    /// bucket.
    pub fn resolution_for_mode(&self, mode: HdmiMode) -> Option<ResolutionDescriptor> {
        if let Some(r) = self.name_for_mode(mode).and_then(|n| self.find_resolution(n)) {
            return Some(*r);
        }
        let vic = u8::try_from(mode.0).ok()?;
        let bucket = resolution_for_vic(vic)?;
        let r = self
            .resolutions
            .iter()
            .find(|r| r.pixel_resolution == bucket)?;
        tracing::debug!(%mode, name = r.name, "mode resolved by pixel geometry");
        Some(*r)
    }

    /// Resolutions whose vendor mode appears in `vendor_modes`, in resolution-table order.
    pub fn enumerate_supported(&self, vendor_modes: &[HdmiMode]) -> Vec<ResolutionDescriptor> {
        self.resolutions
            .iter()
            .filter(|r| {
                self.modes
                    .iter()
                    .find(|e| e.name == r.name)
                    .is_some_and(|e| vendor_modes.contains(&e.mode))
            })
            .copied()
            .collect()
    }
}

pub fn mode_for_name(name: &str) -> HdmiMode {
    Negotiator::reference().mode_for_name(name)
}

pub fn name_for_mode(mode: HdmiMode) -> Option<&'static str> {
    Negotiator::reference().name_for_mode(mode)
}

pub fn enumerate_supported(vendor_modes: &[HdmiMode]) -> Vec<ResolutionDescriptor> {
    Negotiator::reference().enumerate_supported(vendor_modes)
}
