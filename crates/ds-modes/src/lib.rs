//! Video mode tables for the Device Settings HAL.
//!
//! Two tables live here and they are deliberately kept apart:
//!
//! - [`VIC_TABLE`]: CEA-861 Video Identification Codes to a coarse [`PixelResolution`] bucket.
//!   Many-to-one and lossy; only used for advisory reporting of what a sink can display.
//! - [`RESOLUTION_MAP`]: platform resolution names (`"720p"`, `"1080p50"`, ...) to the vendor
//!   HDMI mode code requested from the display firmware. One-to-one; this is what
//!   [`Negotiator`] uses for get/set-resolution.
//!
//! The platform-neutral timing descriptors themselves are in [`RESOLUTIONS`].

mod error;
mod negotiate;
mod resolution;
mod vic;

pub use error::{Result, TableError};
pub use negotiate::{
    enumerate_supported, mode_for_name, name_for_mode, HdmiMode, ModeMapEntry, Negotiator,
    FALLBACK_RESOLUTION, RESOLUTION_MAP,
};
pub use resolution::{
    find_resolution, AspectRatio, FrameRate, PixelResolution, ResolutionDescriptor, ScanMode,
    StereoScopicMode, RESOLUTIONS,
};
pub use vic::{
    resolution_for_vic, vic_for_resolution, vic_table, VicMapEntry, VicTable, VIC_TABLE,
};
