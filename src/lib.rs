//! Device Settings HAL core.
//!
//! The pieces live in separate crates and are re-exported here:
//!
//! - [`edid`]: EDID decoding and synthetic EDID generation.
//! - [`modes`]: the VIC table, the named resolution table and the [`Negotiator`] that maps
//!   resolution names to vendor HDMI modes.
//! - [`display`]: the video port layer ([`VideoPortHal`]) over a vendor display SDK.

pub use ds_display as display;
pub use ds_edid as edid;
pub use ds_modes as modes;

pub use ds_display::{
    CapturedSdk, DisplayEvent, DisplaySdk, DsError, EventClass, HalConfig, PortHandle, PortKind,
    PortState, VideoPortHal,
};
pub use ds_edid::{parse_edid, DisplayDescriptor, ParseError};
pub use ds_modes::{HdmiMode, Negotiator, ResolutionDescriptor};
