//! Video port state for the Device Settings HAL.
//!
//! [`VideoPortHal`] sits between the application-facing get/set-resolution and EDID calls and a
//! vendor display service abstracted as [`DisplaySdk`]. It owns the only mutable state in the
//! stack: per-port lifecycle, enable flags, the cached supported-resolution list and the event
//! callbacks. EDID decoding and mode mapping are delegated to `ds-edid` and `ds-modes`.
//!
//! Hotplug/HDCP notifications are queued by the SDK on its own thread and applied when the
//! owner calls [`VideoPortHal::dispatch_events`].

mod captured;
mod config;
mod error;
mod events;
mod hal;
mod handle;
mod sdk;

pub use captured::CapturedSdk;
pub use config::{ConfigError, HalConfig};
pub use error::{DsError, Result, SdkError};
pub use events::{
    DisplayEvent, EventClass, EventQueue, EventSender, HdcpStatus, PortEvent,
};
pub use hal::{EventCallback, VideoPortHal};
pub use handle::{PortHandle, PortKind, PortState};
pub use sdk::{DisplaySdk, DisplayState};
