use ds_modes::{AspectRatio, HdmiMode};

use crate::{EventSender, PortKind, SdkError};

/// Snapshot of the HDMI link as reported by the display firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub connected: bool,
    pub mode: HdmiMode,
    pub aspect_ratio: AspectRatio,
}

/// The vendor display service the HAL drives (tvservice on VideoCore, DRM/KMS elsewhere).
///
/// Calls are synchronous. Implementations deliver hotplug and HDCP notifications by pushing
/// into the [`EventSender`] handed to [`DisplaySdk::attach_events`], from whatever thread they
/// like; the HAL drains them on its own schedule.
pub trait DisplaySdk {
    fn init(&mut self) -> Result<(), SdkError>;

    fn term(&mut self);

    /// Raw EDID of the attached sink, all blocks.
    fn read_edid_bytes(&mut self) -> Result<Vec<u8>, SdkError>;

    fn display_state(&mut self) -> Result<DisplayState, SdkError>;

    /// Vendor mode codes the attached sink accepts.
    fn supported_modes(&mut self) -> Result<Vec<HdmiMode>, SdkError>;

    fn set_mode(&mut self, mode: HdmiMode) -> Result<(), SdkError>;

    fn set_output_enabled(&mut self, port: PortKind, enabled: bool) -> Result<(), SdkError>;

    /// Replace the notification sink. Only the latest sender receives events.
    fn attach_events(&mut self, events: EventSender);
}

impl<T: DisplaySdk + ?Sized> DisplaySdk for Box<T> {
    fn init(&mut self) -> Result<(), SdkError> {
        (**self).init()
    }

    fn term(&mut self) {
        (**self).term()
    }

    fn read_edid_bytes(&mut self) -> Result<Vec<u8>, SdkError> {
        (**self).read_edid_bytes()
    }

    fn display_state(&mut self) -> Result<DisplayState, SdkError> {
        (**self).display_state()
    }

    fn supported_modes(&mut self) -> Result<Vec<HdmiMode>, SdkError> {
        (**self).supported_modes()
    }

    fn set_mode(&mut self, mode: HdmiMode) -> Result<(), SdkError> {
        (**self).set_mode(mode)
    }

    fn set_output_enabled(&mut self, port: PortKind, enabled: bool) -> Result<(), SdkError> {
        (**self).set_output_enabled(port, enabled)
    }

    fn attach_events(&mut self, events: EventSender) {
        (**self).attach_events(events)
    }
}
