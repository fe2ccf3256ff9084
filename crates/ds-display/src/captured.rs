use std::sync::{Arc, Mutex};

use ds_modes::{AspectRatio, HdmiMode, Negotiator};

use crate::{
    DisplayEvent, DisplaySdk, DisplayState, EventSender, HdcpStatus, PortKind, SdkError,
};

#[derive(Debug)]
struct CapturedState {
    edid: Vec<u8>,
    modes: Vec<HdmiMode>,
    connected: bool,
    mode: HdmiMode,
    hdmi_enabled: bool,
    composite_enabled: bool,
    initialized: bool,
    failing: bool,
    events: Option<EventSender>,
}

/// Display SDK backed by a captured EDID and mode list instead of hardware.
///
/// Clones share state, so a test (or a replay tool) can keep a clone to simulate hotplug and
/// HDCP notifications while the HAL owns another.
#[derive(Debug, Clone)]
pub struct CapturedSdk {
    inner: Arc<Mutex<CapturedState>>,
}

impl CapturedSdk {
    /// A connected sink with `edid`, accepting `modes`. The active mode starts as the first
    /// supported one.
    pub fn new(edid: Vec<u8>, modes: Vec<HdmiMode>) -> Self {
        let mode = modes.first().copied().unwrap_or(HdmiMode::CEA_720P60);
        Self {
            inner: Arc::new(Mutex::new(CapturedState {
                edid,
                modes,
                connected: true,
                mode,
                hdmi_enabled: true,
                composite_enabled: true,
                initialized: false,
                failing: false,
                events: None,
            })),
        }
    }

    /// Same as [`CapturedSdk::new`] with nothing plugged in.
    pub fn unplugged(edid: Vec<u8>, modes: Vec<HdmiMode>) -> Self {
        let sdk = Self::new(edid, modes);
        sdk.lock().connected = false;
        sdk
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CapturedState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, event: DisplayEvent) {
        let events = self.lock().events.clone();
        match events {
            Some(tx) => tx.send(event),
            None => tracing::debug!(?event, "no event sink attached"),
        }
    }

    /// Simulate a cable plug or unplug.
    pub fn hotplug(&self, connected: bool) {
        self.lock().connected = connected;
        self.notify(if connected {
            DisplayEvent::Connected
        } else {
            DisplayEvent::Disconnected
        });
    }

    pub fn report_hdcp(&self, status: HdcpStatus) {
        self.notify(DisplayEvent::Hdcp(status));
    }

    /// Swap the attached sink without generating an event.
    pub fn replace_sink(&self, edid: Vec<u8>, modes: Vec<HdmiMode>) {
        let mut state = self.lock();
        state.edid = edid;
        state.modes = modes;
    }

    /// Make every fallible call fail, as if the firmware stopped answering.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn current_mode(&self) -> HdmiMode {
        self.lock().mode
    }

    pub fn output_enabled(&self, port: PortKind) -> bool {
        let state = self.lock();
        match port {
            PortKind::Hdmi => state.hdmi_enabled,
            PortKind::Composite => state.composite_enabled,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }
}

fn check(state: &CapturedState) -> Result<(), SdkError> {
    if state.failing {
        return Err(SdkError::new("firmware not responding"));
    }
    if !state.initialized {
        return Err(SdkError::new("service not initialized"));
    }
    Ok(())
}

impl DisplaySdk for CapturedSdk {
    fn init(&mut self) -> Result<(), SdkError> {
        let mut state = self.lock();
        if state.failing {
            return Err(SdkError::new("firmware not responding"));
        }
        state.initialized = true;
        Ok(())
    }

    fn term(&mut self) {
        let mut state = self.lock();
        state.initialized = false;
        state.events = None;
    }

    fn read_edid_bytes(&mut self) -> Result<Vec<u8>, SdkError> {
        let state = self.lock();
        check(&state)?;
        if !state.connected {
            return Err(SdkError::new("no display attached"));
        }
        Ok(state.edid.clone())
    }

    fn display_state(&mut self) -> Result<DisplayState, SdkError> {
        let state = self.lock();
        check(&state)?;
        let aspect_ratio = Negotiator::reference()
            .resolution_for_mode(state.mode)
            .map(|r| r.aspect_ratio)
            .unwrap_or(AspectRatio::Ratio16x9);
        Ok(DisplayState {
            connected: state.connected,
            mode: state.mode,
            aspect_ratio,
        })
    }

    fn supported_modes(&mut self) -> Result<Vec<HdmiMode>, SdkError> {
        let state = self.lock();
        check(&state)?;
        if !state.connected {
            return Ok(Vec::new());
        }
        Ok(state.modes.clone())
    }

    fn set_mode(&mut self, mode: HdmiMode) -> Result<(), SdkError> {
        let mut state = self.lock();
        check(&state)?;
        if state.connected && !state.modes.contains(&mode) {
            return Err(SdkError::new(format!("sink does not accept mode {mode}")));
        }
        state.mode = mode;
        Ok(())
    }

    fn set_output_enabled(&mut self, port: PortKind, enabled: bool) -> Result<(), SdkError> {
        let mut state = self.lock();
        check(&state)?;
        match port {
            PortKind::Hdmi => state.hdmi_enabled = enabled,
            PortKind::Composite => state.composite_enabled = enabled,
        }
        Ok(())
    }

    fn attach_events(&mut self, events: EventSender) {
        self.lock().events = Some(events);
    }
}
