use std::sync::Arc;

use ds_edid::{parse_edid_with, DisplayDescriptor, EdidOptions};
use ds_modes::{resolution_for_vic, AspectRatio, Negotiator, PixelResolution, ResolutionDescriptor};

use crate::{
    ConfigError, DisplayEvent, DisplaySdk, DsError, EventClass, EventQueue, EventSender,
    HalConfig, HdcpStatus, PortHandle, PortKind, PortState, Result, SdkError,
};

/// Callback invoked from [`VideoPortHal::dispatch_events`] on the thread that owns the HAL.
pub type EventCallback = Box<dyn FnMut(PortHandle, DisplayEvent) + Send>;

#[derive(Debug)]
struct PortSlot {
    kind: PortKind,
    index: u8,
    state: PortState,
    enabled: bool,
    hdcp: HdcpStatus,
    /// Last mode requested through `set_resolution`.
    requested: Option<ResolutionDescriptor>,
    /// Cleared on every hotplug and EDID re-read.
    supported: Option<Vec<ResolutionDescriptor>>,
}

impl PortSlot {
    fn new(kind: PortKind, index: u8) -> Self {
        Self {
            kind,
            index,
            state: PortState::Uninitialized,
            enabled: false,
            hdcp: HdcpStatus::default(),
            requested: None,
            supported: None,
        }
    }

    fn reset(&mut self, state: PortState) {
        self.state = state;
        self.enabled = state != PortState::Uninitialized;
        self.hdcp = HdcpStatus::default();
        self.requested = None;
        self.supported = None;
    }
}

/// Video port layer over a vendor [`DisplaySdk`].
///
/// Methods take `&mut self`, so a HAL instance is driven by one thread at a time; share it
/// behind a `Mutex` if several threads need it. SDK notifications arrive through an internal
/// [`EventQueue`] and are applied only when the owner calls [`VideoPortHal::dispatch_events`].
pub struct VideoPortHal<S: DisplaySdk> {
    sdk: S,
    negotiator: Negotiator,
    edid_options: EdidOptions,
    ports: Vec<PortSlot>,
    initialized: bool,
    generation: u32,
    events: Arc<EventQueue>,
    display_cb: Option<EventCallback>,
    hdcp_cb: Option<EventCallback>,
}

impl<S: DisplaySdk> VideoPortHal<S> {
    pub fn new(sdk: S, config: &HalConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let mut ports = Vec::new();
        for index in 0..config.hdmi_ports {
            ports.push(PortSlot::new(PortKind::Hdmi, index));
        }
        for index in 0..config.composite_ports {
            ports.push(PortSlot::new(PortKind::Composite, index));
        }
        Ok(Self {
            sdk,
            negotiator: config.negotiator()?,
            edid_options: config.edid_options(),
            ports,
            initialized: false,
            generation: 0,
            events: Arc::new(EventQueue::new(config.event_queue_len)),
            display_cb: None,
            hdcp_cb: None,
        })
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn sdk_mut(&mut self) -> &mut S {
        &mut self.sdk
    }

    pub fn negotiator(&self) -> &Negotiator {
        &self.negotiator
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Err(DsError::AlreadyInitialized);
        }
        self.sdk.init()?;
        self.sdk
            .attach_events(EventSender::new(Arc::clone(&self.events)));
        // Anything queued before this cycle belongs to the previous one.
        self.events.drain();

        let connected = if self.ports.iter().any(|p| p.kind == PortKind::Hdmi) {
            match self.sdk.display_state() {
                Ok(state) => state.connected,
                Err(err) => {
                    self.sdk.term();
                    return Err(err.into());
                }
            }
        } else {
            false
        };

        self.generation = self.generation.wrapping_add(1);
        for slot in &mut self.ports {
            let state = match slot.kind {
                PortKind::Hdmi if connected => PortState::Connected,
                _ => PortState::Ready,
            };
            slot.reset(state);
        }
        self.initialized = true;
        tracing::debug!(generation = self.generation, connected, "video ports initialized");
        Ok(())
    }

    pub fn term(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(DsError::NotInitialized);
        }
        self.sdk.term();
        for slot in &mut self.ports {
            slot.reset(PortState::Uninitialized);
        }
        self.display_cb = None;
        self.hdcp_cb = None;
        self.initialized = false;
        tracing::debug!(generation = self.generation, "video ports terminated");
        Ok(())
    }

    /// Handle for the `index`-th port of `kind`.
    pub fn port(&self, kind: PortKind, index: u8) -> Result<PortHandle> {
        if !self.initialized {
            return Err(DsError::NotInitialized);
        }
        self.ports
            .iter()
            .find(|p| p.kind == kind && p.index == index)
            .map(|p| PortHandle::new(p.kind, p.index, self.generation))
            .ok_or(DsError::InvalidParam("no such video port"))
    }

    fn slot_index(&self, handle: PortHandle) -> Result<usize> {
        if !self.initialized {
            return Err(DsError::NotInitialized);
        }
        if handle.generation() != self.generation {
            return Err(DsError::InvalidParam("stale port handle"));
        }
        self.ports
            .iter()
            .position(|p| p.kind == handle.kind() && p.index == handle.index())
            .ok_or(DsError::InvalidParam("no such video port"))
    }

    fn slot(&self, handle: PortHandle) -> Result<&PortSlot> {
        let i = self.slot_index(handle)?;
        Ok(&self.ports[i])
    }

    /// Validate `handle` and require an HDMI port.
    fn hdmi_slot_index(&self, handle: PortHandle, op: &'static str) -> Result<usize> {
        let i = self.slot_index(handle)?;
        match self.ports[i].kind {
            PortKind::Hdmi => Ok(i),
            PortKind::Composite => Err(DsError::OperationNotSupported(op)),
        }
    }

    pub fn port_state(&self, handle: PortHandle) -> Result<PortState> {
        Ok(self.slot(handle)?.state)
    }

    pub fn enable_port(&mut self, handle: PortHandle) -> Result<()> {
        self.set_port_enabled(handle, true)
    }

    pub fn disable_port(&mut self, handle: PortHandle) -> Result<()> {
        self.set_port_enabled(handle, false)
    }

    fn set_port_enabled(&mut self, handle: PortHandle, enabled: bool) -> Result<()> {
        let i = self.slot_index(handle)?;
        self.sdk.set_output_enabled(handle.kind(), enabled)?;
        self.ports[i].enabled = enabled;
        Ok(())
    }

    pub fn is_port_enabled(&self, handle: PortHandle) -> Result<bool> {
        Ok(self.slot(handle)?.enabled)
    }

    pub fn is_display_connected(&self, handle: PortHandle) -> Result<bool> {
        let i = self.hdmi_slot_index(handle, "connection detection on composite output")?;
        Ok(self.ports[i].state == PortState::Connected)
    }

    /// Current output resolution as reported by the display firmware.
    pub fn get_resolution(&mut self, handle: PortHandle) -> Result<ResolutionDescriptor> {
        self.hdmi_slot_index(handle, "resolution query on composite output")?;
        let state = self.sdk.display_state()?;
        self.negotiator
            .resolution_for_mode(state.mode)
            .ok_or_else(|| {
                DsError::GeneralFailure(SdkError::new(format!(
                    "display reports unmapped mode {}",
                    state.mode
                )))
            })
    }

    /// Request `resolution`. Names missing from the mode map get the fallback mode instead of an
    /// error.
    pub fn set_resolution(
        &mut self,
        handle: PortHandle,
        resolution: &ResolutionDescriptor,
    ) -> Result<()> {
        let i = self.hdmi_slot_index(handle, "resolution change on composite output")?;
        let mode = self.negotiator.mode_for_name(resolution.name);
        self.sdk.set_mode(mode)?;
        self.ports[i].requested = self.negotiator.resolution_for_mode(mode);
        tracing::debug!(port = %handle, name = resolution.name, %mode, "resolution set");
        Ok(())
    }

    /// Last resolution requested through [`VideoPortHal::set_resolution`] this cycle.
    pub fn requested_resolution(&self, handle: PortHandle) -> Result<Option<ResolutionDescriptor>> {
        Ok(self.slot(handle)?.requested)
    }

    pub fn get_edid_bytes(&mut self, handle: PortHandle) -> Result<Vec<u8>> {
        self.hdmi_slot_index(handle, "EDID on composite output")?;
        Ok(self.sdk.read_edid_bytes()?)
    }

    /// Read and decode the sink's EDID, refreshing the supported-resolution cache.
    pub fn get_edid(&mut self, handle: PortHandle) -> Result<DisplayDescriptor> {
        let i = self.hdmi_slot_index(handle, "EDID on composite output")?;
        self.ports[i].supported = None;
        let bytes = self.sdk.read_edid_bytes()?;
        let mut descriptor = parse_edid_with(&bytes, &self.edid_options)?;
        let supported = self
            .negotiator
            .enumerate_supported(&self.sdk.supported_modes()?);
        self.ports[i].supported = Some(supported.clone());
        descriptor.supported_resolutions = supported;
        Ok(descriptor)
    }

    /// Named resolutions the sink accepts, in advertising order. Cached until the next hotplug
    /// or EDID read.
    pub fn supported_resolutions(&mut self, handle: PortHandle) -> Result<Vec<ResolutionDescriptor>> {
        let i = self.hdmi_slot_index(handle, "resolution list on composite output")?;
        if let Some(cached) = &self.ports[i].supported {
            return Ok(cached.clone());
        }
        let supported = self
            .negotiator
            .enumerate_supported(&self.sdk.supported_modes()?);
        self.ports[i].supported = Some(supported.clone());
        Ok(supported)
    }

    /// Pixel geometries the sink accepts, by VIC bucket. Advisory only: codes outside the VIC
    /// table are skipped and each bucket appears once.
    pub fn supported_pixel_resolutions(&mut self, handle: PortHandle) -> Result<Vec<PixelResolution>> {
        self.hdmi_slot_index(handle, "resolution list on composite output")?;
        let mut out = Vec::new();
        for mode in self.sdk.supported_modes()? {
            let bucket = u8::try_from(mode.0).ok().and_then(resolution_for_vic);
            if let Some(bucket) = bucket {
                if !out.contains(&bucket) {
                    out.push(bucket);
                }
            }
        }
        Ok(out)
    }

    pub fn aspect_ratio(&mut self, handle: PortHandle) -> Result<AspectRatio> {
        self.hdmi_slot_index(handle, "aspect ratio on composite output")?;
        Ok(self.sdk.display_state()?.aspect_ratio)
    }

    pub fn hdcp_status(&self, handle: PortHandle) -> Result<HdcpStatus> {
        let i = self.hdmi_slot_index(handle, "HDCP on composite output")?;
        Ok(self.ports[i].hdcp)
    }

    /// HDCP is negotiated by the firmware; there is no host-side control.
    pub fn enable_hdcp(&mut self, handle: PortHandle, _enabled: bool) -> Result<()> {
        self.slot_index(handle)?;
        Err(DsError::OperationNotSupported("HDCP control"))
    }

    /// Install the callback for `class`, replacing any previous one. Registrations last until
    /// the next `term`.
    pub fn register_callback(&mut self, class: EventClass, callback: EventCallback) -> Result<()> {
        if !self.initialized {
            return Err(DsError::NotInitialized);
        }
        let slot = match class {
            EventClass::Display => &mut self.display_cb,
            EventClass::Hdcp => &mut self.hdcp_cb,
        };
        if slot.is_some() {
            tracing::warn!(?class, "replacing previously registered event callback");
        }
        *slot = Some(callback);
        Ok(())
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Apply queued SDK notifications to port state and invoke callbacks. Returns the number of
    /// events delivered.
    pub fn dispatch_events(&mut self) -> usize {
        let mut delivered = 0;
        for pending in self.events.drain() {
            if !self.initialized {
                tracing::debug!(event = ?pending.event, "dropping display event while uninitialized");
                continue;
            }
            let Some(i) = self
                .ports
                .iter()
                .position(|p| p.kind == PortKind::Hdmi && p.index == pending.index)
            else {
                tracing::debug!(index = pending.index, "dropping event for unknown HDMI port");
                continue;
            };

            let slot = &mut self.ports[i];
            match pending.event {
                DisplayEvent::Connected => {
                    slot.state = PortState::Connected;
                    slot.supported = None;
                }
                DisplayEvent::Disconnected => {
                    slot.state = PortState::Ready;
                    slot.supported = None;
                    slot.hdcp = HdcpStatus::Unpowered;
                }
                DisplayEvent::RxSense(_) => {}
                DisplayEvent::Hdcp(status) => slot.hdcp = status,
            }

            let handle = PortHandle::new(slot.kind, slot.index, self.generation);
            let callback = match pending.event.class() {
                EventClass::Display => self.display_cb.as_mut(),
                EventClass::Hdcp => self.hdcp_cb.as_mut(),
            };
            if let Some(cb) = callback {
                cb(handle, pending.event);
            }
            delivered += 1;
        }
        delivered
    }
}
