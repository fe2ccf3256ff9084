use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;

/// HDCP link state as last reported by the display firmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HdcpStatus {
    #[default]
    Unpowered,
    Unauthenticated,
    InProgress,
    Authenticated,
    AuthenticationFailure,
    PortDisabled,
}

/// Notification pushed by the display SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEvent {
    Connected,
    Disconnected,
    RxSense(bool),
    Hdcp(HdcpStatus),
}

/// Callback registrations are per class; each class holds at most one callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    Display,
    Hdcp,
}

impl DisplayEvent {
    pub fn class(&self) -> EventClass {
        match self {
            Self::Connected | Self::Disconnected | Self::RxSense(_) => EventClass::Display,
            Self::Hdcp(_) => EventClass::Hdcp,
        }
    }
}

/// An event for HDMI port `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortEvent {
    pub index: u8,
    pub event: DisplayEvent,
}

/// Bounded thread-safe queue with drain semantics.
///
/// The SDK notification thread pushes, the thread owning the HAL drains. When full, the oldest
/// events are dropped.
#[derive(Debug)]
pub struct EventQueue {
    inner: Mutex<VecDeque<PortEvent>>,
    max_len: usize,
    dropped: AtomicU64,
}

impl EventQueue {
    pub fn new(max_len: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            max_len,
            dropped: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<PortEvent>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Push an event, dropping the oldest ones beyond `max_len`. A zero-length queue drops
    /// everything.
    pub fn push(&self, event: PortEvent) {
        if self.max_len == 0 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let mut guard = self.lock();
        if guard.len() >= self.max_len {
            let drop_count = guard.len() + 1 - self.max_len;
            guard.drain(..drop_count);
            self.dropped.fetch_add(drop_count as u64, Ordering::Relaxed);
            tracing::warn!(drop_count, "display event queue full, dropping oldest events");
        }
        guard.push_back(event);
    }

    pub fn drain(&self) -> Vec<PortEvent> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Producer handle given to the SDK.
#[derive(Debug, Clone)]
pub struct EventSender {
    queue: Arc<EventQueue>,
}

impl EventSender {
    pub fn new(queue: Arc<EventQueue>) -> Self {
        Self { queue }
    }

    /// Queue an event for HDMI port 0.
    pub fn send(&self, event: DisplayEvent) {
        self.send_for(0, event);
    }

    pub fn send_for(&self, index: u8, event: DisplayEvent) {
        self.queue.push(PortEvent { index, event });
    }
}
