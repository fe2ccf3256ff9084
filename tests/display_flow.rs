//! End-to-end: a captured sink driven through the port layer, with events and config.

use std::sync::{Arc, Mutex};

use dshal::display::HdcpStatus;
use dshal::edid::{CeaExtensionBuilder, EdidBuilder, PhysicalAddress};
use dshal::modes::find_resolution;
use dshal::{
    CapturedSdk, DisplayEvent, EventClass, HalConfig, HdmiMode, PortKind, PortState,
    VideoPortHal,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn soundbar_edid() -> Vec<u8> {
    EdidBuilder::new()
        .manufacturer("SNY")
        .product_code(0xA001)
        .manufacture(0xFF, 30)
        .monitor_name("SONY AVR")
        .extension(
            CeaExtensionBuilder::new()
                .hdmi_vendor_block(PhysicalAddress { a: 1, b: 0, c: 0, d: 0 })
                .build(),
        )
        .build()
}

#[test]
fn plug_select_and_unplug() {
    init_logging();
    let config = HalConfig::from_json(r#"{"fallback_resolution":"1080i","event_queue_len":16}"#)
        .unwrap();
    let sdk = CapturedSdk::unplugged(
        soundbar_edid(),
        vec![HdmiMode(16), HdmiMode(5), HdmiMode(4), HdmiMode(31)],
    );
    let mut hal = VideoPortHal::new(sdk.clone(), &config).unwrap();

    hal.init().unwrap();
    let seen: Arc<Mutex<Vec<DisplayEvent>>> = Arc::default();
    {
        let seen = Arc::clone(&seen);
        hal.register_callback(
            EventClass::Display,
            Box::new(move |_, event| seen.lock().unwrap().push(event)),
        )
        .unwrap();
    }
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    assert_eq!(hal.port_state(hdmi), Ok(PortState::Ready));

    sdk.hotplug(true);
    sdk.report_hdcp(HdcpStatus::Authenticated);
    assert_eq!(hal.dispatch_events(), 2);
    assert_eq!(hal.port_state(hdmi), Ok(PortState::Connected));

    let edid = hal.get_edid(hdmi).unwrap();
    assert_eq!(edid.manufacturer_id, "SNY");
    assert_eq!(edid.monitor_name, "SONY AVR");
    assert!(edid.manufacture_date.unwrap().model_year);
    assert_eq!(edid.manufacture_date.unwrap().year, Some(2020));
    assert_eq!(edid.physical_address.unwrap().to_string(), "1.0.0.0");
    let names: Vec<_> = edid.supported_resolutions.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["720p", "1080i", "1080p50", "1080p60"]);

    hal.set_resolution(hdmi, find_resolution("1080p50").unwrap())
        .unwrap();
    assert_eq!(hal.get_resolution(hdmi).unwrap().name, "1080p50");

    // Unknown names use the configured fallback, not the built-in one.
    let mut unknown = *find_resolution("1080p60").unwrap();
    unknown.name = "2160p60";
    hal.set_resolution(hdmi, &unknown).unwrap();
    assert_eq!(sdk.current_mode(), HdmiMode(5));

    sdk.hotplug(false);
    hal.dispatch_events();
    assert_eq!(hal.is_display_connected(hdmi), Ok(false));
    assert_eq!(hal.hdcp_status(hdmi), Ok(HdcpStatus::Unpowered));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![DisplayEvent::Connected, DisplayEvent::Disconnected]
    );

    hal.term().unwrap();
    assert!(!sdk.is_initialized());
}

#[test]
fn facade_parses_edid_directly() {
    let descriptor = dshal::parse_edid(&soundbar_edid()).unwrap();
    assert!(descriptor.is_hdmi);
    assert!(descriptor.supported_resolutions.is_empty());

    let json = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(json["product_code"], 0xA001);
}
