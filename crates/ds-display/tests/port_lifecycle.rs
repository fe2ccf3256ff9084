use ds_display::{
    CapturedSdk, DsError, HalConfig, PortKind, PortState, VideoPortHal,
};
use ds_edid::{
    ChecksumPolicy, CeaExtensionBuilder, EdidBuilder, ParseError, PhysicalAddress,
};
use ds_modes::{find_resolution, AspectRatio, HdmiMode, PixelResolution};
use pretty_assertions::assert_eq;

fn tv_edid() -> Vec<u8> {
    EdidBuilder::new()
        .manufacturer("SAM")
        .product_code(0x0C4E)
        .serial_number(0x0001_0203)
        .monitor_name("SAMSUNG")
        .extension(
            CeaExtensionBuilder::new()
                .hdmi_vendor_block(PhysicalAddress::from_bytes(0x10, 0x00))
                .build(),
        )
        .build()
}

fn tv_modes() -> Vec<HdmiMode> {
    vec![HdmiMode(4), HdmiMode(16), HdmiMode(34), HdmiMode(63)]
}

fn hal(sdk: CapturedSdk) -> VideoPortHal<CapturedSdk> {
    VideoPortHal::new(sdk, &HalConfig::default()).unwrap()
}

#[test]
fn operations_before_init_fail() {
    let mut hal = hal(CapturedSdk::new(tv_edid(), tv_modes()));
    assert_eq!(hal.port(PortKind::Hdmi, 0), Err(DsError::NotInitialized));
    assert_eq!(hal.term(), Err(DsError::NotInitialized));
    hal.init().unwrap();
    assert_eq!(hal.init(), Err(DsError::AlreadyInitialized));
}

#[test]
fn init_reflects_connection_and_term_resets() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    let mut hal = hal(sdk.clone());
    hal.init().unwrap();
    assert!(sdk.is_initialized());

    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    let bb = hal.port(PortKind::Composite, 0).unwrap();
    assert_eq!(hal.port_state(hdmi), Ok(PortState::Connected));
    assert_eq!(hal.port_state(bb), Ok(PortState::Ready));
    assert_eq!(hal.is_display_connected(hdmi), Ok(true));
    assert_eq!(hal.is_port_enabled(hdmi), Ok(true));

    hal.term().unwrap();
    assert!(!sdk.is_initialized());
    assert_eq!(hal.port_state(hdmi), Err(DsError::NotInitialized));
}

#[test]
fn unplugged_sink_starts_ready() {
    let mut hal = hal(CapturedSdk::unplugged(tv_edid(), tv_modes()));
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    assert_eq!(hal.port_state(hdmi), Ok(PortState::Ready));
    assert_eq!(hal.is_display_connected(hdmi), Ok(false));
    assert!(matches!(
        hal.get_edid(hdmi),
        Err(DsError::GeneralFailure(_))
    ));
    assert_eq!(hal.supported_resolutions(hdmi), Ok(Vec::new()));
}

#[test]
fn stale_handles_are_rejected_after_reinit() {
    let mut hal = hal(CapturedSdk::new(tv_edid(), tv_modes()));
    hal.init().unwrap();
    let old = hal.port(PortKind::Hdmi, 0).unwrap();
    hal.term().unwrap();
    hal.init().unwrap();

    assert_eq!(
        hal.port_state(old),
        Err(DsError::InvalidParam("stale port handle"))
    );
    let fresh = hal.port(PortKind::Hdmi, 0).unwrap();
    assert_ne!(old, fresh);
    assert_eq!(hal.port_state(fresh), Ok(PortState::Connected));
}

#[test]
fn unknown_ports_are_invalid() {
    let mut hal = hal(CapturedSdk::new(tv_edid(), tv_modes()));
    hal.init().unwrap();
    assert_eq!(
        hal.port(PortKind::Hdmi, 1),
        Err(DsError::InvalidParam("no such video port"))
    );
}

#[test]
fn edid_is_decoded_with_supported_resolutions() {
    let mut hal = hal(CapturedSdk::new(tv_edid(), tv_modes()));
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();

    let edid = hal.get_edid(hdmi).unwrap();
    assert_eq!(edid.manufacturer_id, "SAM");
    assert_eq!(edid.product_code, 0x0C4E);
    assert_eq!(edid.monitor_name, "SAMSUNG");
    assert_eq!(edid.physical_address.map(|p| p.to_string()), Some("1.0.0.0".to_string()));
    assert!(!edid.is_repeater);

    let names: Vec<_> = edid.supported_resolutions.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["720p", "1080p30", "1080p60"]);
    assert_eq!(hal.supported_resolutions(hdmi).unwrap(), edid.supported_resolutions);

    assert_eq!(hal.get_edid_bytes(hdmi).unwrap(), tv_edid());
}

#[test]
fn pixel_resolutions_use_vic_buckets() {
    let mut hal = hal(CapturedSdk::new(tv_edid(), tv_modes()));
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    assert_eq!(
        hal.supported_pixel_resolutions(hdmi).unwrap(),
        vec![PixelResolution::Res1280x720, PixelResolution::Res1920x1080]
    );
}

#[test]
fn checksum_policy_comes_from_config() {
    let bad = EdidBuilder::new().monitor_name("Bedroom").corrupt_checksum().build();

    let mut strict = hal(CapturedSdk::new(bad.clone(), tv_modes()));
    strict.init().unwrap();
    let hdmi = strict.port(PortKind::Hdmi, 0).unwrap();
    assert_eq!(
        strict.get_edid(hdmi),
        Err(DsError::Parse(ParseError::BadChecksum { block: 0, sum: 1 }))
    );

    let config = HalConfig {
        checksum_policy: ChecksumPolicy::Lenient,
        ..HalConfig::default()
    };
    let mut lenient = VideoPortHal::new(CapturedSdk::new(bad, tv_modes()), &config).unwrap();
    lenient.init().unwrap();
    let hdmi = lenient.port(PortKind::Hdmi, 0).unwrap();
    assert_eq!(lenient.get_edid(hdmi).unwrap().monitor_name, "Bedroom");
}

#[test]
fn set_and_get_resolution() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    let mut hal = hal(sdk.clone());
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();

    let r = find_resolution("1080p60").unwrap();
    hal.set_resolution(hdmi, r).unwrap();
    assert_eq!(sdk.current_mode(), HdmiMode::CEA_1080P60);
    assert_eq!(hal.get_resolution(hdmi).unwrap().name, "1080p60");
    assert_eq!(hal.requested_resolution(hdmi).unwrap().map(|r| r.name), Some("1080p60"));
    assert_eq!(hal.aspect_ratio(hdmi), Ok(AspectRatio::Ratio16x9));
}

#[test]
fn unknown_name_requests_fallback_mode() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    let mut hal = hal(sdk.clone());
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();

    let mut bogus = *find_resolution("1080p60").unwrap();
    bogus.name = "1080p120";
    hal.set_resolution(hdmi, &bogus).unwrap();
    assert_eq!(sdk.current_mode(), HdmiMode::CEA_720P60);
    assert_eq!(hal.get_resolution(hdmi).unwrap().name, "720p");
}

#[test]
fn unmapped_active_mode_resolves_by_geometry() {
    // The sink boots in VIC 63 (1080p120), which the name map does not know.
    let sdk = CapturedSdk::new(tv_edid(), vec![HdmiMode(63), HdmiMode(4)]);
    let mut hal = hal(sdk);
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    let r = hal.get_resolution(hdmi).unwrap();
    assert_eq!(r.pixel_resolution, PixelResolution::Res1920x1080);
}

#[test]
fn unusable_active_mode_is_a_general_failure() {
    let sdk = CapturedSdk::new(tv_edid(), vec![HdmiMode(1)]);
    let mut hal = hal(sdk);
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    assert!(matches!(
        hal.get_resolution(hdmi),
        Err(DsError::GeneralFailure(_))
    ));
}

#[test]
fn composite_port_only_supports_enable() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    let mut hal = hal(sdk.clone());
    hal.init().unwrap();
    let bb = hal.port(PortKind::Composite, 0).unwrap();

    hal.disable_port(bb).unwrap();
    assert_eq!(hal.is_port_enabled(bb), Ok(false));
    assert!(!sdk.output_enabled(PortKind::Composite));
    hal.enable_port(bb).unwrap();
    assert!(sdk.output_enabled(PortKind::Composite));

    let r = find_resolution("480p").unwrap();
    assert!(matches!(
        hal.set_resolution(bb, r),
        Err(DsError::OperationNotSupported(_))
    ));
    assert!(matches!(
        hal.get_resolution(bb),
        Err(DsError::OperationNotSupported(_))
    ));
    assert!(matches!(
        hal.get_edid(bb),
        Err(DsError::OperationNotSupported(_))
    ));
    assert!(matches!(
        hal.is_display_connected(bb),
        Err(DsError::OperationNotSupported(_))
    ));
}

#[test]
fn hdcp_control_is_not_supported() {
    let mut hal = hal(CapturedSdk::new(tv_edid(), tv_modes()));
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();
    assert_eq!(
        hal.enable_hdcp(hdmi, true),
        Err(DsError::OperationNotSupported("HDCP control"))
    );
}

#[test]
fn sdk_failures_surface_as_general_failure() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    let mut hal = hal(sdk.clone());
    hal.init().unwrap();
    let hdmi = hal.port(PortKind::Hdmi, 0).unwrap();

    sdk.set_failing(true);
    let r = find_resolution("720p").unwrap();
    assert!(matches!(hal.set_resolution(hdmi, r), Err(DsError::GeneralFailure(_))));
    assert!(matches!(hal.get_edid(hdmi), Err(DsError::GeneralFailure(_))));
    assert!(matches!(hal.disable_port(hdmi), Err(DsError::GeneralFailure(_))));
    // The enable flag only changes when the SDK call succeeds.
    assert_eq!(hal.is_port_enabled(hdmi), Ok(true));
}

#[test]
fn failed_sdk_init_leaves_hal_uninitialized() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    sdk.set_failing(true);
    let mut hal = hal(sdk.clone());
    assert!(matches!(hal.init(), Err(DsError::GeneralFailure(_))));
    assert!(!hal.is_initialized());

    sdk.set_failing(false);
    hal.init().unwrap();
}

#[test]
fn composite_only_configuration_skips_display_query() {
    let sdk = CapturedSdk::new(tv_edid(), tv_modes());
    let config = HalConfig {
        hdmi_ports: 0,
        ..HalConfig::default()
    };
    let mut hal = VideoPortHal::new(sdk, &config).unwrap();
    hal.init().unwrap();
    assert!(hal.port(PortKind::Hdmi, 0).is_err());
    let bb = hal.port(PortKind::Composite, 0).unwrap();
    assert_eq!(hal.port_state(bb), Ok(PortState::Ready));
}
