use ds_modes::{
    enumerate_supported, mode_for_name, name_for_mode, resolution_for_vic, vic_for_resolution,
    HdmiMode, Negotiator, RESOLUTIONS, RESOLUTION_MAP, VIC_TABLE,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn name_round_trips_through_mode() {
    for r in RESOLUTIONS.iter() {
        let mode = mode_for_name(r.name);
        assert_eq!(name_for_mode(mode), Some(r.name));
    }
}

#[test]
fn mode_round_trips_through_name() {
    for entry in RESOLUTION_MAP.iter() {
        let name = name_for_mode(entry.mode).expect("mapped mode");
        assert_eq!(mode_for_name(name), entry.mode);
    }
}

#[test]
fn bogus_name_gets_fallback_mode() {
    assert_eq!(mode_for_name("bogus-name"), HdmiMode::CEA_720P60);
    assert_eq!(mode_for_name(""), HdmiMode::CEA_720P60);
    // Lookups are case sensitive.
    assert_eq!(mode_for_name("1080P50"), HdmiMode::CEA_720P60);
}

#[test]
fn enumerate_supported_follows_table_order() {
    // 720p60, 1080p60, 1080p30 given out of table order.
    let got = enumerate_supported(&[HdmiMode(16), HdmiMode(4), HdmiMode(34)]);
    let names: Vec<_> = got.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["720p", "1080p30", "1080p60"]);

    let got = enumerate_supported(&[HdmiMode(4), HdmiMode(16), HdmiMode(34)]);
    let names: Vec<_> = got.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["720p", "1080p30", "1080p60"]);
}

#[test]
fn enumerate_supported_keeps_each_rate_as_its_own_entry() {
    let all: Vec<HdmiMode> = RESOLUTION_MAP.iter().map(|e| e.mode).collect();
    let got = enumerate_supported(&all);
    assert_eq!(got.len(), RESOLUTIONS.len());

    let full_hd: Vec<_> = got
        .iter()
        .filter(|r| r.pixel_resolution == ds_modes::PixelResolution::Res1920x1080)
        .map(|r| r.name)
        .collect();
    assert_eq!(
        full_hd,
        vec!["1080i", "1080i50", "1080p24", "1080p25", "1080p30", "1080p50", "1080p60"]
    );
}

#[test]
fn enumerate_supported_tolerates_repeated_codes() {
    let got = enumerate_supported(&[HdmiMode(4), HdmiMode(4), HdmiMode(4)]);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].name, "720p");
}

#[test]
fn every_table_vic_resolves() {
    for entry in VIC_TABLE.iter() {
        assert_eq!(resolution_for_vic(entry.vic), Some(entry.resolution));
        // The representative VIC for the bucket must map back to the same bucket.
        let rep = vic_for_resolution(entry.resolution).expect("bucket has a VIC");
        assert_eq!(resolution_for_vic(rep), Some(entry.resolution));
    }
}

#[test]
fn negotiator_is_copyable_and_consistent_with_free_functions() {
    let n = Negotiator::default();
    let copy = n;
    for r in RESOLUTIONS.iter() {
        assert_eq!(n.mode_for_name(r.name), copy.mode_for_name(r.name));
        assert_eq!(n.mode_for_name(r.name), mode_for_name(r.name));
    }
}

proptest! {
    #[test]
    fn resolution_for_vic_is_deterministic(vic in any::<u8>()) {
        let first = resolution_for_vic(vic);
        prop_assert_eq!(first, resolution_for_vic(vic));
        prop_assert_eq!(first.is_some(), VIC_TABLE.iter().any(|e| e.vic == vic));
    }

    #[test]
    fn mode_for_name_never_panics(name in ".{0,16}") {
        let mode = mode_for_name(&name);
        prop_assert!(RESOLUTION_MAP.iter().any(|e| e.mode == mode));
    }
}
