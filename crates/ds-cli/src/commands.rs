use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use ds_display::{CapturedSdk, HalConfig, PortKind, VideoPortHal};
use ds_edid::{
    parse_edid_with, CeaExtensionBuilder, DisplayDescriptor, EdidBuilder, ManufactureDate,
    PhysicalAddress,
};
use ds_modes::{vic_table, HdmiMode, Negotiator, ResolutionDescriptor, RESOLUTION_MAP};
use serde::Serialize;

use crate::config::Command;

pub fn run(command: &Command, config: &HalConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Edid { file, json } => edid(file, *json, config, out),
        Command::Modes { json } => modes(*json, config, out),
        Command::Vic { vic } => vic_info(*vic, out),
        Command::Negotiate {
            name,
            mode,
            supported,
        } => negotiate(name.as_deref(), *mode, supported, config, out),
        Command::Display {
            edid,
            supported,
            set,
        } => display(edid, supported, set.as_deref(), config, out),
        Command::Synth {
            name,
            out: path,
            manufacturer,
            product_code,
            physical_address,
        } => synth(name, path, manufacturer, *product_code, *physical_address, out),
    }
}

fn read_blob(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read EDID {}", path.display()))
}

fn edid(path: &Path, json: bool, config: &HalConfig, out: &mut impl Write) -> Result<()> {
    let bytes = read_blob(path)?;
    let descriptor = parse_edid_with(&bytes, &config.edid_options())
        .with_context(|| format!("failed to decode {}", path.display()))?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &descriptor)?;
        writeln!(out)?;
    } else {
        print_descriptor(&descriptor, out)?;
    }
    Ok(())
}

fn format_date(date: Option<ManufactureDate>) -> String {
    let Some(date) = date else {
        return "unknown".to_string();
    };
    let year = match date.year {
        Some(year) => year.to_string(),
        None => format!("unknown (raw {})", date.raw_year),
    };
    match (date.model_year, date.week) {
        (true, _) => format!("model year {year}"),
        (false, Some(week)) => format!("week {week}, {year}"),
        (false, None) => year,
    }
}

fn print_descriptor(d: &DisplayDescriptor, out: &mut impl Write) -> Result<()> {
    writeln!(out, "manufacturer:     {}", d.manufacturer_id)?;
    writeln!(out, "product code:     {:#06x}", d.product_code)?;
    writeln!(out, "serial number:    {:#010x}", d.serial_number)?;
    writeln!(out, "manufactured:     {}", format_date(d.manufacture_date))?;
    writeln!(out, "EDID version:     {}.{}", d.version, d.revision)?;
    writeln!(out, "extensions:       {}", d.extension_count)?;
    writeln!(out, "monitor name:     {}", d.monitor_name)?;
    match d.physical_address {
        Some(pa) if d.is_repeater => writeln!(out, "physical address: {pa} (repeater)")?,
        Some(pa) => writeln!(out, "physical address: {pa}")?,
        None => writeln!(out, "physical address: none")?,
    }
    writeln!(out, "HDMI:             {}", if d.is_hdmi { "yes" } else { "no" })?;
    if !d.supported_resolutions.is_empty() {
        let names: Vec<_> = d.supported_resolutions.iter().map(|r| r.name).collect();
        writeln!(out, "supported:        {}", names.join(", "))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ModeRow {
    name: &'static str,
    mode: HdmiMode,
    width: u16,
    height: u16,
    interlaced: bool,
    frame_rate_mhz: Option<u32>,
}

fn modes(json: bool, config: &HalConfig, out: &mut impl Write) -> Result<()> {
    let negotiator = config.negotiator()?;
    let rows: Vec<ModeRow> = negotiator
        .resolutions()
        .iter()
        .map(|r| ModeRow {
            name: r.name,
            mode: negotiator.mode_for_name(r.name),
            width: r.pixel_resolution.width(),
            height: r.pixel_resolution.height(),
            interlaced: r.is_interlaced(),
            frame_rate_mhz: r.frame_rate.millihertz(),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    for row in &rows {
        writeln!(
            out,
            "{:<8} mode {:>2}  {}x{}{}",
            row.name,
            row.mode.0,
            row.width,
            row.height,
            if row.interlaced { " interlaced" } else { "" }
        )?;
    }
    writeln!(out, "fallback: {}", negotiator.fallback_mode())?;
    Ok(())
}

fn vic_info(vic: u8, out: &mut impl Write) -> Result<()> {
    let table = vic_table();
    let bucket = table
        .resolution_for_vic(vic)
        .ok_or_else(|| anyhow!("VIC {vic} is not in the table"))?;
    let siblings: Vec<String> = table
        .vics_for_resolution(bucket)
        .iter()
        .map(u8::to_string)
        .collect();
    writeln!(out, "VIC {vic}: {bucket}")?;
    writeln!(out, "same bucket: {}", siblings.join(", "))?;
    Ok(())
}

fn negotiate(
    name: Option<&str>,
    mode: Option<u32>,
    supported: &[u32],
    config: &HalConfig,
    out: &mut impl Write,
) -> Result<()> {
    let negotiator = config.negotiator()?;

    if let Some(name) = name {
        let mode = negotiator.mode_for_name(name);
        let note = if negotiator.find_resolution(name).is_some() {
            ""
        } else {
            " (fallback)"
        };
        writeln!(out, "{name} -> mode {mode}{note}")?;
    }
    if let Some(mode) = mode {
        let mode = HdmiMode(mode);
        match (negotiator.name_for_mode(mode), negotiator.resolution_for_mode(mode)) {
            (Some(name), _) => writeln!(out, "mode {mode} -> {name}")?,
            (None, Some(r)) => writeln!(
                out,
                "mode {mode} -> {} (by geometry {})",
                r.name, r.pixel_resolution
            )?,
            (None, None) => bail!("mode {mode} maps to no known resolution"),
        }
    }
    if !supported.is_empty() {
        let modes: Vec<HdmiMode> = supported.iter().copied().map(HdmiMode).collect();
        let names: Vec<_> = negotiator
            .enumerate_supported(&modes)
            .iter()
            .map(|r| r.name)
            .collect();
        writeln!(out, "supported: {}", names.join(", "))?;
    }
    Ok(())
}

fn display(
    edid_path: &Path,
    supported: &[u32],
    set: Option<&str>,
    config: &HalConfig,
    out: &mut impl Write,
) -> Result<()> {
    let modes: Vec<HdmiMode> = if supported.is_empty() {
        RESOLUTION_MAP.iter().map(|e| e.mode).collect()
    } else {
        supported.iter().copied().map(HdmiMode).collect()
    };
    let sdk = CapturedSdk::new(read_blob(edid_path)?, modes);
    let mut hal = VideoPortHal::new(sdk, config)?;
    hal.init()?;
    let port = hal.port(PortKind::Hdmi, 0)?;

    let descriptor = hal.get_edid(port)?;
    print_descriptor(&descriptor, out)?;
    writeln!(out, "connected:        {}", hal.is_display_connected(port)?)?;

    if let Some(name) = set {
        let requested = resolve_name(hal.negotiator(), name)?;
        hal.set_resolution(port, &requested)?;
    }
    let current = hal.get_resolution(port)?;
    writeln!(out, "resolution:       {}", current.name)?;
    writeln!(out, "aspect ratio:     {:?}", hal.aspect_ratio(port)?)?;

    hal.term()?;
    Ok(())
}

/// Descriptor for a user-supplied name, or the configured fallback's when the name is unknown.
fn resolve_name(negotiator: &Negotiator, name: &str) -> Result<ResolutionDescriptor> {
    if let Some(r) = negotiator.find_resolution(name) {
        return Ok(*r);
    }
    tracing::warn!(name, "unknown resolution name, the fallback mode will be requested");
    let fallback = negotiator
        .resolution_for_mode(negotiator.fallback_mode())
        .ok_or_else(|| anyhow!("fallback mode has no resolution"))?;
    Ok(fallback)
}

fn synth(
    name: &str,
    path: &Path,
    manufacturer: &str,
    product_code: u16,
    physical_address: Option<PhysicalAddress>,
    out: &mut impl Write,
) -> Result<()> {
    if manufacturer.len() != 3 || !manufacturer.bytes().all(|b| b.is_ascii_uppercase()) {
        bail!("manufacturer must be three uppercase letters, got {manufacturer:?}");
    }
    let mut builder = EdidBuilder::new()
        .manufacturer(manufacturer)
        .product_code(product_code)
        .monitor_name(name);
    if let Some(pa) = physical_address {
        builder = builder.extension(CeaExtensionBuilder::new().hdmi_vendor_block(pa).build());
    }
    let bytes = builder.build();
    std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
    writeln!(out, "wrote {} bytes to {}", bytes.len(), path.display())?;
    Ok(())
}
