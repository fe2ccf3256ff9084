//! EDID decoding for the Device Settings HAL.
//!
//! [`parse_edid`] turns a raw EDID blob (a 128-byte base block followed by zero or more
//! 128-byte extension blocks) into a [`DisplayDescriptor`]. Only the identity fields the HAL
//! reports are decoded: manufacturer, product/serial codes, manufacture date, monitor name and,
//! from CEA-861 extension blocks, the HDMI physical address.
//!
//! Every offset is bounds checked; malformed input is an error, never a panic.
//!
//! [`EdidBuilder`] produces well-formed blobs for tests and tooling.

mod builder;
mod cea;
mod date;
mod error;
mod parse;

pub use builder::{name_descriptor, CeaExtensionBuilder, EdidBuilder, PREFERRED_1080P60_DTD};
pub use date::{current_year, ManufactureDate};
pub use error::{ParseError, Result};
pub use parse::{
    block_checksum, parse_edid, parse_edid_with, validate_edid, ChecksumPolicy,
    DisplayDescriptor, EdidOptions, PhysicalAddress,
};

pub const EDID_BLOCK_SIZE: usize = 128;

/// Fixed 8-byte magic at the start of every base block.
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Length of a detailed timing / display descriptor.
pub const DESCRIPTOR_LEN: usize = 18;

/// Offsets of the four descriptor slots in the base block.
pub const BASE_DESCRIPTOR_OFFSETS: [usize; 4] = [0x36, 0x48, 0x5A, 0x6C];

/// Display descriptor tag for the monitor name.
pub const MONITOR_NAME_TAG: u8 = 0xFC;

/// Longest monitor name reported.
pub const MAX_MONITOR_NAME_LEN: usize = 13;

/// First byte of a CEA-861 extension block.
pub const CEA_EXTENSION_TAG: u8 = 0x02;

/// Data block tag of a vendor-specific data block.
pub const VENDOR_SPECIFIC_TAG: u8 = 3;

/// IEEE OUI of HDMI Licensing, LLC.
pub const HDMI_OUI: u32 = 0x000C03;
