use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use ds_display::HalConfig;
use ds_edid::{ChecksumPolicy, PhysicalAddress};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dsinfo", version, about = "Inspect EDIDs and HDMI mode tables offline")]
pub struct Cli {
    /// JSON file with video port settings.
    ///
    /// When absent, settings come from `DS_CHECKSUM_POLICY`, `DS_FALLBACK_RESOLUTION` and
    /// `DS_EVENT_QUEUE_LEN`.
    ///
    /// Environment variable: `DS_CONFIG`.
    #[arg(long, env = "DS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (tracing-subscriber EnvFilter syntax). `RUST_LOG` takes precedence.
    ///
    /// Environment variable: `DS_LOG_LEVEL`.
    #[arg(long, env = "DS_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Accept EDIDs whose base-block checksum does not add up.
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode an EDID blob.
    Edid {
        file: PathBuf,

        /// Print the decoded descriptor as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the named resolutions and the HDMI mode each one requests.
    Modes {
        #[arg(long)]
        json: bool,
    },

    /// Look up a CEA-861 Video Identification Code.
    Vic { vic: u8 },

    /// Map a resolution name to an HDMI mode, or a mode back to a resolution.
    #[command(group(ArgGroup::new("query").required(true).args(["name", "mode"])))]
    Negotiate {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        mode: Option<u32>,

        /// Modes a sink reports, e.g. `16,4,34`. Printed as the advertised resolution list.
        #[arg(long, value_delimiter = ',')]
        supported: Vec<u32>,
    },

    /// Drive the video port layer over a captured EDID.
    Display {
        #[arg(long)]
        edid: PathBuf,

        /// Modes the captured sink accepts. Defaults to every mapped mode.
        #[arg(long, value_delimiter = ',')]
        supported: Vec<u32>,

        /// Resolution name to request before reporting.
        #[arg(long)]
        set: Option<String>,
    },

    /// Write a synthetic EDID.
    Synth {
        /// Monitor name stored in the display descriptors.
        #[arg(long)]
        name: String,

        #[arg(long)]
        out: PathBuf,

        /// Three-letter PNP manufacturer id.
        #[arg(long, default_value = "RPI")]
        manufacturer: String,

        #[arg(long, default_value_t = 0)]
        product_code: u16,

        /// Add a CEA extension with an HDMI vendor block carrying this address, e.g. `1.0.0.0`.
        #[arg(long, value_parser = parse_physical_address)]
        physical_address: Option<PhysicalAddress>,
    },
}

impl Cli {
    /// Settings file (or environment) with `--lenient` applied on top.
    pub fn hal_config(&self) -> Result<HalConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                HalConfig::from_json(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => HalConfig::from_env().context("invalid DS_* environment")?,
        };
        if self.lenient {
            config.checksum_policy = ChecksumPolicy::Lenient;
        }
        Ok(config)
    }
}

pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so `--json` output stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `A.B.C.D` with each component a hex digit.
pub fn parse_physical_address(s: &str) -> Result<PhysicalAddress> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        bail!("expected A.B.C.D, got {s:?}");
    }
    let mut nibbles = [0u8; 4];
    for (slot, part) in nibbles.iter_mut().zip(&parts) {
        let v = u8::from_str_radix(part, 16)
            .with_context(|| format!("bad address component {part:?}"))?;
        if v > 0xF {
            bail!("address component {part:?} is wider than a nibble");
        }
        *slot = v;
    }
    Ok(PhysicalAddress {
        a: nibbles[0],
        b: nibbles[1],
        c: nibbles[2],
        d: nibbles[3],
    })
}
