use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Reasons an EDID blob is rejected.
///
/// Offsets in [`ParseError::Truncated`] are relative to the start of the 128-byte block named by
/// `block` (0 is the base block).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("EDID too short: {len} bytes (need at least 128)")]
    TooShort { len: usize },

    #[error("bad EDID header")]
    BadHeader,

    #[error("EDID block {block} checksum mismatch (sum={sum:#04x})")]
    BadChecksum { block: usize, sum: u8 },

    #[error("EDID block {block} truncated at offset {offset:#04x}")]
    Truncated { block: usize, offset: usize },

    #[error("EDID declares {declared} extension blocks but only {present} are present")]
    ExtensionCountMismatch { declared: u8, present: usize },
}
