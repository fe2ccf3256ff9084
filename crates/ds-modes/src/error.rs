use thiserror::Error;

use crate::{HdmiMode, PixelResolution};

pub type Result<T> = std::result::Result<T, TableError>;

/// Inconsistencies detected while loading a mode table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("VIC {vic} maps to both {first:?} and {second:?}")]
    ConflictingVic {
        vic: u8,
        first: PixelResolution,
        second: PixelResolution,
    },

    #[error("resolution name {0:?} appears more than once")]
    DuplicateName(&'static str),

    #[error("vendor mode {mode} is mapped by more than one resolution name")]
    DuplicateMode { mode: HdmiMode },

    #[error("resolution name {0:?} is not in the resolution table")]
    UnknownName(String),
}
