use serde::Serialize;
use time::OffsetDateTime;

/// Week/year of manufacture from base-block bytes 0x10/0x11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManufactureDate {
    /// 1..=54, `None` when unspecified.
    pub week: Option<u8>,
    /// Calendar year, `None` when `1990 + raw_year` lies in the future.
    pub year: Option<u16>,
    /// Year byte as stored.
    pub raw_year: u8,
    /// Week byte was 0xFF: the year is a model year, not a manufacture year.
    pub model_year: bool,
}

impl ManufactureDate {
    /// Decode the two date bytes. Week bytes of 55..=254 are invalid.
    pub(crate) fn decode(week: u8, raw_year: u8, current_year: u16) -> Option<Self> {
        if week >= 55 && week != 0xFF {
            tracing::debug!(week, "ignoring out of range manufacture week");
            return None;
        }
        let full = 1990 + u16::from(raw_year);
        Some(Self {
            week: (week != 0 && week != 0xFF).then_some(week),
            year: (full <= current_year).then_some(full),
            raw_year,
            model_year: week == 0xFF,
        })
    }
}

/// Current calendar year (UTC) from the system clock.
pub fn current_year() -> u16 {
    let year = OffsetDateTime::now_utc().year();
    u16::try_from(year.max(0)).unwrap_or(u16::MAX)
}
