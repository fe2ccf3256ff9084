use serde::Serialize;

/// Coarse pixel geometry bucket. Several refresh rates and pixel-repetition variants collapse
/// into the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelResolution {
    #[serde(rename = "720x480")]
    Res720x480,
    #[serde(rename = "720x576")]
    Res720x576,
    #[serde(rename = "1280x720")]
    Res1280x720,
    #[serde(rename = "1920x1080")]
    Res1920x1080,
    #[serde(rename = "3840x2160")]
    Res3840x2160,
    #[serde(rename = "4096x2160")]
    Res4096x2160,
}

impl PixelResolution {
    pub const fn width(self) -> u16 {
        match self {
            Self::Res720x480 | Self::Res720x576 => 720,
            Self::Res1280x720 => 1280,
            Self::Res1920x1080 => 1920,
            Self::Res3840x2160 => 3840,
            Self::Res4096x2160 => 4096,
        }
    }

    pub const fn height(self) -> u16 {
        match self {
            Self::Res720x480 => 480,
            Self::Res720x576 => 576,
            Self::Res1280x720 => 720,
            Self::Res1920x1080 => 1080,
            Self::Res3840x2160 | Self::Res4096x2160 => 2160,
        }
    }
}

impl std::fmt::Display for PixelResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AspectRatio {
    #[serde(rename = "4:3")]
    Ratio4x3,
    #[serde(rename = "16:9")]
    Ratio16x9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoScopicMode {
    Mode2d,
    SideBySide3d,
    TopAndBottom3d,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FrameRate {
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "24")]
    Fps24,
    #[serde(rename = "25")]
    Fps25,
    #[serde(rename = "30")]
    Fps30,
    #[serde(rename = "60")]
    Fps60,
    #[serde(rename = "23.98")]
    Fps23_98,
    #[serde(rename = "29.97")]
    Fps29_97,
    #[serde(rename = "50")]
    Fps50,
    #[serde(rename = "59.94")]
    Fps59_94,
}

impl FrameRate {
    /// Nominal rate in millihertz, `None` for [`FrameRate::Unknown`].
    pub const fn millihertz(self) -> Option<u32> {
        match self {
            Self::Unknown => None,
            Self::Fps24 => Some(24_000),
            Self::Fps25 => Some(25_000),
            Self::Fps30 => Some(30_000),
            Self::Fps60 => Some(60_000),
            Self::Fps23_98 => Some(23_976),
            Self::Fps29_97 => Some(29_970),
            Self::Fps50 => Some(50_000),
            Self::Fps59_94 => Some(59_940),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Progressive,
    Interlaced,
}

/// A named, immutable display timing as advertised to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResolutionDescriptor {
    pub name: &'static str,
    pub pixel_resolution: PixelResolution,
    pub aspect_ratio: AspectRatio,
    pub stereo_mode: StereoScopicMode,
    pub frame_rate: FrameRate,
    pub scan_mode: ScanMode,
}

impl ResolutionDescriptor {
    const fn new(
        name: &'static str,
        pixel_resolution: PixelResolution,
        aspect_ratio: AspectRatio,
        frame_rate: FrameRate,
        scan_mode: ScanMode,
    ) -> Self {
        Self {
            name,
            pixel_resolution,
            aspect_ratio,
            stereo_mode: StereoScopicMode::Mode2d,
            frame_rate,
            scan_mode,
        }
    }

    pub fn is_interlaced(&self) -> bool {
        self.scan_mode == ScanMode::Interlaced
    }
}

/// Resolutions the platform advertises, in advertising order.
pub static RESOLUTIONS: [ResolutionDescriptor; 11] = {
    use AspectRatio::*;
    use FrameRate::*;
    use PixelResolution::*;
    use ScanMode::*;
    [
        ResolutionDescriptor::new("480p", Res720x480, Ratio4x3, Fps59_94, Progressive),
        ResolutionDescriptor::new("576p50", Res720x576, Ratio4x3, Fps50, Progressive),
        ResolutionDescriptor::new("720p", Res1280x720, Ratio16x9, Fps59_94, Progressive),
        ResolutionDescriptor::new("720p50", Res1280x720, Ratio16x9, Fps50, Progressive),
        ResolutionDescriptor::new("1080i", Res1920x1080, Ratio16x9, Fps59_94, Interlaced),
        ResolutionDescriptor::new("1080i50", Res1920x1080, Ratio16x9, Fps50, Interlaced),
        ResolutionDescriptor::new("1080p24", Res1920x1080, Ratio16x9, Fps24, Progressive),
        ResolutionDescriptor::new("1080p25", Res1920x1080, Ratio16x9, Fps25, Progressive),
        ResolutionDescriptor::new("1080p30", Res1920x1080, Ratio16x9, Fps30, Progressive),
        ResolutionDescriptor::new("1080p50", Res1920x1080, Ratio16x9, Fps50, Progressive),
        ResolutionDescriptor::new("1080p60", Res1920x1080, Ratio16x9, Fps60, Progressive),
    ]
};

/// Look up a descriptor in [`RESOLUTIONS`] by exact name.
pub fn find_resolution(name: &str) -> Option<&'static ResolutionDescriptor> {
    RESOLUTIONS.iter().find(|r| r.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn resolution_names_are_unique() {
        let names: HashSet<_> = RESOLUTIONS.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RESOLUTIONS.len());
    }

    #[test]
    fn find_resolution_is_exact() {
        assert_eq!(
            find_resolution("1080i50").map(|r| r.scan_mode),
            Some(ScanMode::Interlaced)
        );
        assert!(find_resolution("1080I50").is_none());
        assert!(find_resolution("").is_none());
    }

    #[test]
    fn pixel_resolution_display_matches_geometry() {
        assert_eq!(PixelResolution::Res1920x1080.to_string(), "1920x1080");
        assert_eq!(PixelResolution::Res4096x2160.width(), 4096);
        assert_eq!(PixelResolution::Res720x576.height(), 576);
    }
}
