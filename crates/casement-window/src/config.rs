use casement_core::geometry::Size;

use crate::error::WindowError;

/// A requested context version tier.
///
/// wgpu has no GL-style version negotiation, so a version names a capability
/// tier that is mapped to a wgpu limits profile at creation time (see
/// [`crate::context`]). The tiers form the documented fallback chain
/// 4.6 → 4.3 → 3.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Fallback chain walked when the requested version is unavailable,
/// highest tier first.
pub const FALLBACK_VERSIONS: [GlVersion; 3] = [
    GlVersion::new(4, 6),
    GlVersion::new(4, 3),
    GlVersion::new(3, 3),
];

/// Window and context creation parameters.
///
/// Consumers override any subset of the defaults. The configuration is
/// validated and resolved once at creation and never mutated afterwards.
/// Color and depth attachments use fixed formats (`Rgba8UnormSrgb`,
/// `Depth32Float`), so bit depths are not configurable here.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Initial drawable size in pixels. Both components must be positive.
    pub size: Size<u32>,
    pub title: String,
    /// Requested context tier; creation falls back through
    /// [`FALLBACK_VERSIONS`] below it before giving up.
    pub gl_version: GlVersion,
    /// MSAA sample count: 0 (off) or a power of two.
    pub samples: u32,
    pub vsync: bool,
    pub resizable: bool,
    pub cursor_visible: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: Size::new(1280, 720),
            title: "Casement".to_string(),
            gl_version: GlVersion::new(4, 6),
            samples: 0,
            vsync: true,
            resizable: true,
            cursor_visible: true,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    /// Check the invariants every backend relies on.
    ///
    /// Called by the backends before any native resource is touched, so a
    /// bad configuration fails before a window exists.
    pub fn validate(&self) -> Result<(), WindowError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(WindowError::context(format!(
                "window size must be positive, got {}x{}",
                self.size.width, self.size.height
            )));
        }
        if self.samples != 0 && !self.samples.is_power_of_two() {
            return Err(WindowError::context(format!(
                "sample count must be zero or a power of two, got {}",
                self.samples
            )));
        }
        if !FALLBACK_VERSIONS.contains(&self.gl_version) {
            return Err(WindowError::context(format!(
                "unsupported context version {}, supported tiers: 4.6, 4.3, 3.3",
                self.gl_version
            )));
        }
        Ok(())
    }

    /// Effective sample count for texture creation (0 means no MSAA).
    pub(crate) fn sample_count(&self) -> u32 {
        self.samples.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WindowConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_size() {
        let config = WindowConfig {
            size: Size::new(0, 600),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WindowError::ContextCreation(_))
        ));
    }

    #[test]
    fn rejects_non_power_of_two_samples() {
        let config = WindowConfig {
            samples: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WindowConfig {
            samples: 4,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_version() {
        let config = WindowConfig {
            gl_version: GlVersion::new(2, 1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
