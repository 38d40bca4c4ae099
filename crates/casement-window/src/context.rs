use crate::config::{FALLBACK_VERSIONS, GlVersion, WindowConfig};
use crate::error::WindowError;

/// The wgpu limits profile a version tier requires from the adapter.
///
/// 4.6 expects a full desktop-class device, 4.3 the downlevel defaults and
/// 3.3 the webgl2-era downlevel defaults.
pub(crate) fn limits_for_version(version: GlVersion) -> wgpu::Limits {
    match (version.major, version.minor) {
        (4, 6) => wgpu::Limits::default(),
        (4, 3) => wgpu::Limits::downlevel_defaults(),
        _ => wgpu::Limits::downlevel_webgl2_defaults(),
    }
}

/// Walk the fallback chain from the requested tier down and return the
/// first tier the adapter supports.
pub(crate) fn resolve_version(
    requested: GlVersion,
    supports: impl Fn(GlVersion) -> bool,
) -> Option<GlVersion> {
    FALLBACK_VERSIONS
        .iter()
        .copied()
        .filter(|version| *version <= requested)
        .find(|version| supports(*version))
}

/// The native graphics connection owned by a window.
///
/// One context per window; nothing here is shared across instances. The
/// instance/adapter/device/queue quartet is exposed to the backends and to
/// the framebuffer and readback helpers, not to consumers.
pub struct GraphicsContext {
    pub(crate) instance: wgpu::Instance,
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    version: GlVersion,
}

impl GraphicsContext {
    /// Create a context, resolving the requested version through the
    /// fallback chain.
    ///
    /// With `compatible_surface` set the adapter is required to be able to
    /// present to that surface; headless creation passes `None` and works
    /// without any display server.
    pub fn new(
        config: &WindowConfig,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, WindowError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self::with_instance(instance, config, compatible_surface)
    }

    /// Create a context on an existing instance.
    ///
    /// The interactive backend creates the instance first so the surface
    /// can exist before adapter selection.
    pub fn with_instance(
        instance: wgpu::Instance,
        config: &WindowConfig,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, WindowError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface,
            force_fallback_adapter: false,
        }))
        .map_err(|e| WindowError::context(format!("no suitable GPU adapter: {}", e)))?;

        let adapter_limits = adapter.limits();
        let version = resolve_version(config.gl_version, |candidate| {
            limits_for_version(candidate).check_limits(&adapter_limits)
        })
        .ok_or_else(|| {
            WindowError::context(format!(
                "adapter '{}' supports no fallback of requested version {}",
                adapter.get_info().name,
                config.gl_version
            ))
        })?;

        if version != config.gl_version {
            tracing::warn!(
                requested = %config.gl_version,
                resolved = %version,
                "requested context version unavailable, fell back"
            );
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("casement device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits_for_version(version).using_resolution(adapter_limits),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            ..Default::default()
        }))
        .map_err(|e| WindowError::context(format!("failed to create device: {}", e)))?;

        tracing::info!(
            adapter = %adapter.get_info().name,
            backend = ?adapter.get_info().backend,
            version = %version,
            "created graphics context"
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            version,
        })
    }

    /// The version tier that was actually created, after fallback.
    pub fn version(&self) -> GlVersion {
        self.version
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Adapter info for diagnostics.
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_version_when_supported() {
        let resolved = resolve_version(GlVersion::new(4, 6), |_| true);
        assert_eq!(resolved, Some(GlVersion::new(4, 6)));
    }

    #[test]
    fn falls_back_to_lowest_supported() {
        // Adapter that only supports the 3.3 tier.
        let resolved = resolve_version(GlVersion::new(4, 6), |v| v == GlVersion::new(3, 3));
        assert_eq!(resolved, Some(GlVersion::new(3, 3)));
    }

    #[test]
    fn never_falls_upward() {
        // Requesting 3.3 must not resolve to a higher tier even if the
        // adapter supports one.
        let resolved = resolve_version(GlVersion::new(3, 3), |v| v == GlVersion::new(4, 6));
        assert_eq!(resolved, None);
    }

    #[test]
    fn exhausted_chain_is_none() {
        let resolved = resolve_version(GlVersion::new(4, 6), |_| false);
        assert_eq!(resolved, None);
    }

    #[test]
    fn version_tiers_map_to_distinct_limits() {
        let full = limits_for_version(GlVersion::new(4, 6));
        let webgl2 = limits_for_version(GlVersion::new(3, 3));
        assert!(full.max_texture_dimension_2d > webgl2.max_texture_dimension_2d);
    }
}
