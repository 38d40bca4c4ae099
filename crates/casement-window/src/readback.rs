//! Copying the default framebuffer's color attachment back to the CPU.
//!
//! Headless rendering is only useful if the result can leave the GPU, so
//! the readback path is part of the core: it copies the color attachment
//! into a mapped staging buffer and strips the row padding wgpu requires.

use crate::context::GraphicsContext;

/// Framebuffer readback error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadbackError {
    /// Buffer mapping failed
    MapFailed(String),
    /// Image encoding failed
    EncodeFailed(String),
    /// IO error
    IoError(String),
    /// Invalid dimensions
    InvalidDimensions,
    /// Unsupported format
    UnsupportedFormat,
}

impl std::fmt::Display for ReadbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapFailed(msg) => write!(f, "buffer mapping failed: {}", msg),
            Self::EncodeFailed(msg) => write!(f, "image encoding failed: {}", msg),
            Self::IoError(msg) => write!(f, "io error: {}", msg),
            Self::InvalidDimensions => write!(f, "invalid dimensions for readback"),
            Self::UnsupportedFormat => write!(f, "unsupported texture format for readback"),
        }
    }
}

impl std::error::Error for ReadbackError {}

/// A staged copy of a color attachment, ready to be mapped.
pub struct Readback {
    buffer: wgpu::Buffer,
    dimensions: (u32, u32),
    bytes_per_row: u32,
}

impl Readback {
    /// Stage a copy of `texture` (RGBA8-class formats only).
    pub fn from_texture(
        context: &GraphicsContext,
        texture: &wgpu::Texture,
    ) -> Result<Self, ReadbackError> {
        let size = texture.size();
        let dimensions = (size.width, size.height);

        if dimensions.0 == 0 || dimensions.1 == 0 {
            return Err(ReadbackError::InvalidDimensions);
        }

        let bytes_per_pixel = match texture.format() {
            wgpu::TextureFormat::Rgba8Unorm
            | wgpu::TextureFormat::Rgba8UnormSrgb
            | wgpu::TextureFormat::Bgra8Unorm
            | wgpu::TextureFormat::Bgra8UnormSrgb => 4u32,
            _ => return Err(ReadbackError::UnsupportedFormat),
        };

        // Rows must be aligned to COPY_BYTES_PER_ROW_ALIGNMENT.
        let unpadded_bytes_per_row = dimensions.0 * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer_size = (bytes_per_row * dimensions.1) as wgpu::BufferAddress;
        let buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(dimensions.1),
                },
            },
            size,
        );

        context.queue.submit(std::iter::once(encoder.finish()));

        Ok(Self {
            buffer,
            dimensions,
            bytes_per_row,
        })
    }

    /// Map the staging buffer and return tightly packed RGBA bytes.
    ///
    /// Blocks until the GPU has finished the copy.
    pub fn read(&self, context: &GraphicsContext) -> Result<Vec<u8>, ReadbackError> {
        let buffer_slice = self.buffer.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let _ = context.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(ReadbackError::MapFailed(format!("{}", e))),
            Err(_) => {
                return Err(ReadbackError::MapFailed(
                    "map callback never fired".to_string(),
                ));
            }
        }

        let data = buffer_slice.get_mapped_range();
        let bytes_per_pixel = 4;
        let mut result =
            Vec::with_capacity((self.dimensions.0 * self.dimensions.1 * bytes_per_pixel) as usize);

        for y in 0..self.dimensions.1 {
            let row_start = (y * self.bytes_per_row) as usize;
            let row_end = row_start + (self.dimensions.0 * bytes_per_pixel) as usize;
            result.extend_from_slice(&data[row_start..row_end]);
        }

        drop(data);
        self.buffer.unmap();

        Ok(result)
    }

    /// Save the readback as a PNG file.
    #[cfg(feature = "image")]
    pub fn save_png(
        &self,
        context: &GraphicsContext,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), ReadbackError> {
        let data = self.read(context)?;

        let img = image::RgbaImage::from_raw(self.dimensions.0, self.dimensions.1, data).ok_or(
            ReadbackError::EncodeFailed("failed to build image from raw data".to_string()),
        )?;

        img.save(path)
            .map_err(|e| ReadbackError::IoError(format!("{}", e)))?;

        Ok(())
    }

    /// Dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ReadbackError::MapFailed("timeout".to_string());
        assert!(format!("{}", err).contains("buffer mapping failed"));
        assert!(format!("{}", ReadbackError::InvalidDimensions).contains("invalid dimensions"));
    }

    #[test]
    fn bytes_per_row_alignment() {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        // 100 px * 4 bytes = 400 bytes, padded to the next multiple of 256
        let unpadded: u32 = 100 * 4;
        let padded = unpadded.div_ceil(align) * align;
        assert_eq!(padded, 512);
        assert_eq!(padded % align, 0);
    }
}
