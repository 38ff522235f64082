use crate::Rgba;

/// Supported layouts of packed source buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelFormat {
    /// Single RGBA interleaved plane
    RGBA,

    /// Single BGRA interleaved plane
    BGRA,

    /// Single RGB interleaved plane
    RGB,

    /// Single BGR interleaved plane
    BGR,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::RGBA | PixelFormat::BGRA => 4,
            PixelFormat::RGB | PixelFormat::BGR => 3,
        }
    }

    pub fn has_alpha(self) -> bool {
        self.channels() == 4
    }

    /// Stride of a row without any padding
    pub fn packed_stride(self, width: usize) -> usize {
        width.saturating_mul(self.channels())
    }

    /// Calculate the required buffer size given the [`PixelFormat`] self and image dimensions (in pixel width, height).
    pub fn buffer_size(self, width: usize, height: usize) -> usize {
        self.packed_stride(width).saturating_mul(height)
    }

    /// Check if the given buffer and stride are valid for the dimensions
    pub fn bounds_check(
        self,
        buffer: &[u8],
        stride: usize,
        width: usize,
        height: usize,
    ) -> Result<(), BoundsCheckError> {
        // Ensure stride is not smaller than the width would allow
        let min_stride = self.packed_stride(width);

        if min_stride > stride {
            return Err(BoundsCheckError::InvalidStride {
                minimum: min_stride,
                got: stride,
            });
        }

        // The last row doesn't need the padding
        let min_len = stride
            .saturating_mul(height.saturating_sub(1))
            .saturating_add(min_stride);

        if min_len > buffer.len() {
            return Err(BoundsCheckError::InvalidBufferSize {
                minimum: min_len,
                got: buffer.len(),
            });
        }

        Ok(())
    }

    /// Expand packed pixels of this format into RGBA
    pub(crate) fn decode(self, src: &[u8], dst: &mut [Rgba]) {
        match self {
            PixelFormat::RGBA => {
                for (px, src) in dst.iter_mut().zip(src.chunks_exact(4)) {
                    *px = [src[0], src[1], src[2], src[3]];
                }
            }
            PixelFormat::BGRA => {
                for (px, src) in dst.iter_mut().zip(src.chunks_exact(4)) {
                    *px = [src[2], src[1], src[0], src[3]];
                }
            }
            PixelFormat::RGB => {
                for (px, src) in dst.iter_mut().zip(src.chunks_exact(3)) {
                    *px = [src[0], src[1], src[2], u8::MAX];
                }
            }
            PixelFormat::BGR => {
                for (px, src) in dst.iter_mut().zip(src.chunks_exact(3)) {
                    *px = [src[2], src[1], src[0], u8::MAX];
                }
            }
        }
    }

    pub fn variants() -> impl IntoIterator<Item = Self> {
        use PixelFormat::*;

        [RGBA, BGRA, RGB, BGR]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsCheckError {
    #[error("invalid stride, expected it to be at least {minimum}, but got {got}")]
    InvalidStride { minimum: usize, got: usize },

    #[error("invalid buffer size, expected it to be at least {minimum}, but got {got}")]
    InvalidBufferSize { minimum: usize, got: usize },
}
