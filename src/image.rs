use crate::{BoundsCheckError, PixelFormat, Rgba, RgbaSource};

/// Basic wrapper around a packed pixel buffer, implementing the [`RgbaSource`] trait
#[derive(Debug, Clone)]
pub struct Image<S> {
    format: PixelFormat,
    buffer: S,
    stride: usize,
    width: usize,
    height: usize,
}

/// Everything that can go wrong when constructing an [`Image`]
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("width or height must not be zero")]
    InvalidDimensions,

    #[error(transparent)]
    BoundsCheck(#[from] BoundsCheckError),
}

impl Image<Vec<u8>> {
    pub fn blank(format: PixelFormat, width: usize, height: usize) -> Self {
        Self {
            format,
            buffer: vec![0u8; format.buffer_size(width, height)],
            stride: format.packed_stride(width),
            width,
            height,
        }
    }
}

impl<S: AsRef<[u8]>> Image<S> {
    /// Wrap `buffer`, rows are `stride` bytes apart (packed if `None`)
    pub fn from_buffer(
        format: PixelFormat,
        buffer: S,
        stride: Option<usize>,
        width: usize,
        height: usize,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions);
        }

        let stride = stride.unwrap_or_else(|| format.packed_stride(width));

        format.bounds_check(buffer.as_ref(), stride, width, height)?;

        Ok(Self {
            format,
            buffer,
            stride,
            width,
            height,
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn buffer(&self) -> &S {
        &self.buffer
    }

    pub fn into_buffer(self) -> S {
        self.buffer
    }
}

impl<S: AsMut<[u8]>> Image<S> {
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }
}

impl<S: AsRef<[u8]>> RgbaSource for Image<S> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn has_alpha(&self) -> bool {
        self.format.has_alpha()
    }

    fn read_span(&self, x: usize, y: usize, dst: &mut [Rgba]) {
        let channels = self.format.channels();
        let start = y * self.stride + x * channels;
        let end = start + dst.len() * channels;

        self.format.decode(&self.buffer.as_ref()[start..end], dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            Image::from_buffer(PixelFormat::RGBA, &[0u8; 0][..], None, 0, 4),
            Err(ImageError::InvalidDimensions)
        ));
    }

    #[test]
    fn rejects_short_buffer() {
        let buf = vec![0u8; 4 * 4 * 4 - 1];

        assert!(matches!(
            Image::from_buffer(PixelFormat::RGBA, &buf[..], None, 4, 4),
            Err(ImageError::BoundsCheck(
                BoundsCheckError::InvalidBufferSize { .. }
            ))
        ));
    }

    #[test]
    fn reads_with_custom_stride() {
        // 2x2 RGB with two bytes of padding per row
        let buf = [1, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10, 11, 12];
        let image = Image::from_buffer(PixelFormat::RGB, &buf[..], Some(8), 2, 2).unwrap();

        let mut row = [[0u8; 4]; 2];
        image.read_row(1, &mut row);
        assert_eq!(row, [[7, 8, 9, 255], [10, 11, 12, 255]]);

        let mut px = [[0u8; 4]; 1];
        image.read_span(1, 0, &mut px);
        assert_eq!(px, [[4, 5, 6, 255]]);

        assert!(!image.has_alpha());
    }
}
