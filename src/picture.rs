use crate::{EncodeError, verify_dimensions};
use log::debug;

/// A single row-major plane of 8 bit samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Plane {
    fn new(width: usize, height: usize) -> Result<Self, EncodeError> {
        let size = width
            .checked_mul(height)
            .ok_or(EncodeError::OutOfMemory {
                requested: usize::MAX,
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| EncodeError::OutOfMemory { requested: size })?;
        data.resize(size, 0);

        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between rows, planes are always packed
    pub fn stride(&self) -> usize {
        self.width
    }

    /// # Panics
    ///
    /// If `y` is out of bounds
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds");

        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// # Panics
    ///
    /// If `y` is out of bounds
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds");

        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Y, U and V planes of a 4:2:0 subsampled picture
///
/// The luma plane has the dimensions of the image, both chroma planes have half the width and
/// height, rounded up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    width: usize,
    height: usize,

    y: Plane,
    u: Plane,
    v: Plane,
}

impl Picture {
    /// Allocate zeroed planes for a `width` x `height` image
    pub fn new(width: usize, height: usize) -> Result<Self, EncodeError> {
        verify_dimensions(width, height)?;

        let uv_width = width.div_ceil(2);
        let uv_height = height.div_ceil(2);

        let picture = Self {
            width,
            height,
            y: Plane::new(width, height)?,
            u: Plane::new(uv_width, uv_height)?,
            v: Plane::new(uv_width, uv_height)?,
        };

        debug!("allocated {width}x{height} picture, chroma planes are {uv_width}x{uv_height}");

        Ok(picture)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn y(&self) -> &Plane {
        &self.y
    }

    pub fn u(&self) -> &Plane {
        &self.u
    }

    pub fn v(&self) -> &Plane {
        &self.v
    }

    /// Planes in Y, U, V order, packed one after another as I420
    pub fn to_i420(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.y.data.len() + self.u.data.len() + self.v.data.len());

        out.extend_from_slice(&self.y.data);
        out.extend_from_slice(&self.u.data);
        out.extend_from_slice(&self.v.data);

        out
    }

    pub(crate) fn planes_mut(&mut self) -> (&mut [u8], &mut [u8], &mut [u8]) {
        (
            self.y.as_bytes_mut(),
            self.u.as_bytes_mut(),
            self.v.as_bytes_mut(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_dimensions_round_up() {
        let picture = Picture::new(5, 3).unwrap();

        assert_eq!((picture.y().width(), picture.y().height()), (5, 3));
        assert_eq!((picture.u().width(), picture.u().height()), (3, 2));
        assert_eq!((picture.v().width(), picture.v().height()), (3, 2));
        assert_eq!(picture.to_i420().len(), 15 + 6 + 6);
    }

    #[test]
    fn rows() {
        let mut picture = Picture::new(4, 4).unwrap();

        picture.y.row_mut(2).copy_from_slice(&[1, 2, 3, 4]);

        assert_eq!(picture.y().row(2), &[1, 2, 3, 4]);
        assert_eq!(picture.y().row(1), &[0, 0, 0, 0]);
        assert_eq!(picture.y().stride(), 4);
    }

    #[test]
    fn invalid_dimensions() {
        assert!(matches!(
            Picture::new(0, 10),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Picture::new(10, crate::MAX_DIMENSION + 1),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
