use crate::{CropError, Cropped, Window};

/// A single pixel as red, green, blue and alpha samples
pub type Rgba = [u8; 4];

/// Anything that can produce rows of RGBA pixels.
///
/// Implementations must return the same pixels for the same coordinates on every call.
pub trait RgbaSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Whether pixels may carry an alpha value other than 255
    fn has_alpha(&self) -> bool;

    /// Decode `dst.len()` pixels of row `y`, starting at column `x`
    ///
    /// Callers guarantee that `x + dst.len() <= width` and `y < height`.
    fn read_span(&self, x: usize, y: usize, dst: &mut [Rgba]);

    /// Decode the first `dst.len()` pixels of row `y`
    fn read_row(&self, y: usize, dst: &mut [Rgba]) {
        self.read_span(0, y, dst)
    }
}

/// [`RgbaSource`] extension methods
pub trait RgbaSourceExt: RgbaSource {
    /// Crop the source with the given window
    fn crop(self, window: Window) -> Result<Cropped<Self>, CropError>
    where
        Self: Sized,
    {
        Cropped::new(self, window)
    }
}

impl<T: RgbaSource + ?Sized> RgbaSourceExt for T {}

impl<T: RgbaSource + ?Sized> RgbaSource for &T {
    fn width(&self) -> usize {
        <T as RgbaSource>::width(self)
    }

    fn height(&self) -> usize {
        <T as RgbaSource>::height(self)
    }

    fn has_alpha(&self) -> bool {
        <T as RgbaSource>::has_alpha(self)
    }

    fn read_span(&self, x: usize, y: usize, dst: &mut [Rgba]) {
        <T as RgbaSource>::read_span(self, x, y, dst)
    }
}

impl<T: RgbaSource + ?Sized> RgbaSource for Box<T> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn has_alpha(&self) -> bool {
        (**self).has_alpha()
    }

    fn read_span(&self, x: usize, y: usize, dst: &mut [Rgba]) {
        (**self).read_span(x, y, dst)
    }
}
