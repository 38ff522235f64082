use crate::{Rgba, RgbaSource};

/// Error indicating an invalid [`Window`] for a given source
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("the given window coordinates go out of the parent's image bounds")]
    WindowSizeOutOfBounds,

    #[error("the window must not be empty")]
    EmptyWindow,
}

/// Rect used to mark the "cropping" window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Wrapper around an [`RgbaSource`] and a [`Window`] cropping the wrapped source
pub struct Cropped<T>(T, Window);

impl<T: RgbaSource> Cropped<T> {
    pub fn new(t: T, window: Window) -> Result<Self, CropError> {
        if window.width == 0 || window.height == 0 {
            return Err(CropError::EmptyWindow);
        }

        let w = window
            .x
            .checked_add(window.width)
            .ok_or(CropError::WindowSizeOutOfBounds)?;

        let h = window
            .y
            .checked_add(window.height)
            .ok_or(CropError::WindowSizeOutOfBounds)?;

        if (w > t.width()) || (h > t.height()) {
            return Err(CropError::WindowSizeOutOfBounds);
        }

        Ok(Self(t, window))
    }

    pub fn window(&self) -> Window {
        self.1
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: RgbaSource> RgbaSource for Cropped<T> {
    fn width(&self) -> usize {
        self.1.width
    }

    fn height(&self) -> usize {
        self.1.height
    }

    fn has_alpha(&self) -> bool {
        self.0.has_alpha()
    }

    fn read_span(&self, x: usize, y: usize, dst: &mut [Rgba]) {
        self.0.read_span(self.1.x + x, self.1.y + y, dst)
    }
}
