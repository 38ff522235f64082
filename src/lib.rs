//! Color conversion and container framing core of a WebP encoder.
//!
//! [`Encoder::import`] turns any [`RgbaSource`] into a [`Picture`] of Y, U and V planes using
//! gamma-correct 2x2 box filtered chroma subsampling. The downstream coder writes its payload
//! into [`Encoder::writer_mut`], and [`Encoder::finish`] wraps it into a RIFF/WebP stream.

pub use bit_writer::{BitWriter, Vp8BitWriter, Vp8lBitWriter};
pub use buffer::GrowableBuffer;
pub use container::write_framed_stream;
pub use crop::{CropError, Cropped, Window};
pub use encoder::{AlphaMode, Encoder, EncoderConfig};
pub use self::image::{Image, ImageError};
pub use import::import_rgba;
#[cfg(feature = "multi-thread")]
pub use multi_thread::import_rgba_multi_thread;
pub use picture::{Picture, Plane};
pub use pixel_format::{BoundsCheckError, PixelFormat};
pub use source::{Rgba, RgbaSource, RgbaSourceExt};

mod accumulate;
mod bit_writer;
mod buffer;
mod container;
mod crop;
mod encoder;
mod gamma;
mod image;
mod import;
pub mod lzw;
#[cfg(feature = "multi-thread")]
mod multi_thread;
mod picture;
mod pixel_format;
mod source;
pub mod yuv;

/// Largest width or height a WebP bitstream can describe
pub const MAX_DIMENSION: usize = 16383;

/// Everything that can go wrong while importing a picture or writing the encoded stream
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid dimensions {width}x{height}, both must be within 1..={MAX_DIMENSION}")]
    InvalidDimensions { width: usize, height: usize },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error("failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("unsupported input: {0}")]
    Unsupported(&'static str),

    #[error("the bit writer was already finished")]
    WriterFinished,

    #[error("byte writes require a byte aligned bit writer, {pending} bits are pending")]
    UnalignedWrite { pending: u32 },

    #[error("payload of {0} bytes does not fit into a RIFF container")]
    PayloadTooLarge(usize),

    #[error("a picture was already imported into this encoder")]
    AlreadyImported,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn verify_dimensions(width: usize, height: usize) -> Result<(), EncodeError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    Ok(())
}
