use crate::import::{convert_rows, verify_source};
use crate::{AlphaMode, EncodeError, Picture, RgbaSource, import_rgba};
use log::trace;
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

/// Same as [`import_rgba`] but converts bands of row pairs on the rayon thread pool.
///
/// The output is identical to the single threaded conversion.
#[inline(never)]
pub fn import_rgba_multi_thread<S: RgbaSource + Sync + ?Sized>(
    src: &S,
    alpha_mode: AlphaMode,
) -> Result<Picture, EncodeError> {
    let threads = num_cpus::get();

    if threads == 1 {
        return import_rgba(src, alpha_mode);
    }

    verify_source(src, alpha_mode)?;

    let width = src.width();
    let uv_width = width.div_ceil(2);

    let pairs_per_band = src.height().div_ceil(2).div_ceil(threads);

    let mut picture = Picture::new(width, src.height())?;
    let (y, u, v) = picture.planes_mut();

    y.par_chunks_mut(pairs_per_band * 2 * width)
        .zip(u.par_chunks_mut(pairs_per_band * uv_width))
        .zip(v.par_chunks_mut(pairs_per_band * uv_width))
        .enumerate()
        .for_each(|(band, ((y, u), v))| {
            let first_row = band * pairs_per_band * 2;

            trace!("converting band {band} starting at row {first_row}");

            convert_rows(src, first_row, y, u, v);
        });

    Ok(picture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Image, PixelFormat};

    #[test]
    fn matches_single_threaded() {
        for (width, height) in [(1, 1), (7, 5), (64, 33), (129, 130)] {
            let mut image = Image::blank(PixelFormat::RGB, width, height);

            for (i, b) in image.buffer_mut().iter_mut().enumerate() {
                *b = (i * 31 % 251) as u8;
            }

            let single = import_rgba(&image, AlphaMode::Reject).unwrap();
            let multi = import_rgba_multi_thread(&image, AlphaMode::Reject).unwrap();

            assert_eq!(single, multi, "{width}x{height}");
        }
    }
}
