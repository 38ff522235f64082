use crate::accumulate::{Accum, accumulate_rgb, convert_row_to_y, convert_rows_to_uv};
use crate::{AlphaMode, EncodeError, Picture, RgbaSource, verify_dimensions};
use log::warn;

/// Convert an RGBA source into a 4:2:0 [`Picture`].
///
/// Rows are processed in pairs. Each pair produces two rows of luma and one row of chroma, the
/// chroma being the gamma-corrected 2x2 average of the pair. With an odd height the last row is
/// paired with itself.
///
/// Sources with alpha are checked before anything is allocated, see [`AlphaMode`].
pub fn import_rgba<S: RgbaSource + ?Sized>(
    src: &S,
    alpha_mode: AlphaMode,
) -> Result<Picture, EncodeError> {
    verify_source(src, alpha_mode)?;

    let mut picture = Picture::new(src.width(), src.height())?;

    let (y, u, v) = picture.planes_mut();
    convert_rows(src, 0, y, u, v);

    Ok(picture)
}

/// Reject everything the conversion can't handle correctly
pub(crate) fn verify_source<S: RgbaSource + ?Sized>(
    src: &S,
    alpha_mode: AlphaMode,
) -> Result<(), EncodeError> {
    verify_dimensions(src.width(), src.height())?;

    if !src.has_alpha() {
        return Ok(());
    }

    match alpha_mode {
        AlphaMode::Ignore => {
            warn!("discarding alpha of {}x{} source", src.width(), src.height());
        }
        AlphaMode::Reject => {
            let mut row = vec![[0u8; 4]; src.width()];

            for y in 0..src.height() {
                src.read_row(y, &mut row);

                if row.iter().any(|px| px[3] != u8::MAX) {
                    return Err(EncodeError::Unsupported(
                        "alpha-weighted chroma accumulation of translucent pixels",
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Fill the given plane slices starting at source row `first_row`, which must be even.
///
/// `y_plane` holds whole luma rows, `u_plane`/`v_plane` the matching chroma rows.
pub(crate) fn convert_rows<S: RgbaSource + ?Sized>(
    src: &S,
    first_row: usize,
    y_plane: &mut [u8],
    u_plane: &mut [u8],
    v_plane: &mut [u8],
) {
    debug_assert_eq!(first_row % 2, 0);

    let width = src.width();
    let uv_width = width.div_ceil(2);

    let mut row0 = vec![[0u8; 4]; width];
    let mut row1 = vec![[0u8; 4]; width];
    let mut accum = vec![Accum::default(); uv_width];

    let pairs = y_plane
        .chunks_mut(width * 2)
        .zip(u_plane.chunks_exact_mut(uv_width))
        .zip(v_plane.chunks_exact_mut(uv_width));

    for (i, ((y_rows, u_row), v_row)) in pairs.enumerate() {
        let y = first_row + i * 2;
        let (y_top, y_bottom) = y_rows.split_at_mut(width);

        src.read_row(y, &mut row0);
        convert_row_to_y(&row0, y_top);

        if y_bottom.is_empty() {
            accumulate_rgb(&row0, &row0, width, &mut accum);
        } else {
            src.read_row(y + 1, &mut row1);
            convert_row_to_y(&row1, y_bottom);

            accumulate_rgb(&row0, &row1, width, &mut accum);
        }

        convert_rows_to_uv(&accum, u_row, v_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Image, PixelFormat};

    fn solid(format: PixelFormat, width: usize, height: usize, px: &[u8]) -> Image<Vec<u8>> {
        let mut image = Image::blank(format, width, height);

        for chunk in image.buffer_mut().chunks_exact_mut(px.len()) {
            chunk.copy_from_slice(px);
        }

        image
    }

    #[test]
    fn solid_color_planes() {
        let image = solid(PixelFormat::RGB, 5, 3, &[255, 0, 0]);
        let picture = import_rgba(&image, AlphaMode::Reject).unwrap();

        assert!(picture.y().as_bytes().iter().all(|&y| y == 82));
        assert!(picture.u().as_bytes().iter().all(|&u| u == 90));
        assert!(picture.v().as_bytes().iter().all(|&v| v == 240));
    }

    #[test]
    fn odd_height_duplicates_last_row() {
        // Top pair is black, the last (unpaired) row is white
        let mut image = solid(PixelFormat::RGBA, 2, 3, &[0, 0, 0, 255]);
        image.buffer_mut()[16..].fill(255);

        let picture = import_rgba(&image, AlphaMode::Reject).unwrap();

        assert_eq!(picture.y().row(2), &[235, 235]);
        assert_eq!(picture.u().height(), 2);
        assert_eq!(picture.u().row(1), &[128]);
        assert_eq!(picture.v().row(1), &[128]);
    }

    #[test]
    fn translucent_pixels_are_rejected() {
        let mut image = solid(PixelFormat::RGBA, 4, 4, &[10, 20, 30, 255]);
        image.buffer_mut()[4 * 4 * 3 + 3] = 128;

        assert!(matches!(
            import_rgba(&image, AlphaMode::Reject),
            Err(EncodeError::Unsupported(_))
        ));

        let ignored = import_rgba(&image, AlphaMode::Ignore).unwrap();
        let opaque = import_rgba(
            &solid(PixelFormat::RGBA, 4, 4, &[10, 20, 30, 255]),
            AlphaMode::Reject,
        )
        .unwrap();

        assert_eq!(ignored, opaque);
    }

    #[test]
    fn swizzled_formats_agree() {
        let rgba = solid(PixelFormat::RGBA, 3, 3, &[200, 100, 50, 255]);
        let bgra = solid(PixelFormat::BGRA, 3, 3, &[50, 100, 200, 255]);
        let rgb = solid(PixelFormat::RGB, 3, 3, &[200, 100, 50]);
        let bgr = solid(PixelFormat::BGR, 3, 3, &[50, 100, 200]);

        let expected = import_rgba(&rgba, AlphaMode::Reject).unwrap();

        assert_eq!(import_rgba(&bgra, AlphaMode::Reject).unwrap(), expected);
        assert_eq!(import_rgba(&rgb, AlphaMode::Reject).unwrap(), expected);
        assert_eq!(import_rgba(&bgr, AlphaMode::Reject).unwrap(), expected);
    }
}
