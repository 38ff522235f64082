use crate::Rgba;
use crate::gamma::{gamma_to_linear, linear_to_gamma};
use crate::yuv::{UV_ROUNDING, Y_ROUNDING, rgb_to_u, rgb_to_v, rgb_to_y};

/// Gamma-corrected average of a 2x2 (or 2x1) block, scaled by 4
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Accum {
    pub(crate) r: u16,
    pub(crate) g: u16,
    pub(crate) b: u16,
}

#[inline(always)]
fn sum4(a: u8, b: u8, c: u8, d: u8) -> u16 {
    linear_to_gamma(
        gamma_to_linear(a) + gamma_to_linear(b) + gamma_to_linear(c) + gamma_to_linear(d),
        0,
    )
}

#[inline(always)]
fn sum2(a: u8, b: u8) -> u16 {
    linear_to_gamma(gamma_to_linear(a) + gamma_to_linear(b), 1)
}

/// Box filter two rows into `width.div_ceil(2)` accumulators.
///
/// If `width` is odd the last column only has the two vertically adjacent pixels. To filter a
/// single row pass it as both `row0` and `row1`.
pub(crate) fn accumulate_rgb(row0: &[Rgba], row1: &[Rgba], width: usize, dst: &mut [Accum]) {
    let pairs = width / 2;

    for ((dst, top), bottom) in dst[..pairs]
        .iter_mut()
        .zip(row0[..pairs * 2].chunks_exact(2))
        .zip(row1[..pairs * 2].chunks_exact(2))
    {
        *dst = Accum {
            r: sum4(top[0][0], top[1][0], bottom[0][0], bottom[1][0]),
            g: sum4(top[0][1], top[1][1], bottom[0][1], bottom[1][1]),
            b: sum4(top[0][2], top[1][2], bottom[0][2], bottom[1][2]),
        };
    }

    if width & 1 != 0 {
        let top = row0[width - 1];
        let bottom = row1[width - 1];

        dst[pairs] = Accum {
            r: sum2(top[0], bottom[0]),
            g: sum2(top[1], bottom[1]),
            b: sum2(top[2], bottom[2]),
        };
    }
}

pub(crate) fn convert_rows_to_uv(accum: &[Accum], dst_u: &mut [u8], dst_v: &mut [u8]) {
    for ((rgb, u), v) in accum.iter().zip(dst_u).zip(dst_v) {
        let (r, g, b) = (i32::from(rgb.r), i32::from(rgb.g), i32::from(rgb.b));

        *u = rgb_to_u(r, g, b, UV_ROUNDING);
        *v = rgb_to_v(r, g, b, UV_ROUNDING);
    }
}

pub(crate) fn convert_row_to_y(row: &[Rgba], dst: &mut [u8]) {
    for (px, y) in row.iter().zip(dst) {
        *y = rgb_to_y(
            i32::from(px[0]),
            i32::from(px[1]),
            i32::from(px[2]),
            Y_ROUNDING,
        );
    }
}
