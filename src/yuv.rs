//! Fixed-point BT.601 RGB to YUV (limited range) conversion.

pub const YUV_FIX: u32 = 16;
pub const YUV_HALF: i32 = 1 << (YUV_FIX - 1);

/// Rounding used for luma computed from full resolution samples
pub const Y_ROUNDING: i32 = YUV_HALF;

/// Rounding used for chroma computed from accumulated samples, which carry two extra bits
pub const UV_ROUNDING: i32 = YUV_HALF << 2;

#[inline(always)]
fn clip_uv(uv: i32, rounding: i32) -> u8 {
    let uv = (uv + rounding + (128 << (YUV_FIX + 2))) >> (YUV_FIX + 2);

    uv.clamp(0, 255) as u8
}

/// Luma from 8 bit samples. The coefficients and the `16 << 16` offset cannot leave `16..=235`
/// for valid input, so the result is not clipped.
#[inline(always)]
pub fn rgb_to_y(r: i32, g: i32, b: i32, rounding: i32) -> u8 {
    let luma = 16839 * r + 33059 * g + 6420 * b;

    ((luma + rounding + (16 << YUV_FIX)) >> YUV_FIX) as u8
}

/// U from samples scaled by 4 (see [`linear_to_gamma`](crate::gamma)), saturated to `0..=255`
#[inline(always)]
pub fn rgb_to_u(r: i32, g: i32, b: i32, rounding: i32) -> u8 {
    let u = -9719 * r - 19081 * g + 28800 * b;

    clip_uv(u, rounding)
}

/// V from samples scaled by 4 (see [`linear_to_gamma`](crate::gamma)), saturated to `0..=255`
#[inline(always)]
pub fn rgb_to_v(r: i32, g: i32, b: i32, rounding: i32) -> u8 {
    let v = 28800 * r - 24116 * g - 4684 * b;

    clip_uv(v, rounding)
}
