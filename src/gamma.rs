//! Fixed-point gamma tables used to average samples in linear light.
//!
//! Samples are expanded with [`gamma_to_linear`] into a 12 bit linear domain, summed, and then
//! compressed back with [`linear_to_gamma`]. The inverse table only has 33 entries, the values in
//! between are bilinearly interpolated. Both the tables and the interpolation must stay exactly
//! as they are, any change alters the produced chroma planes.

/// Precision of the linear domain
const GAMMA_FIX: u32 = 12;

/// Fractional bits of the interpolation position
const GAMMA_TAB_FIX: u32 = 7;
const GAMMA_TAB_SCALE: u32 = 1 << GAMMA_TAB_FIX;
const GAMMA_TAB_ROUNDER: u32 = GAMMA_TAB_SCALE >> 1;
const GAMMA_TAB_SIZE: usize = 1 << (GAMMA_FIX - GAMMA_TAB_FIX);

/// `round((v / 255) ^ 0.8 * 4095)`
static GAMMA_TO_LINEAR_TAB: [u16; 256] = [
    0, 49, 85, 117, 147, 176, 204, 231, 257, 282, 307, 331, 355, 379, 402, 425,
    447, 469, 491, 513, 534, 556, 577, 598, 618, 639, 659, 679, 699, 719, 739, 759,
    778, 798, 817, 836, 855, 874, 893, 912, 930, 949, 967, 986, 1004, 1022, 1040, 1059,
    1077, 1094, 1112, 1130, 1148, 1165, 1183, 1200, 1218, 1235, 1252, 1270, 1287, 1304, 1321, 1338,
    1355, 1372, 1389, 1406, 1422, 1439, 1456, 1472, 1489, 1505, 1522, 1538, 1555, 1571, 1587, 1604,
    1620, 1636, 1652, 1668, 1684, 1700, 1716, 1732, 1748, 1764, 1780, 1796, 1812, 1827, 1843, 1859,
    1874, 1890, 1905, 1921, 1937, 1952, 1967, 1983, 1998, 2014, 2029, 2044, 2059, 2075, 2090, 2105,
    2120, 2135, 2151, 2166, 2181, 2196, 2211, 2226, 2241, 2256, 2270, 2285, 2300, 2315, 2330, 2345,
    2359, 2374, 2389, 2403, 2418, 2433, 2447, 2462, 2477, 2491, 2506, 2520, 2535, 2549, 2564, 2578,
    2592, 2607, 2621, 2636, 2650, 2664, 2679, 2693, 2707, 2721, 2736, 2750, 2764, 2778, 2792, 2806,
    2820, 2835, 2849, 2863, 2877, 2891, 2905, 2919, 2933, 2947, 2961, 2975, 2988, 3002, 3016, 3030,
    3044, 3058, 3072, 3085, 3099, 3113, 3127, 3140, 3154, 3168, 3182, 3195, 3209, 3222, 3236, 3250,
    3263, 3277, 3291, 3304, 3318, 3331, 3345, 3358, 3372, 3385, 3399, 3412, 3426, 3439, 3452, 3466,
    3479, 3493, 3506, 3519, 3533, 3546, 3559, 3573, 3586, 3599, 3612, 3626, 3639, 3652, 3665, 3678,
    3692, 3705, 3718, 3731, 3744, 3757, 3771, 3784, 3797, 3810, 3823, 3836, 3849, 3862, 3875, 3888,
    3901, 3914, 3927, 3940, 3953, 3966, 3979, 3992, 4005, 4018, 4031, 4044, 4056, 4069, 4082, 4095,
];

/// `round(255 * (v * 128 / 4095) ^ (1 / 0.8))`
static LINEAR_TO_GAMMA_TAB: [u32; GAMMA_TAB_SIZE + 1] = [
    0, 3, 8, 13, 19, 25, 31, 38, 45, 52, 60,
    67, 75, 83, 91, 99, 107, 116, 124, 133, 142, 151,
    160, 169, 178, 187, 197, 206, 216, 226, 235, 245, 255,
];

#[inline(always)]
pub(crate) fn gamma_to_linear(v: u8) -> u32 {
    u32::from(GAMMA_TO_LINEAR_TAB[usize::from(v)])
}

#[inline(always)]
fn interpolate(v: u32) -> u32 {
    let tab_pos = (v >> (GAMMA_TAB_FIX + 2)) as usize;
    let x = v & ((GAMMA_TAB_SCALE << 2) - 1);

    debug_assert!(tab_pos + 1 < GAMMA_TAB_SIZE + 1);

    let v0 = LINEAR_TO_GAMMA_TAB[tab_pos];
    let v1 = LINEAR_TO_GAMMA_TAB[tab_pos + 1];

    v1 * x + v0 * ((GAMMA_TAB_SCALE << 2) - x)
}

/// Compress a sum of linear values back into gamma space.
///
/// `shift` is 0 for a sum of four samples and 1 for a sum of two. The result carries two extra
/// fractional bits (range `0..=1020`), which is the scale `rgb_to_u`/`rgb_to_v` expect with
/// [`YUV_HALF << 2`](crate::yuv::YUV_HALF) rounding.
#[inline(always)]
pub(crate) fn linear_to_gamma(base_value: u32, shift: u32) -> u16 {
    let y = interpolate(base_value << shift);

    ((y + GAMMA_TAB_ROUNDER) >> GAMMA_TAB_FIX) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAMMA: f64 = 0.80;

    #[test]
    fn tables_match_generator() {
        let scale = f64::from((1u32 << GAMMA_FIX) - 1);

        for (v, &tab) in GAMMA_TO_LINEAR_TAB.iter().enumerate() {
            let expected = ((v as f64 / 255.0).powf(GAMMA) * scale + 0.5) as u16;
            assert_eq!(tab, expected, "gamma to linear entry {v}");
        }

        let step = f64::from(GAMMA_TAB_SCALE) / scale;

        for (v, &tab) in LINEAR_TO_GAMMA_TAB.iter().enumerate() {
            let expected = (255.0 * (step * v as f64).powf(1.0 / GAMMA) + 0.5) as u32;
            assert_eq!(tab, expected, "linear to gamma entry {v}");
        }
    }

    #[test]
    fn endpoints() {
        assert_eq!(linear_to_gamma(0, 0), 0);
        assert_eq!(linear_to_gamma(4 * gamma_to_linear(255), 0), 1020);
        assert_eq!(linear_to_gamma(2 * gamma_to_linear(255), 1), 1020);
    }

    #[test]
    fn two_and_four_sample_sums_agree() {
        for v in 0..=255u8 {
            let l = gamma_to_linear(v);

            assert_eq!(linear_to_gamma(4 * l, 0), linear_to_gamma(2 * l, 1));
        }
    }

    #[test]
    fn monotonic() {
        let mut prev = 0;

        for sum in 0..=4 * gamma_to_linear(255) {
            let v = linear_to_gamma(sum, 0);
            assert!(v >= prev);
            prev = v;
        }
    }
}
