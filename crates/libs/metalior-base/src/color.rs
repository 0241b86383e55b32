//! Conversions of linear reflectance colours to display values.

use crate::math::Rgb;

/// Encodes a linear value with the sRGB transfer function.
///
/// The input is clamped to [0, 1] first.
pub fn encode_srgb(linear: f64) -> f64 {
    let c = if linear.is_nan() {
        0.0
    } else {
        linear.clamp(0.0, 1.0)
    };
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Encodes a linear colour with the sRGB transfer function per channel.
pub fn encode_srgb_rgb(linear: Rgb) -> Rgb {
    Rgb::new(
        encode_srgb(linear.x),
        encode_srgb(linear.y),
        encode_srgb(linear.z),
    )
}

/// Quantises a colour in [0, 1] to 8 bits per channel, rounding to nearest.
pub fn to_rgb8(c: Rgb) -> [u8; 3] {
    let q = |v: f64| {
        if v.is_nan() {
            0
        } else {
            (v.clamp(0.0, 1.0) * 255.0 + 0.5).floor() as u8
        }
    };
    [q(c.x), q(c.y), q(c.z)]
}

/// Truncates a colour in [0, 1] to 8 bits per channel as used in the preset
/// report (`floor(c * 255)`).
pub fn to_rgb8_floor(c: Rgb) -> [u8; 3] {
    let q = |v: f64| {
        if v.is_nan() {
            0
        } else {
            (v.clamp(0.0, 1.0) * 255.0).floor() as u8
        }
    };
    [q(c.x), q(c.y), q(c.z)]
}

/// Returns the web colour (`RRGGBB`) of a linear colour, encoded in sRGB.
pub fn srgb_hex(linear: Rgb) -> String {
    let [r, g, b] = to_rgb8(encode_srgb_rgb(linear));
    format!("{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::abs_diff_eq;

    #[test]
    fn srgb_endpoints() {
        assert_eq!(encode_srgb(0.0), 0.0);
        assert!(abs_diff_eq!(encode_srgb(1.0), 1.0, epsilon = 1e-12));
        assert!(abs_diff_eq!(encode_srgb(0.18), 0.461_356, epsilon = 1e-4));
        assert_eq!(encode_srgb(-1.0), 0.0);
        assert!(abs_diff_eq!(encode_srgb(4.0), 1.0, epsilon = 1e-12));
        assert_eq!(encode_srgb(f64::NAN), 0.0);
    }

    #[test]
    fn quantisation() {
        assert_eq!(to_rgb8(Rgb::new(0.0, 0.5, 1.0)), [0, 128, 255]);
        assert_eq!(to_rgb8_floor(Rgb::new(0.0, 0.5, 1.0)), [0, 127, 255]);
        assert_eq!(to_rgb8_floor(Rgb::new(-0.2, 2.0, f64::NAN)), [0, 255, 0]);
    }

    #[test]
    fn web_colour() {
        assert_eq!(srgb_hex(Rgb::ONE), "ffffff");
        assert_eq!(srgb_hex(Rgb::ZERO), "000000");
        assert_eq!(srgb_hex(Rgb::new(1.0, 0.0, 0.0)), "ff0000");
    }
}
