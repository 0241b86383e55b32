//! Math utilities.

pub use glam::DVec3;

/// Colour with one real component per sampled wavelength, ordered
/// red/green/blue.
pub type Rgb = DVec3;

/// Returns the square of a number.
#[inline(always)]
pub fn sqr<T: std::ops::Mul<Output = T> + Copy>(x: T) -> T { x * x }

/// Squared Euclidean distance between two colours, the error metric used
/// when comparing reflectance curves.
#[inline(always)]
pub fn rgb_dist_sqr(a: Rgb, b: Rgb) -> f64 { (a - b).length_squared() }
