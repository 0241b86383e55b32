//! # metalior-base
//! Core library for metalior.
//! Contains the colour type, the complex refractive index of metals, the
//! physical Fresnel equations and the range type used by the fitter.

#![warn(missing_docs)]

pub mod color;
pub mod error;
pub mod math;
pub mod optics;
pub mod range;

pub use math::Rgb;
