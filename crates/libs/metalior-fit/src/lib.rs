//! # metalior-fit
//! Reflectance models of metals and the fitting of the single IOR value that
//! makes a renderer's metallic Fresnel curve match the physical one.
//!
//! Three models are involved:
//!
//! + [`ComplexFresnel`], the physical reflectance computed from the complex
//!   refractive index of the metal;
//! + [`ProductionFresnel`], the metallic Fresnel of the renderer, blending a
//!   base and a grazing colour with a dielectric Fresnel coefficient of a
//!   single IOR;
//! + [`ReferenceFresnel`], Gulbrandsen's artist-friendly metallic Fresnel,
//!   used only as a baseline.
//!
//! [`fit_ior`] searches the IOR exhaustively; [`fit_presets`] runs it over a
//! whole [`PresetTable`](base::optics::ior::PresetTable).

#![warn(missing_docs)]

mod curves;
mod driver;
mod fitting;
pub mod models;

pub use curves::*;
pub use driver::*;
pub use fitting::*;
pub use models::{ComplexFresnel, FresnelModel, ProductionFresnel, ReferenceFresnel};
