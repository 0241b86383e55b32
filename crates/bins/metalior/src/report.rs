//! CSV outputs of the commands.

use base::color::{srgb_hex, to_rgb8_floor};
use fit::{Curves, PresetFit};
use serde::Serialize;
use std::io::Write;

/// One line of the fit report.
///
/// Colours are given as `floor(c * 255)` of the linear reflectance; the web
/// colour is the sRGB encoded base colour.
#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    name: &'a str,
    base_r: u8,
    base_g: u8,
    base_b: u8,
    grazing_r: u8,
    grazing_g: u8,
    grazing_b: u8,
    ior: f64,
    base_srgb: String,
    production_rmse: f64,
    reference_rmse: f64,
}

impl<'a> From<&'a PresetFit> for ReportRecord<'a> {
    fn from(fit: &'a PresetFit) -> Self {
        let [base_r, base_g, base_b] = to_rgb8_floor(fit.fit.base);
        let [grazing_r, grazing_g, grazing_b] = to_rgb8_floor(fit.fit.grazing);
        Self {
            name: &fit.name,
            base_r,
            base_g,
            base_b,
            grazing_r,
            grazing_g,
            grazing_b,
            ior: fit.fit.ior,
            base_srgb: srgb_hex(fit.fit.base),
            production_rmse: fit.fit.production_rmse,
            reference_rmse: fit.fit.reference_rmse,
        }
    }
}

/// Writes the fit report, one line per preset in the given order.
pub fn write_fit_report<W: Write>(writer: W, fits: &[PresetFit]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for fit in fits {
        wtr.serialize(ReportRecord::from(fit))?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CurveRecord {
    cos_theta: f64,
    physical_r: f64,
    physical_g: f64,
    physical_b: f64,
    production_r: f64,
    production_g: f64,
    production_b: f64,
    reference_r: f64,
    reference_g: f64,
    reference_b: f64,
}

/// Writes the sampled curves, one line per cosine.
pub fn write_curves<W: Write>(writer: W, curves: &Curves) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for s in &curves.samples {
        wtr.serialize(CurveRecord {
            cos_theta: s.cos_theta,
            physical_r: s.physical.x,
            physical_g: s.physical.y,
            physical_b: s.physical.z,
            production_r: s.production.x,
            production_g: s.production.y,
            production_b: s.production.z,
            reference_r: s.reference.x,
            reference_g: s.reference.y,
            reference_b: s.reference.z,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
