//! Command line front end of the metal IOR fitter.

mod app;
mod error;
mod report;

pub use app::run;
pub use error::RuntimeError;
