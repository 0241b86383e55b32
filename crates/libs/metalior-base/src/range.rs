//! Defines a range of values with a given step size.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// Defines a left inclusive, right exclusive range [a, b) of values with a
/// given step.
///
/// Values are generated as `start + i * step_size` rather than by repeated
/// accumulation, so the i-th value never depends on rounding errors of the
/// previous ones.
#[derive(Copy, Clone, PartialEq)]
pub struct StepRangeExcl {
    /// Initial value of the range.
    pub start: f64,
    /// Final value of the range (excluded).
    pub stop: f64,
    /// Step size.
    pub step_size: f64,
}

impl Debug for StepRangeExcl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRangeExcl")
            .field("start", &self.start)
            .field("stop", &self.stop)
            .field("step_size", &self.step_size)
            .finish()
    }
}

impl StepRangeExcl {
    /// Tolerance used when deciding whether the span is an exact multiple of
    /// the step size.
    const COUNT_TOLERANCE: f64 = 1e-6;

    /// Creates a new range with the given start, stop and step size.
    pub const fn new(start: f64, stop: f64, step_size: f64) -> Self {
        Self {
            start,
            stop,
            step_size,
        }
    }

    /// Returns the span of the range.
    pub fn span(&self) -> f64 { self.stop - self.start }

    /// Whether the range can produce at least one value.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.stop.is_finite()
            && self.step_size.is_finite()
            && self.step_size > 0.0
            && self.stop > self.start
    }

    /// Returns the number of values in the range.
    ///
    /// Returns `None` if the range is not valid or if the count does not fit
    /// in a `usize`. When the span is (up to rounding) an exact multiple of
    /// the step size, the stop value is not counted.
    pub fn step_count(&self) -> Option<usize> {
        if !self.is_valid() {
            return None;
        }
        let n = self.span() / self.step_size;
        if !n.is_finite() {
            return None;
        }
        let rounded = n.round();
        let count = if (n - rounded).abs() < Self::COUNT_TOLERANCE {
            rounded
        } else {
            n.ceil()
        };
        // `usize::MAX as f64` rounds up, so the comparison must be strict.
        if count < usize::MAX as f64 {
            Some(count as usize)
        } else {
            None
        }
    }

    /// Returns the i-th value of the range.
    #[inline]
    pub fn value_at(&self, i: usize) -> f64 { self.start + self.step_size * i as f64 }
}

impl Display for StepRangeExcl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {} / {}", self.start, self.stop, self.step_size)
    }
}

impl<'a> TryFrom<&'a str> for StepRangeExcl {
    type Error = String;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let mut parts = value.split("..");
        let start = parts
            .next()
            .ok_or_else(|| format!("Invalid range: {value}"))?
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid range start value: {value}"))?;
        let mut parts = parts
            .next()
            .ok_or_else(|| format!("Invalid range: {value}"))?
            .trim()
            .split('/');
        let stop = parts
            .next()
            .ok_or_else(|| format!("Invalid range: {value}"))?
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid range stop value: {value}"))?;
        let step = parts
            .next()
            .ok_or_else(|| format!("Invalid range: {value}"))?
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid range step size value: {value}"))?;
        Ok(Self::new(start, stop, step))
    }
}

impl FromStr for StepRangeExcl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::try_from(s) }
}

impl Serialize for StepRangeExcl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{}", self))
    }
}

impl<'d> Deserialize<'d> for StepRangeExcl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'d>,
    {
        struct RangeVisitor;

        impl<'de> serde::de::Visitor<'de> for RangeVisitor {
            type Value = StepRangeExcl;

            fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "an exclusive range by step size in the form of \"start .. stop / step\""
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                StepRangeExcl::try_from(v).map_err(E::custom)
            }
        }
        deserializer.deserialize_str(RangeVisitor)
    }
}
