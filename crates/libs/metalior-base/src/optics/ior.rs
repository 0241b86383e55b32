//! Complex index of refraction of metals and the table of metal presets.

use crate::math::Rgb;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::Deref,
};

/// Wavelengths in micrometres at which the red, green and blue channels of a
/// [`ComplexIor`] are sampled.
pub const RGB_WAVELENGTHS_UM: [f64; 3] = [0.65, 0.55, 0.45];

/// Complex refractive index of a material sampled at the three wavelengths
/// of [`RGB_WAVELENGTHS_UM`].
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexIor {
    /// Index of refraction (real part) per channel.
    pub eta: Rgb,
    /// Extinction coefficient (imaginary part) per channel.
    pub k: Rgb,
}

impl Debug for ComplexIor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IOR(η=[{}, {}, {}], κ=[{}, {}, {}])",
            self.eta.x, self.eta.y, self.eta.z, self.k.x, self.k.y, self.k.z
        )
    }
}

impl Display for ComplexIor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self) }
}

impl ComplexIor {
    /// Creates a new complex refractive index.
    pub const fn new(eta: Rgb, k: Rgb) -> Self { Self { eta, k } }

    /// Whether the values are physically meaningful: finite, `eta > 0` and
    /// `k >= 0` for every channel.
    pub fn is_valid(&self) -> bool {
        self.eta.is_finite()
            && self.k.is_finite()
            && self.eta.cmpgt(Rgb::ZERO).all()
            && self.k.cmpge(Rgb::ZERO).all()
    }

    /// Whether the material absorbs light in every channel.
    pub fn is_conductor(&self) -> bool { self.k.cmpgt(Rgb::ZERO).all() }
}

/// A metal preset: a name bound to a complex refractive index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalPreset {
    /// Name of the preset.
    pub name: String,
    /// Complex refractive index of the metal.
    pub ior: ComplexIor,
}

impl MetalPreset {
    /// Creates a new preset.
    pub fn new<S: Into<String>>(name: S, ior: ComplexIor) -> Self {
        Self {
            name: name.into(),
            ior,
        }
    }
}

/// Sampled at 0.65, 0.55 and 0.45 µm from the data published on
/// refractiveindex.info.
const BUILTIN_PRESETS: [(&str, [f64; 3], [f64; 3]); 15] = [
    ("Silver", [0.052225, 0.059582, 0.040000], [4.4094, 3.5974, 2.6484]),
    ("Gold", [0.15557, 0.42415, 1.3831], [3.6024, 2.4721, 1.9155]),
    ("Copper", [0.23780, 1.0066, 1.2404], [3.6264, 2.5823, 2.3929]),
    ("Aluminum", [1.5580, 1.0152, 0.63324], [7.7124, 6.6273, 5.4544]),
    ("Chromium", [3.1071, 3.1812, 2.3230], [3.3314, 3.3291, 3.1350]),
    ("Lead", [2.5750, 2.5444, 2.1038], [4.1612, 4.1823, 4.1890]),
    ("Platinum", [0.47475, 0.46521, 0.63275], [6.3329, 5.1073, 3.7481]),
    ("Titanium", [0.25300, 0.28822, 0.52181], [5.2796, 4.2122, 3.0367]),
    ("Tungsten", [0.92074, 1.3437, 2.2323], [6.8595, 5.2293, 5.1461]),
    ("Iron", [1.8247, 1.2246, 1.0205], [7.6326, 5.9377, 4.3952]),
    ("Vanadium", [0.43109, 0.60711, 0.91187], [5.5575, 4.5217, 3.6035]),
    ("Zinc", [1.2338, 0.92943, 0.67767], [5.8730, 4.9751, 4.0122]),
    ("Nickel", [1.3726, 1.0753, 1.1336], [6.6273, 5.1763, 3.7544]),
    ("Mercury", [2.0733, 1.5523, 1.0606], [5.3383, 4.6510, 3.8628]),
    ("Cobalt", [2.2371, 2.0524, 1.7365], [4.2357, 3.8242, 3.2745]),
];

/// Immutable, ordered table of metal presets.
///
/// Built once and shared by reference; iteration order is the order in which
/// the presets were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTable(Box<[MetalPreset]>);

impl Deref for PresetTable {
    type Target = [MetalPreset];

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl Default for PresetTable {
    fn default() -> Self { Self::builtin() }
}

impl FromIterator<MetalPreset> for PresetTable {
    fn from_iter<T: IntoIterator<Item = MetalPreset>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PresetTable {
    /// Returns the table of built-in metals.
    pub fn builtin() -> Self {
        BUILTIN_PRESETS
            .iter()
            .map(|(name, eta, k)| {
                MetalPreset::new(*name, ComplexIor::new(Rgb::from_array(*eta), Rgb::from_array(*k)))
            })
            .collect()
    }

    /// Creates a table from already validated presets.
    pub fn new(presets: Vec<MetalPreset>) -> Self { Self(presets.into_boxed_slice()) }

    /// Returns the preset with the given name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&MetalPreset> {
        self.0.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the names of the presets in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> { self.0.iter().map(|p| p.name.as_str()) }

    /// Returns a table containing only the presets with the given names,
    /// keeping the order of this table. Unknown names are reported back.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, String> {
        let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
        if let Some(unknown) = names.iter().find(|n| self.find(n).is_none()) {
            return Err(unknown.to_string());
        }
        Ok(self
            .0
            .iter()
            .filter(|p| names.iter().any(|n| p.name.eq_ignore_ascii_case(n)))
            .cloned()
            .collect())
    }
}

/// Errors that can occur while reading presets from a CSV file.
#[cfg(feature = "io")]
#[derive(Debug, thiserror::Error)]
pub enum PresetFileError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A required column is missing from the header.
    #[error("Missing column `{0}` in the preset file header")]
    MissingColumn(&'static str),
    /// A value could not be parsed or is physically meaningless.
    #[error("Invalid value `{value}` in column `{column}` at line {line}")]
    InvalidValue {
        /// Line of the record in the file (1-based, header included).
        line: u64,
        /// Column name.
        column: &'static str,
        /// The offending raw value.
        value: String,
    },
    /// The file contains no presets.
    #[error("The preset file contains no presets")]
    Empty,
}

#[cfg(feature = "io")]
impl PresetTable {
    /// Column names of a preset file.
    pub const CSV_COLUMNS: [&'static str; 7] = ["name", "n_r", "n_g", "n_b", "k_r", "k_g", "k_b"];

    /// Reads presets from a CSV file.
    ///
    /// File format: a header with the columns of [`Self::CSV_COLUMNS`] (in any
    /// order, extra columns are ignored) followed by one metal per line.
    pub fn read_from_csv_file(path: &std::path::Path) -> Result<Self, PresetFileError> {
        let file = std::fs::File::open(path)?;
        Self::read_from_csv(file)
    }

    /// Reads presets from CSV data. See [`Self::read_from_csv_file`].
    pub fn read_from_csv<R: std::io::Read>(reader: R) -> Result<Self, PresetFileError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let header = rdr.headers()?.clone();
        let mut indices = [0usize; 7];
        for (idx, column) in indices.iter_mut().zip(Self::CSV_COLUMNS) {
            *idx = header
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or(PresetFileError::MissingColumn(column))?;
        }

        let mut presets = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let field = |i: usize| record.get(indices[i]).unwrap_or("");
            let mut values = [0.0f64; 6];
            for (i, value) in values.iter_mut().enumerate() {
                let column = Self::CSV_COLUMNS[i + 1];
                let raw = field(i + 1);
                let invalid = || PresetFileError::InvalidValue {
                    line,
                    column,
                    value: raw.to_string(),
                };
                let parsed = raw.parse::<f64>().map_err(|_| invalid())?;
                let is_eta = i < 3;
                if !parsed.is_finite() || (is_eta && parsed <= 0.0) || (!is_eta && parsed < 0.0) {
                    return Err(invalid());
                }
                *value = parsed;
            }
            let name = field(0);
            if name.is_empty() {
                return Err(PresetFileError::InvalidValue {
                    line,
                    column: "name",
                    value: String::new(),
                });
            }
            let ior = ComplexIor::new(
                Rgb::new(values[0], values[1], values[2]),
                Rgb::new(values[3], values[4], values[5]),
            );
            log::trace!("Read preset {}: {}", name, ior);
            presets.push(MetalPreset::new(name, ior));
        }

        if presets.is_empty() {
            return Err(PresetFileError::Empty);
        }
        Ok(Self::new(presets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_order_and_validity() {
        let table = PresetTable::builtin();
        assert_eq!(table.len(), 15);
        let names: Vec<_> = table.names().collect();
        assert_eq!(names[0], "Silver");
        assert_eq!(names[1], "Gold");
        assert_eq!(names[14], "Cobalt");
        assert!(table.iter().all(|p| p.ior.is_valid() && p.ior.is_conductor()));
    }

    #[test]
    fn find_is_case_insensitive() {
        let table = PresetTable::builtin();
        let gold = table.find("gold").unwrap();
        assert_eq!(gold.name, "Gold");
        assert_eq!(gold.ior.eta, Rgb::new(0.15557, 0.42415, 1.3831));
        assert!(table.find("Unobtainium").is_none());
    }

    #[test]
    fn select_keeps_table_order() {
        let table = PresetTable::builtin();
        let selected = table.select(&["copper", "Silver"]).unwrap();
        let names: Vec<_> = selected.names().collect();
        assert_eq!(names, ["Silver", "Copper"]);
        assert_eq!(table.select(&["Gold", "Brass"]).unwrap_err(), "Brass");
    }

    #[test]
    fn validity() {
        let ok = ComplexIor::new(Rgb::splat(1.0), Rgb::splat(2.0));
        assert!(ok.is_valid());
        assert!(!ComplexIor::new(Rgb::splat(0.0), Rgb::splat(2.0)).is_valid());
        assert!(!ComplexIor::new(Rgb::splat(1.0), Rgb::new(1.0, -0.1, 1.0)).is_valid());
        assert!(!ComplexIor::new(Rgb::new(1.0, f64::NAN, 1.0), Rgb::ONE).is_valid());
    }

    #[cfg(feature = "io")]
    #[test]
    fn read_presets_from_csv() {
        let data = "name, n_r, n_g, n_b, k_r, k_g, k_b\n\
                    Gold, 0.15557, 0.42415, 1.3831, 3.6024, 2.4721, 1.9155\n\
                    Silver, 0.052225, 0.059582, 0.04, 4.4094, 3.5974, 2.6484\n";
        let table = PresetTable::read_from_csv(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].name, "Gold");
        assert_eq!(table[0].ior, PresetTable::builtin().find("Gold").unwrap().ior);
        assert_eq!(table[1].name, "Silver");
    }

    #[cfg(feature = "io")]
    #[test]
    fn read_presets_rejects_bad_input() {
        let missing = "name, n_r, n_g, n_b, k_r, k_g\nGold, 1, 1, 1, 1, 1\n";
        assert!(matches!(
            PresetTable::read_from_csv(missing.as_bytes()),
            Err(PresetFileError::MissingColumn("k_b"))
        ));

        let negative_k = "name,n_r,n_g,n_b,k_r,k_g,k_b\nOdd,1,1,1,1,-1,1\n";
        match PresetTable::read_from_csv(negative_k.as_bytes()) {
            Err(PresetFileError::InvalidValue { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "k_g");
            },
            other => panic!("unexpected result: {:?}", other),
        }

        let not_a_number = "name,n_r,n_g,n_b,k_r,k_g,k_b\nOdd,1,x,1,1,1,1\n";
        assert!(matches!(
            PresetTable::read_from_csv(not_a_number.as_bytes()),
            Err(PresetFileError::InvalidValue { column: "n_g", .. })
        ));

        let empty = "name,n_r,n_g,n_b,k_r,k_g,k_b\n";
        assert!(matches!(
            PresetTable::read_from_csv(empty.as_bytes()),
            Err(PresetFileError::Empty)
        ));
    }
}
