use std::fmt;

use super::error::SampleError;

/// Floating-point width used to store column samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// 32-bit IEEE 754 (`f32`)
    #[default]
    Single,
    /// 64-bit IEEE 754 (`f64`)
    Double,
}

impl Precision {
    /// Map the "use double precision" switch onto a precision
    pub fn from_double_flag(use_double: bool) -> Self {
        if use_double {
            Precision::Double
        } else {
            Precision::Single
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single => write!(f, "32-bit"),
            Precision::Double => write!(f, "64-bit"),
        }
    }
}

/// Append-only sample storage at a fixed precision
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Single-precision samples
    Single(Vec<f32>),
    /// Double-precision samples
    Double(Vec<f64>),
}

impl Samples {
    /// Create an empty sequence for the given precision
    pub fn new(precision: Precision) -> Self {
        match precision {
            Precision::Single => Samples::Single(Vec::new()),
            Precision::Double => Samples::Double(Vec::new()),
        }
    }

    /// Precision the samples are stored at
    pub fn precision(&self) -> Precision {
        match self {
            Samples::Single(_) => Precision::Single,
            Samples::Double(_) => Precision::Double,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        match self {
            Samples::Single(v) => v.len(),
            Samples::Double(v) => v.len(),
        }
    }

    /// Whether no sample has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at `index`, widened to `f64`
    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            Samples::Single(v) => v.get(index).map(|&x| f64::from(x)),
            Samples::Double(v) => v.get(index).copied(),
        }
    }

    /// All samples widened to `f64`
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Samples::Single(v) => v.iter().map(|&x| f64::from(x)).collect(),
            Samples::Double(v) => v.clone(),
        }
    }

    /// Parse one trimmed cell line and append it.
    ///
    /// Nothing is appended on failure.
    pub fn push_parsed(&mut self, line: &str) -> Result<(), SampleError> {
        match self {
            Samples::Single(v) => {
                // Literals beyond the f32 range saturate to infinity.
                v.push(line.parse()?);
            }
            Samples::Double(v) => v.push(line.parse()?),
        }
        Ok(())
    }
}

/// A named column of numeric samples
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Synthesized header, unique within its dataset
    pub header: String,
    /// Parsed samples in document order
    pub samples: Samples,
}

impl Column {
    /// Number of samples in the column
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the column has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One named group of index-aligned columns
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Dataset name, either from the document or `Dataset_<n>`
    pub name: String,
    /// Columns in document order
    pub columns: Vec<Column>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Insert a column, keeping insertion order.
    ///
    /// A column whose header is already present replaces the existing samples
    /// but keeps the original position.
    pub fn insert_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.header == column.header) {
            Some(existing) => existing.samples = column.samples,
            None => self.columns.push(column),
        }
    }

    /// Look up a column by header
    pub fn column(&self, header: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.header == header)
    }

    /// Headers in insertion order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_str())
    }

    /// Number of complete rows: the length of the shortest column
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).min().unwrap_or(0)
    }
}

/// A cell line that could not be read as a number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueWarning {
    /// Header of the column the line belongs to
    pub header: String,
    /// The offending line, trimmed
    pub value: String,
}

impl fmt::Display for ValueWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping non-numeric value '{}' in column '{}'",
            self.value, self.header
        )
    }
}

/// Result of parsing one CMBL document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CmblDocument {
    /// Retained datasets in document order
    pub datasets: Vec<Dataset>,
    /// Value-level warnings in document order
    pub warnings: Vec<ValueWarning>,
}

impl CmblDocument {
    /// Whether no dataset survived parsing
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Build a column header from its (trimmed) metadata fields.
///
/// `index` is the 1-based position the column would take among the columns
/// already accepted into its dataset; it only shows up when everything else is
/// blank.
pub fn synthesize_header(name: &str, short_name: &str, units: &str, index: usize) -> String {
    let header = if units.is_empty() {
        name.to_string()
    } else {
        format!("{} ({}) [{}]", name, short_name, units)
    };
    if header.is_empty() {
        format!("Column_{}", index)
    } else {
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_header_with_units() {
        assert_eq!(
            synthesize_header("Temperature", "T", "°C", 1),
            "Temperature (T) [°C]"
        );
    }

    #[test]
    fn test_header_units_only() {
        assert_eq!(synthesize_header("", "", "V", 3), " () [V]");
    }

    #[test]
    fn test_header_without_units_uses_name() {
        assert_eq!(synthesize_header("Time", "t", "", 1), "Time");
    }

    #[test]
    fn test_header_fallback() {
        assert_eq!(synthesize_header("", "t", "", 2), "Column_2");
    }

    #[test]
    fn test_insert_column_last_write_wins() {
        let mut dataset = Dataset::new("Run 1");
        dataset.insert_column(Column {
            header: "A".to_string(),
            samples: Samples::Double(vec![1.0]),
        });
        dataset.insert_column(Column {
            header: "B".to_string(),
            samples: Samples::Double(vec![2.0]),
        });
        dataset.insert_column(Column {
            header: "A".to_string(),
            samples: Samples::Double(vec![3.0, 4.0]),
        });

        assert_eq!(dataset.headers().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(
            dataset.column("A").unwrap().samples,
            Samples::Double(vec![3.0, 4.0])
        );
    }

    #[test]
    fn test_row_count_is_shortest_column() {
        let mut dataset = Dataset::new("d");
        for (header, n) in [("a", 5), ("b", 7), ("c", 3)] {
            dataset.insert_column(Column {
                header: header.to_string(),
                samples: Samples::Single(vec![0.0; n]),
            });
        }
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(Dataset::new("empty").row_count(), 0);
    }

    #[test]
    fn test_push_parsed() {
        let mut samples = Samples::new(Precision::Single);
        samples.push_parsed("1.5").unwrap();
        samples.push_parsed("-2e3").unwrap();
        assert!(samples.push_parsed("XYZ").is_err());
        assert_eq!(samples, Samples::Single(vec![1.5, -2000.0]));
    }

    #[test]
    fn test_single_precision_overflow_saturates() {
        let mut samples = Samples::new(Precision::Single);
        samples.push_parsed("1e40").unwrap();
        samples.push_parsed("-1e40").unwrap();
        samples.push_parsed("inf").unwrap();
        assert_eq!(
            samples,
            Samples::Single(vec![f32::INFINITY, f32::NEG_INFINITY, f32::INFINITY])
        );

        let mut wide = Samples::new(Precision::Double);
        wide.push_parsed("1e40").unwrap();
        assert_eq!(wide.get(0), Some(1e40));
    }

    #[test]
    fn test_precision_from_flag() {
        assert_eq!(Precision::from_double_flag(true), Precision::Double);
        assert_eq!(Precision::from_double_flag(false), Precision::Single);
        assert_eq!(Precision::default(), Precision::Single);
    }

    proptest! {
        #[test]
        fn test_header_is_never_empty(
            name in ".{0,8}",
            short_name in ".{0,8}",
            units in ".{0,8}",
            index in 1usize..1000,
        ) {
            let header = synthesize_header(&name, &short_name, &units, index);
            prop_assert!(!header.is_empty());
            if !units.is_empty() {
                prop_assert_eq!(header, format!("{} ({}) [{}]", name, short_name, units));
            } else if !name.is_empty() {
                prop_assert_eq!(header, name);
            } else {
                prop_assert_eq!(header, format!("Column_{}", index));
            }
        }
    }
}
