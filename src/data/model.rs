use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Name of the column every dataset must carry; the sole filter key.
pub const QUALITY_COLUMN: &str = "quality";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// `Ord` so quality levels can be tallied in a `BTreeMap`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            // JSON has no NaN/inf; emit null like a dataframe export would.
            CellValue::Float(v) if !v.is_finite() => serializer.serialize_none(),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_none(),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for histogram binning.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether the value is numerically equal to `quality`.
    pub fn matches_quality(&self, quality: i64) -> bool {
        match self {
            CellValue::Integer(i) => *i == quality,
            CellValue::Float(v) => *v == quality as f64,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the table
// ---------------------------------------------------------------------------

/// One row; cells are aligned with [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

/// Borrowed view of a row that serializes as a flat `{column: value}` map
/// in dataset column order.
pub struct RowView<'a> {
    pub columns: &'a [String],
    pub row: &'a Row,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.columns.iter().zip(&self.row.cells) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with a pre-computed column index.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// All rows, in file order.
    pub rows: Vec<Row>,
    column_index: HashMap<String, usize>,
}

impl Dataset {
    /// Build the column index from loaded rows. Rows shorter than the header
    /// are padded with [`CellValue::Null`].
    pub fn new(columns: Vec<String>, mut rows: Vec<Row>) -> Self {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        for row in &mut rows {
            row.cells.resize(columns.len(), CellValue::Null);
        }
        Dataset {
            columns,
            rows,
            column_index,
        }
    }

    /// Position of `name` among the columns.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row count per distinct value of the quality column.
    pub fn quality_levels(&self) -> BTreeMap<CellValue, usize> {
        let mut levels = BTreeMap::new();
        if let Some(idx) = self.column_position(QUALITY_COLUMN) {
            for row in &self.rows {
                *levels.entry(row.cells[idx].clone()).or_insert(0) += 1;
            }
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["alcohol".into(), "quality".into()],
            vec![
                Row {
                    cells: vec![CellValue::Float(9.4), CellValue::Integer(5)],
                },
                Row {
                    cells: vec![CellValue::Float(10.1), CellValue::Integer(6)],
                },
                Row {
                    cells: vec![CellValue::Float(9.8)],
                },
            ],
        )
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let ds = sample();
        assert_eq!(ds.rows[2].cells, vec![CellValue::Float(9.8), CellValue::Null]);
    }

    #[test]
    fn quality_levels_counts_each_value() {
        let levels = sample().quality_levels();
        assert_eq!(levels.get(&CellValue::Integer(5)), Some(&1));
        assert_eq!(levels.get(&CellValue::Integer(6)), Some(&1));
        assert_eq!(levels.get(&CellValue::Null), Some(&1));
    }

    #[test]
    fn float_cells_match_integral_quality() {
        assert!(CellValue::Float(5.0).matches_quality(5));
        assert!(!CellValue::Float(5.5).matches_quality(5));
        assert!(!CellValue::String("5".into()).matches_quality(5));
        assert!(!CellValue::Null.matches_quality(0));
    }

    #[test]
    fn row_view_keeps_column_order() {
        let ds = sample();
        let view = RowView {
            columns: &ds.columns,
            row: &ds.rows[0],
        };
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"alcohol":9.4,"quality":5}"#);
    }

    #[test]
    fn non_finite_floats_serialize_as_null() {
        let json = serde_json::to_string(&CellValue::Float(f64::NAN)).unwrap();
        assert_eq!(json, "null");
    }
}
