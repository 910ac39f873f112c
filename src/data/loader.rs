use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Row, QUALITY_COLUMN};
use crate::error::DataLoadError;

type Result<T> = std::result::Result<T, DataLoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "alcohol": 9.4, "quality": 5, ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// The loaded table must carry a `quality` column.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };

    if !dataset.has_column(QUALITY_COLUMN) {
        return Err(DataLoadError::MissingColumn(QUALITY_COLUMN.to_string()));
    }
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every cell is typed on its own, then columns mixing integers and floats
/// are promoted to float so a column has one numeric type.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = dedupe_column_names(columns);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells = record.iter().map(guess_cell_type).collect();
        rows.push(Row { cells });
    }

    promote_mixed_numeric_columns(columns.len(), &mut rows);
    Ok(Dataset::new(columns, rows))
}

/// Rename repeated headers the way dataframe readers do: the second `x`
/// becomes `x.1`, the third `x.2`, skipping any name already in use.
fn dedupe_column_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();

    names
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let suffix = suffixes.entry(name.clone()).or_insert(0);
            let renamed = loop {
                *suffix += 1;
                let candidate = format!("{name}.{suffix}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
            taken.insert(renamed.clone());
            seen.insert(renamed.clone());
            renamed
        })
        .collect()
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

fn promote_mixed_numeric_columns(n_columns: usize, rows: &mut [Row]) {
    for col in 0..n_columns {
        let has_float = rows
            .iter()
            .any(|r| matches!(r.cells.get(col), Some(CellValue::Float(_))));
        if !has_float {
            continue;
        }
        for row in rows.iter_mut() {
            if let Some(cell) = row.cells.get_mut(col) {
                if let CellValue::Integer(i) = *cell {
                    *cell = CellValue::Float(i as f64);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of all record keys in first-seen order; a key missing from a record
/// reads as null.
fn load_json(path: &Path) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut objects = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| Row {
            cells: columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect(),
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns, as written by
/// `df.to_parquet()` (Pandas) or `df.write_parquet()` (Polars).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let columns = dedupe_column_names(columns);
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let converted: Vec<Vec<CellValue>> = batch
            .columns()
            .iter()
            .map(column_cells)
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            rows.push(Row {
                cells: converted.iter().map(|col| col[row].clone()).collect(),
            });
        }
    }

    Ok(Dataset::new(columns, rows))
}

// -- Arrow helpers --

/// Convert one Arrow column into cells. Integer and float widths are cast to
/// 64 bits first; unsupported types are rendered as their debug string.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>> {
    let len = col.len();
    let cells = match col.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let ints = cast(col, &DataType::Int64)?;
            let arr = ints.as_primitive::<Int64Type>();
            (0..len)
                .map(|i| nullable(arr, i, || CellValue::Integer(arr.value(i))))
                .collect()
        }
        DataType::UInt64 | DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let floats = cast(col, &DataType::Float64)?;
            let arr = floats.as_primitive::<Float64Type>();
            (0..len)
                .map(|i| nullable(arr, i, || CellValue::Float(arr.value(i))))
                .collect()
        }
        DataType::Utf8 => {
            let arr = col.as_string::<i32>();
            (0..len)
                .map(|i| nullable(arr, i, || CellValue::String(arr.value(i).to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            (0..len)
                .map(|i| nullable(arr, i, || CellValue::String(arr.value(i).to_string())))
                .collect()
        }
        DataType::Boolean => {
            let arr = col.as_boolean();
            (0..len)
                .map(|i| nullable(arr, i, || CellValue::Bool(arr.value(i))))
                .collect()
        }
        other => (0..len)
            .map(|i| nullable(col, i, || CellValue::String(format!("{other:?}"))))
            .collect(),
    };
    Ok(cells)
}

fn nullable(arr: &dyn Array, row: usize, value: impl FnOnce() -> CellValue) -> CellValue {
    if arr.is_null(row) {
        CellValue::Null
    } else {
        value()
    }
}
