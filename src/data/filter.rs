use super::model::{CellValue, Dataset, Row, RowView, QUALITY_COLUMN};

// ---------------------------------------------------------------------------
// Quality filter: an equality scan over one column
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] selected by a filter, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredRows<'a> {
    pub dataset: &'a Dataset,
    pub indices: Vec<usize>,
}

impl<'a> FilteredRows<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.rows[i])
    }

    /// Rows as serializable `{column: value}` maps.
    pub fn views(&self) -> Vec<RowView<'a>> {
        let dataset = self.dataset;
        let columns = &dataset.columns;
        self.rows().map(|row| RowView { columns, row }).collect()
    }

    /// The cells of column `position` for every selected row.
    pub fn column(&self, position: usize) -> impl Iterator<Item = &'a CellValue> + '_ {
        self.rows().map(move |row| &row.cells[position])
    }
}

/// Return the rows whose quality cell equals `quality`.
///
/// An empty result is not an error here; callers decide what "nothing
/// matched" means for them.
pub fn filter_by_quality(dataset: &Dataset, quality: i64) -> FilteredRows<'_> {
    let indices = match dataset.column_position(QUALITY_COLUMN) {
        Some(col) => dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.cells[col].matches_quality(quality))
            .map(|(i, _)| i)
            .collect(),
        None => Vec::new(),
    };
    FilteredRows { dataset, indices }
}
