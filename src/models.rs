use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Cells of one column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric<S: Into<String>>(name: S, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text<S: Into<String>>(name: S, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Numeric cells, or `None` for a text column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Cell `row` rendered as a category label. Missing cells yield `None`.
    pub fn label_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(format_number_label),
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
        }
    }
}

/// Integers print without a fractional part so numeric categories read naturally.
fn format_number_label(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Tabular input: rows × named columns, all columns the same length.
///
/// The chart facade only borrows a dataset. [`crate::storage`] loads one from CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from columns, rejecting duplicate names and ragged lengths.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut ds = Dataset::new();
        for c in columns {
            ds.push_column(c)?;
        }
        Ok(ds)
    }

    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(ChartError::InvalidConfig(format!(
                "duplicate column `{}`",
                column.name
            )));
        }
        if let Some(first) = self.columns.first()
            && first.data.len() != column.data.len()
        {
            return Err(ChartError::InvalidConfig(format!(
                "column `{}` has {} rows, expected {}",
                column.name,
                column.data.len(),
                first.data.len()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style numeric column; every value present.
    pub fn with_numeric<S: Into<String>>(mut self, name: S, values: &[f64]) -> Result<Self> {
        self.push_column(Column::numeric(
            name,
            values.iter().copied().map(Some).collect(),
        ))?;
        Ok(self)
    }

    /// Builder-style text column; every value present.
    pub fn with_text<S: Into<String>>(mut self, name: S, values: &[&str]) -> Result<Self> {
        self.push_column(Column::text(
            name,
            values.iter().map(|s| Some(s.to_string())).collect(),
        ))?;
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ChartError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Numeric cells of `name`; a text column is not enough data for a statistic.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)?.as_numeric().ok_or_else(|| {
            ChartError::InsufficientData(format!("column `{name}` is not numeric"))
        })
    }

    /// Names of all numeric columns, in table order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }
}
