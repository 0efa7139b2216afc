//! In-memory, column-oriented [`Dataset`].

use kanon_core::constants::MISSING_TEXT;
use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::traits::Dataset;
use kanon_core::types::{StringDictionary, ValueType};

use crate::domain::parse_date;

#[derive(Debug)]
struct Column {
    name: String,
    value_type: ValueType,
    cells: Vec<f64>,
    dictionary: Option<StringDictionary>,
}

/// Dataset held entirely in memory. String and temporal columns are
/// dictionary-encoded in first-seen order.
#[derive(Debug)]
pub struct MemoryDataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl MemoryDataset {
    pub fn builder() -> MemoryDatasetBuilder {
        MemoryDatasetBuilder::default()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl Dataset for MemoryDataset {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(|c| c.cells.as_slice())
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn column_type(&self, index: usize) -> Option<ValueType> {
        self.columns.get(index).map(|c| c.value_type)
    }

    fn dictionary(&self, index: usize) -> Option<&StringDictionary> {
        self.columns.get(index)?.dictionary.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct MemoryDatasetBuilder {
    columns: Vec<Column>,
    error: Option<GeneralizationError>,
}

impl MemoryDatasetBuilder {
    /// Literal numbers; `NaN` or the reserved code mark missing cells.
    pub fn numeric_column(mut self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            value_type: ValueType::Numeric,
            cells: values.into_iter().collect(),
            dictionary: None,
        });
        self
    }

    pub fn text_column<S: AsRef<str>>(self, name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        self.encoded_column(name.into(), ValueType::String, values)
    }

    /// Dates as `d/m/yyyy`; `NaN` marks a missing cell.
    pub fn temporal_column<S: AsRef<str>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values: Vec<S> = values.into_iter().collect();
        if self.error.is_none() {
            self.error = values
                .iter()
                .map(AsRef::as_ref)
                .filter(|v| *v != MISSING_TEXT)
                .find_map(|v| parse_date(v).err());
        }
        self.encoded_column(name.into(), ValueType::Temporal, values)
    }

    fn encoded_column<S: AsRef<str>>(
        mut self,
        name: String,
        value_type: ValueType,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut dictionary = StringDictionary::new();
        let cells = values
            .into_iter()
            .map(|v| f64::from(dictionary.intern(v.as_ref())))
            .collect();
        self.columns.push(Column {
            name,
            value_type,
            cells,
            dictionary: Some(dictionary),
        });
        self
    }

    pub fn build(self) -> GeneralizationResult<MemoryDataset> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let row_count = self.columns.first().map_or(0, |c| c.cells.len());
        for (i, column) in self.columns.iter().enumerate() {
            if column.cells.len() != row_count {
                return Err(GeneralizationError::parse(
                    column.name.as_str(),
                    format!("column holds {} rows, expected {row_count}", column.cells.len()),
                ));
            }
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(GeneralizationError::parse(column.name.as_str(), "duplicate column name"));
            }
        }
        Ok(MemoryDataset {
            columns: self.columns,
            row_count,
        })
    }
}
