use csv::{ReaderBuilder, Trim};

use crate::types::{IngestError, Result};

/// One parsed CSV object. The first line is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvFile {
    pub key: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl CsvFile {
    pub fn parse(key: &str, bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(bytes);
        let csv_error = |source| IngestError::Csv {
            file: key.to_string(),
            source,
        };
        let headers = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(
                record
                    .iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect(),
            );
        }
        Ok(Self {
            key: key.to_string(),
            headers,
            rows,
        })
    }

    /// Headers are matched without regard to ASCII case.
    fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(column))
            .ok_or_else(|| IngestError::MissingColumn {
                file: self.key.clone(),
                column: column.to_string(),
            })
    }

    /// Rows restricted to `columns`, in that order. Short rows read as null.
    pub fn project(&self, columns: &[&str]) -> Result<Vec<Vec<Option<String>>>> {
        let indexes = columns
            .iter()
            .map(|column| self.column_index(column))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                indexes
                    .iter()
                    .map(|index| row.get(*index).cloned().flatten())
                    .collect()
            })
            .collect())
    }
}
