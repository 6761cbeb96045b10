use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use calamine::{Data, Range, Reader, Xlsx};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::ConfigLibError;
use crate::normalize::CellScalar;

pub const SUBJECT_COLUMN: &str = "PC Name";

const MISSING: CellScalar = CellScalar::Missing;

pub trait SheetSource: Send + Sync {
    fn fetch_workbook(&self) -> Result<Vec<u8>, ConfigLibError>;
}

#[derive(Clone)]
pub struct HttpSheetSource {
    client: Client,
    url: String,
}

impl HttpSheetSource {
    pub fn new(url: &str) -> Result<Self, ConfigLibError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("configlib-search/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ConfigLibError::Transfer(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| ConfigLibError::Transfer(err.to_string()))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl SheetSource for HttpSheetSource {
    fn fetch_workbook(&self) -> Result<Vec<u8>, ConfigLibError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|err| ConfigLibError::Transfer(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "source request failed".to_string());
            return Err(ConfigLibError::TransferStatus { status, message });
        }
        let bytes = response
            .bytes()
            .map_err(|err| ConfigLibError::Transfer(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// One spreadsheet row, keyed by trimmed column name. Columns missing from
/// the sheet read as `Missing`, same as an empty cell.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, CellScalar>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> &CellScalar {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellScalar::is_missing)
    }
}

impl FromIterator<(String, CellScalar)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, CellScalar)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

pub fn parse_workbook(
    bytes: Vec<u8>,
    sheet_name: &str,
    header_row_offset: usize,
) -> Result<Vec<RawRow>, ConfigLibError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|err| ConfigLibError::Workbook(err.to_string()))?;
    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(ConfigLibError::SheetNotFound(sheet_name.to_string()));
    }
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|err| ConfigLibError::Workbook(err.to_string()))?;
    rows_from_range(&range, header_row_offset)
}

/// Extract data rows from a sheet range.
///
/// The header row sits at `header_row_offset` (zero-based) within the range;
/// column names are taken verbatim from it and trimmed. Rows that are
/// entirely empty, and rows with no usable subject cell, are dropped here so
/// downstream record construction only ever sees candidate rows.
pub fn rows_from_range(
    range: &Range<Data>,
    header_row_offset: usize,
) -> Result<Vec<RawRow>, ConfigLibError> {
    let mut sheet_rows = range.rows().skip(header_row_offset);
    let header = sheet_rows
        .next()
        .ok_or_else(|| ConfigLibError::MissingColumn(SUBJECT_COLUMN.to_string()))?;

    let columns = header
        .iter()
        .map(|cell| match cell {
            Data::Empty => None,
            other => Some(other.to_string().trim().to_string()),
        })
        .collect::<Vec<_>>();
    if !columns
        .iter()
        .flatten()
        .any(|name| name == SUBJECT_COLUMN)
    {
        return Err(ConfigLibError::MissingColumn(SUBJECT_COLUMN.to_string()));
    }

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let row = sheet_row
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| {
                columns
                    .get(idx)
                    .and_then(|name| name.clone())
                    .map(|name| (name, CellScalar::from(cell)))
            })
            .collect::<RawRow>();
        if row.is_blank() {
            continue;
        }
        if row.get(SUBJECT_COLUMN).is_missing() {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_range() -> Range<Data> {
        // Three banner rows, then the header at offset 3, then data.
        let mut range = Range::new((0, 0), (6, 2));
        range.set_value((0, 0), Data::String("Configuration Library".to_string()));
        range.set_value((3, 0), Data::String(" PC Name ".to_string()));
        range.set_value((3, 1), Data::String("# of Nodes".to_string()));
        range.set_value((3, 2), Data::String("Creator".to_string()));
        range.set_value((4, 0), Data::String("pc_001".to_string()));
        range.set_value((4, 1), Data::Float(1024.0));
        range.set_value((4, 2), Data::String("abe".to_string()));
        // Row 5 left entirely empty.
        range.set_value((6, 1), Data::Float(16.0));
        range.set_value((6, 2), Data::String("bea".to_string()));
        range
    }

    #[test]
    fn header_names_are_trimmed() {
        let rows = rows_from_range(&sample_range(), 3).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get(SUBJECT_COLUMN),
            &CellScalar::Text("pc_001".to_string())
        );
        assert_eq!(rows[0].get("# of Nodes"), &CellScalar::Float(1024.0));
    }

    #[test]
    fn blank_and_subjectless_rows_are_dropped() {
        // Row 5 is blank, row 6 has data but no subject cell.
        let rows = rows_from_range(&sample_range(), 3).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn missing_subject_column_is_fatal() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Name".to_string()));
        range.set_value((0, 1), Data::String("Creator".to_string()));
        range.set_value((1, 0), Data::String("pc_001".to_string()));
        let err = rows_from_range(&range, 0).unwrap_err();
        assert_matches!(err, ConfigLibError::MissingColumn(_));
    }

    #[test]
    fn unknown_columns_read_as_missing() {
        let rows = rows_from_range(&sample_range(), 3).unwrap();
        assert!(rows[0].get("Perturbation Method").is_missing());
    }
}
