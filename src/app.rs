use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::domain::IndexId;
use crate::error::ConfigLibError;
use crate::record::{IngestDocument, build_entry};
use crate::search::SearchClient;
use crate::source::{RawRow, SheetSource, parse_workbook};

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub index_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub records: usize,
    pub output_path: String,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn event(&self, event: ProgressEvent) {
        println!("{}", event.message);
    }
}

#[derive(Clone)]
pub struct App<S: SearchClient, F: SheetSource> {
    search: S,
    source: F,
}

impl<S: SearchClient, F: SheetSource> App<S, F> {
    pub fn new(search: S, source: F) -> Self {
        Self { search, source }
    }

    /// Delete the target index. Irreversible; the only notice the operator
    /// gets is the identifier printed before the call goes out.
    pub fn delete_index(
        &self,
        index_id: &IndexId,
        sink: &dyn ProgressSink,
    ) -> Result<DeleteResult, ConfigLibError> {
        sink.event(ProgressEvent {
            message: format!("Deleting index: {index_id}"),
        });
        self.search.delete_index(index_id)?;
        sink.event(ProgressEvent {
            message: "Index successfully deleted.".to_string(),
        });
        Ok(DeleteResult {
            index_id: index_id.to_string(),
            deleted: true,
        })
    }

    /// Fetch the source spreadsheet, normalize its rows, and write the batch
    /// document. The output file is written exactly once, after every record
    /// has been built; any failure along the way leaves it untouched.
    pub fn ingest(
        &self,
        config: &ResolvedConfig,
        sink: &dyn ProgressSink,
    ) -> Result<IngestResult, ConfigLibError> {
        sink.event(ProgressEvent {
            message: format!("Downloading {}", config.source_url),
        });
        let bytes = self.source.fetch_workbook()?;
        let rows = parse_workbook(bytes, &config.sheet_name, config.header_row_offset)?;
        let document = build_document(&rows);
        let records = document.ingest_data.gmeta.len();
        document.write(&config.output_path)?;
        sink.event(ProgressEvent {
            message: format!("Generated {} with {records} entries.", config.output_path),
        });
        Ok(IngestResult {
            records,
            output_path: config.output_path.to_string(),
        })
    }
}

pub fn build_document(rows: &[RawRow]) -> IngestDocument {
    IngestDocument::new(rows.iter().filter_map(build_entry).collect())
}
