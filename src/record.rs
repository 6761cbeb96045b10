use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;

use crate::error::ConfigLibError;
use crate::normalize::normalize_val;
use crate::source::{RawRow, SUBJECT_COLUMN};

pub const DOWNLOAD_BASE_URL: &str =
    "https://g-387955.7ce1a.03c0.data.globus.org/ConfigLib/DATA-zip/";

/// Tag source columns, in the order tags appear in the output.
const TAG_COLUMNS: [&str; 6] = [
    SUBJECT_COLUMN,
    "# of Nodes",
    "Dim",
    "Generator",
    "Adjacency Method",
    "Perturbation Method",
];

const START_PARAM_COLUMN: &str = "Start Param";
const END_PARAM_COLUMN: &str = "End Param";

const CREATOR_COLUMN: &str = "Creator";
const DATE_CREATED_COLUMN: &str = "Date Created";
const NOTES_COLUMN: &str = "Notes";
const GROUP_COLUMN: &str = "File Name Prefix";

#[derive(Debug, Clone, Serialize)]
pub struct GmetaEntry {
    pub subject: String,
    pub visible_to: Vec<String>,
    pub content: EntryContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryContent {
    pub creator: Option<String>,
    pub date_created: Option<String>,
    pub notes: Option<String>,
    pub name: String,
    pub tags: Vec<String>,
    pub group: Option<String>,
    pub website: String,
}

#[derive(Debug, Serialize)]
pub struct IngestDocument {
    pub ingest_type: String,
    pub ingest_data: IngestData,
}

#[derive(Debug, Serialize)]
pub struct IngestData {
    pub gmeta: Vec<GmetaEntry>,
}

impl IngestDocument {
    pub fn new(gmeta: Vec<GmetaEntry>) -> Self {
        Self {
            ingest_type: "GMetaList".to_string(),
            ingest_data: IngestData { gmeta },
        }
    }

    /// Serialize to pretty JSON and write via a temp file plus rename, so
    /// the output path either holds the complete document or nothing new.
    pub fn write(&self, path: &Utf8Path) -> Result<(), ConfigLibError> {
        let content = serde_json::to_vec_pretty(self)
            .map_err(|err| ConfigLibError::Filesystem(err.to_string()))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.as_std_path(),
            _ => std::path::Path::new("."),
        };
        let mut temp = tempfile::Builder::new()
            .prefix("ingest-data")
            .tempfile_in(parent)
            .map_err(|err| ConfigLibError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| ConfigLibError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| ConfigLibError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

/// Build the cleaned tag list for one row: the six source fields in fixed
/// order, dropping anything that normalizes to absent, then the derived
/// start/end range tag when at least one side exists.
pub fn make_tags(row: &RawRow) -> Vec<String> {
    let mut tags = TAG_COLUMNS
        .iter()
        .filter_map(|column| normalize_val(row.get(column)))
        .collect::<Vec<_>>();

    let start = normalize_val(row.get(START_PARAM_COLUMN));
    let end = normalize_val(row.get(END_PARAM_COLUMN));
    match (start, end) {
        (Some(start), Some(end)) => tags.push(format!("{start}-{end}")),
        (Some(start), None) => tags.push(start),
        (None, Some(end)) => tags.push(end),
        (None, None) => {}
    }

    tags
}

/// Assemble one metadata record, or `None` when the row has no usable
/// subject. The website URL concatenates the raw, unnormalized subject
/// text; `subject` and `name` carry the normalized value.
pub fn build_entry(row: &RawRow) -> Option<GmetaEntry> {
    let subject = normalize_val(row.get(SUBJECT_COLUMN))?;

    let creator = normalize_val(row.get(CREATOR_COLUMN));
    let date_created = normalize_val(row.get(DATE_CREATED_COLUMN));
    let notes = normalize_val(row.get(NOTES_COLUMN));
    let group = normalize_val(row.get(GROUP_COLUMN));

    let website = format!(
        "{DOWNLOAD_BASE_URL}{}.zip",
        row.get(SUBJECT_COLUMN).raw_text()
    );

    Some(GmetaEntry {
        subject: subject.clone(),
        visible_to: vec!["public".to_string()],
        content: EntryContent {
            creator,
            date_created,
            notes,
            name: subject,
            tags: make_tags(row),
            group,
            website,
        },
    })
}
