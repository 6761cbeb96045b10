use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ConfigLibError;

pub const DEFAULT_CREDENTIAL_PATH: &str = ".secrets/globus_search_index";
pub const DEFAULT_INDEX_ID: &str = "024ff433-3dd2-496a-85b6-47f4b32e4d42";
pub const DEFAULT_SOURCE_URL: &str =
    "https://g-387955.7ce1a.03c0.data.globus.org/ConfigLib/ConfigLib_20250922.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Library";
pub const DEFAULT_HEADER_ROW_OFFSET: usize = 3;
pub const DEFAULT_OUTPUT_PATH: &str = "ingest_data.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub credential_path: Option<Utf8PathBuf>,
    #[serde(default)]
    pub index_id: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub sheet_name: Option<String>,
    #[serde(default)]
    pub header_row_offset: Option<usize>,
    #[serde(default)]
    pub output_path: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub credential_path: Utf8PathBuf,
    pub index_id: String,
    pub source_url: String,
    pub sheet_name: String,
    pub header_row_offset: usize,
    pub output_path: Utf8PathBuf,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve configuration from an optional JSON file.
    ///
    /// Without an explicit path, a missing `configlib-search.json` in the
    /// current directory is fine and every field falls back to its default;
    /// an explicitly named file must exist and parse.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, ConfigLibError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from("configlib-search.json"),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Ok(Self::resolve_config(Config::default()));
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| ConfigLibError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| ConfigLibError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            credential_path: config
                .credential_path
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CREDENTIAL_PATH)),
            index_id: config.index_id.unwrap_or_else(|| DEFAULT_INDEX_ID.to_string()),
            source_url: config
                .source_url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            sheet_name: config
                .sheet_name
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            header_row_offset: config.header_row_offset.unwrap_or(DEFAULT_HEADER_ROW_OFFSET),
            output_path: config
                .output_path
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_PATH)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_empty_config_uses_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default());
        assert_eq!(resolved.credential_path, DEFAULT_CREDENTIAL_PATH);
        assert_eq!(resolved.index_id, DEFAULT_INDEX_ID);
        assert_eq!(resolved.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(resolved.sheet_name, "Library");
        assert_eq!(resolved.header_row_offset, 3);
        assert_eq!(resolved.output_path, DEFAULT_OUTPUT_PATH);
    }

    #[test]
    fn resolve_config_keeps_explicit_values() {
        let config = Config {
            sheet_name: Some("Archive".to_string()),
            header_row_offset: Some(0),
            ..Config::default()
        };
        let resolved = ConfigLoader::resolve_config(config);
        assert_eq!(resolved.sheet_name, "Archive");
        assert_eq!(resolved.header_row_offset, 0);
        assert_eq!(resolved.output_path, DEFAULT_OUTPUT_PATH);
    }
}
