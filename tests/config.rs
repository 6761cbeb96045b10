use assert_matches::assert_matches;

use configlib_search::config::{ConfigLoader, DEFAULT_INDEX_ID, DEFAULT_SOURCE_URL};
use configlib_search::error::ConfigLibError;

#[test]
fn resolve_explicit_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("configlib-search.json");
    std::fs::write(
        &path,
        r#"{"sheet_name": "Archive", "output_path": "out/batch.json"}"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.sheet_name, "Archive");
    assert_eq!(resolved.output_path, "out/batch.json");
    // Untouched fields keep their defaults.
    assert_eq!(resolved.index_id, DEFAULT_INDEX_ID);
    assert_eq!(resolved.source_url, DEFAULT_SOURCE_URL);
}

#[test]
fn resolve_explicit_missing_file_fails() {
    let err = ConfigLoader::resolve(Some("does-not-exist.json")).unwrap_err();
    assert_matches!(err, ConfigLibError::ConfigRead(_));
}

#[test]
fn resolve_rejects_malformed_json() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("configlib-search.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, ConfigLibError::ConfigParse(_));
}
