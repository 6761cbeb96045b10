use std::fs;

use camino::Utf8Path;

use crate::error::ConfigLibError;

/// Client-credential pair for the search service.
///
/// Loaded from a three-line `label value` file:
/// line 0 carries the client uuid, line 2 the secret. Values live in memory
/// for the duration of the process and are never logged or serialized.
#[derive(Clone)]
pub struct CredentialPair {
    pub client_id: String,
    pub secret: String,
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl CredentialPair {
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigLibError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| ConfigLibError::CredentialsRead(path.to_path_buf()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigLibError> {
        let lines = content.lines().collect::<Vec<_>>();
        let client_id = field_value(&lines, 0)?;
        let secret = field_value(&lines, 2)?;
        Ok(Self { client_id, secret })
    }
}

fn field_value(lines: &[&str], index: usize) -> Result<String, ConfigLibError> {
    let line = lines
        .get(index)
        .ok_or_else(|| ConfigLibError::CredentialsFormat(format!("missing line {index}")))?;
    let value = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ConfigLibError::CredentialsFormat(format!("missing value on line {index}")))?;
    if value.is_empty() {
        return Err(ConfigLibError::CredentialsFormat(format!(
            "empty value on line {index}"
        )));
    }
    Ok(value.to_string())
}
