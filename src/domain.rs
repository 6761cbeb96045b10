use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigLibError;

/// Identifier of a managed search index on the remote service.
///
/// The service hands these out as lowercase UUIDs; we only validate the
/// shape (8-4-4-4-12 hex groups), not version bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexId(String);

impl IndexId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IndexId {
    type Err = ConfigLibError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        let groups = normalized.split('-').collect::<Vec<_>>();
        let lengths = [8usize, 4, 4, 4, 12];
        let is_valid = groups.len() == lengths.len()
            && groups
                .iter()
                .zip(lengths)
                .all(|(group, len)| group.len() == len && group.chars().all(|ch| ch.is_ascii_hexdigit()));
        if !is_valid {
            return Err(ConfigLibError::InvalidIndexId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_index_id_valid() {
        let id: IndexId = "024FF433-3dd2-496a-85b6-47f4b32e4d42".parse().unwrap();
        assert_eq!(id.as_str(), "024ff433-3dd2-496a-85b6-47f4b32e4d42");
    }

    #[test]
    fn parse_index_id_invalid() {
        let err = "not-an-index".parse::<IndexId>().unwrap_err();
        assert_matches!(err, ConfigLibError::InvalidIndexId(_));

        let err = "024ff433-3dd2-496a-85b6".parse::<IndexId>().unwrap_err();
        assert_matches!(err, ConfigLibError::InvalidIndexId(_));

        let err = "024ff433-3dd2-496a-85b6-47f4b32e4dzz"
            .parse::<IndexId>()
            .unwrap_err();
        assert_matches!(err, ConfigLibError::InvalidIndexId(_));
    }
}
