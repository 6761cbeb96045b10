use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::credentials::CredentialPair;
use crate::domain::IndexId;
use crate::error::ConfigLibError;

const AUTH_TOKEN_URL: &str = "https://auth.globus.org/v2/oauth2/token";
const SEARCH_BASE_URL: &str = "https://search.api.globus.org";
const SEARCH_SCOPE: &str = "urn:globus:auth:scope:search.api.globus.org:all";

pub trait SearchClient: Send + Sync {
    fn delete_index(&self, index_id: &IndexId) -> Result<(), ConfigLibError>;
}

#[derive(Clone)]
pub struct SearchHttpClient {
    client: Client,
    auth_url: String,
    base_url: String,
    credentials: CredentialPair,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl SearchHttpClient {
    pub fn new(credentials: CredentialPair) -> Result<Self, ConfigLibError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("configlib-search/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ConfigLibError::SearchHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ConfigLibError::SearchHttp(err.to_string()))?;
        Ok(Self {
            client,
            auth_url: AUTH_TOKEN_URL.to_string(),
            base_url: SEARCH_BASE_URL.to_string(),
            credentials,
        })
    }

    /// Client-credentials token exchange. A fresh token is requested per
    /// invocation; the tool is single-shot, so nothing is cached.
    fn request_token(&self) -> Result<String, ConfigLibError> {
        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", SEARCH_SCOPE),
            ])
            .send()
            .map_err(|err| ConfigLibError::SearchHttp(err.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "token request failed".to_string());
            // The token endpoint answers 400/401 for rejected credentials.
            if matches!(status, 400 | 401 | 403) {
                return Err(ConfigLibError::Authentication(message));
            }
            return Err(ConfigLibError::Service { status, message });
        }

        let body: TokenResponse = response
            .json()
            .map_err(|err| ConfigLibError::SearchHttp(err.to_string()))?;
        Ok(body.access_token)
    }
}

impl SearchClient for SearchHttpClient {
    fn delete_index(&self, index_id: &IndexId) -> Result<(), ConfigLibError> {
        let token = self.request_token()?;
        let url = format!("{}/v1/index/{}", self.base_url, index_id.as_str());
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .map_err(|err| ConfigLibError::SearchHttp(err.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "delete request failed".to_string());
        Err(delete_error(status, message, index_id))
    }
}

fn delete_error(status: u16, message: String, index_id: &IndexId) -> ConfigLibError {
    match status {
        401 | 403 => ConfigLibError::Authentication(message),
        404 => ConfigLibError::IndexNotFound(index_id.to_string()),
        status => ConfigLibError::Service { status, message },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn index_id() -> IndexId {
        "024ff433-3dd2-496a-85b6-47f4b32e4d42".parse().unwrap()
    }

    #[test]
    fn delete_status_mapping() {
        assert_matches!(
            delete_error(401, "no".to_string(), &index_id()),
            ConfigLibError::Authentication(_)
        );
        assert_matches!(
            delete_error(403, "no".to_string(), &index_id()),
            ConfigLibError::Authentication(_)
        );
        assert_matches!(
            delete_error(404, "gone".to_string(), &index_id()),
            ConfigLibError::IndexNotFound(_)
        );
        assert_matches!(
            delete_error(429, "slow down".to_string(), &index_id()),
            ConfigLibError::Service { status: 429, .. }
        );
        assert_matches!(
            delete_error(500, "fault".to_string(), &index_id()),
            ConfigLibError::Service { status: 500, .. }
        );
    }
}
