use anyhow::{Context, Result};
use reqwest::RequestBuilder;
use serde::Deserialize;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// How outgoing Google API calls are authorized
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Pre-issued OAuth access token
    AccessToken(String),
    /// Ask the GCE/Cloud Run metadata server for a token on every call
    MetadataServer,
    /// No `Authorization` header (emulators, public buckets)
    Anonymous,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl Credentials {
    /// Pick a static token when one is configured, otherwise the metadata server
    pub fn from_optional_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Credentials::AccessToken(token),
            _ => Credentials::MetadataServer,
        }
    }

    async fn bearer_token(&self, http: &reqwest::Client) -> Result<Option<String>> {
        match self {
            Credentials::AccessToken(token) => Ok(Some(token.clone())),
            Credentials::Anonymous => Ok(None),
            Credentials::MetadataServer => {
                let response = http
                    .get(METADATA_TOKEN_URL)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .context("Failed to reach metadata server")?
                    .error_for_status()
                    .context("Metadata server refused token request")?;

                let token: MetadataToken = response
                    .json()
                    .await
                    .context("Failed to parse metadata token")?;
                Ok(Some(token.access_token))
            }
        }
    }

    /// Attach the `Authorization` header, if any, to a request
    pub async fn authorize(
        &self,
        http: &reqwest::Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder> {
        Ok(match self.bearer_token(http).await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_falls_back_to_metadata_server() {
        assert!(matches!(
            Credentials::from_optional_token(Some("  ".to_string())),
            Credentials::MetadataServer
        ));
        assert!(matches!(
            Credentials::from_optional_token(None),
            Credentials::MetadataServer
        ));
        assert!(matches!(
            Credentials::from_optional_token(Some("ya29.token".to_string())),
            Credentials::AccessToken(_)
        ));
    }
}
