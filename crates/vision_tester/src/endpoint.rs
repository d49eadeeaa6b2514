//! Inference server base URL

use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::error::EndpointError;

/// Default address of a locally running server
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Base URL of the inference server, stored without a trailing slash
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerEndpoint {
    base: String,
}

impl ServerEndpoint {
    /// Parse and normalize a base URL
    ///
    /// Surrounding whitespace and trailing slashes are stripped. The result
    /// must be an absolute `http` or `https` URL with a host and no query or
    /// fragment, since routes are appended to it.
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let trimmed = input.trim().trim_end_matches('/');

        let url = Url::parse(trimmed).map_err(|e| EndpointError::Invalid {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::Invalid {
                input: input.to_string(),
                reason: "missing host".to_string(),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(EndpointError::Invalid {
                input: input.to_string(),
                reason: "base URL must not carry a query or fragment".to_string(),
            });
        }

        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    /// The normalized base URL
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Build the URL of an API route, e.g. `api/tags`
    pub fn url_for(&self, route: &str) -> String {
        format!("{}/{}", self.base, route.trim_start_matches('/'))
    }

    pub fn tags_url(&self) -> String {
        self.url_for("api/tags")
    }

    pub fn generate_url(&self) -> String {
        self.url_for("api/generate")
    }
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self {
            base: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl FromStr for ServerEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
