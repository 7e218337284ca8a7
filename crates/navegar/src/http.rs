//! REST helper for API-level setup and assertions.
//!
//! UI suites often need to seed or verify state over HTTP. [`ApiClient`]
//! wraps a blocking [`reqwest`] client behind a small dispatch surface:
//! the method arrives as a string, is validated before any network
//! traffic, and the response comes back as an [`ApiResponse`] whose
//! JSON accessor is best-effort.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, warn};

use crate::result::{NavegarError, NavegarResult};

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Canonical uppercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = NavegarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(NavegarError::UnsupportedOption {
                kind: "HTTP method",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parse the body as JSON, logging and returning `None` on failure
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        match serde_json::from_str(&self.body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(status = self.status, error = %e, "response body is not JSON");
                None
            }
        }
    }

    /// Assert that the body parses as JSON equal to `expected`
    pub fn assert_json_matches(&self, expected: &Value) -> NavegarResult<()> {
        let actual = self.json().ok_or_else(|| NavegarError::AssertionFailed {
            message: format!("response body is not JSON: {:?}", self.body),
        })?;
        assert_json_equal(expected, &actual)
    }
}

/// Assert that two JSON values are equal, embedding both in the message
pub fn assert_json_equal(expected: &Value, actual: &Value) -> NavegarResult<()> {
    if expected == actual {
        return Ok(());
    }
    let expected_text =
        serde_json::to_string_pretty(expected).unwrap_or_else(|_| expected.to_string());
    let actual_text = serde_json::to_string_pretty(actual).unwrap_or_else(|_| actual.to_string());
    Err(NavegarError::AssertionFailed {
        message: format!("JSON mismatch\nexpected:\n{expected_text}\nactual:\n{actual_text}"),
    })
}

/// Blocking HTTP client with string-method dispatch
#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::blocking::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Client with reqwest defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Dispatch a request by method name.
    ///
    /// The method string is parsed before anything touches the network,
    /// so an unsupported method fails fast with
    /// [`NavegarError::UnsupportedOption`]. A JSON body is only sent
    /// for POST and PUT.
    pub fn request(
        &self,
        method: &str,
        url: &str,
        headers: Option<&HashMap<String, String>>,
        body: Option<&Value>,
    ) -> NavegarResult<ApiResponse> {
        let method = HttpMethod::from_str(method)?;
        debug!(%method, url, "dispatching request");

        let mut builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        if let Some(headers) = headers {
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if matches!(method, HttpMethod::Post | HttpMethod::Put) {
            if let Some(body) = body {
                builder = builder.json(body);
            }
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(status, "response received");
        Ok(ApiResponse { status, body })
    }

    /// GET without headers
    pub fn get(&self, url: &str) -> NavegarResult<ApiResponse> {
        self.request("GET", url, None, None)
    }

    /// POST a JSON body without extra headers
    pub fn post(&self, url: &str, body: &Value) -> NavegarResult<ApiResponse> {
        self.request("POST", url, None, Some(body))
    }

    /// PUT a JSON body without extra headers
    pub fn put(&self, url: &str, body: &Value) -> NavegarResult<ApiResponse> {
        self.request("PUT", url, None, Some(body))
    }

    /// DELETE without headers
    pub fn delete(&self, url: &str) -> NavegarResult<ApiResponse> {
        self.request("DELETE", url, None, None)
    }
}
