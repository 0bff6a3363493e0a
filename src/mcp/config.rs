//! MCP transport configuration

use std::fmt;

/// Everything needed to open a streamable-HTTP MCP connection
#[derive(Clone, PartialEq)]
pub struct TransportConfig {
    /// URI of the MCP server (e.g., "https://dev.reltio.com/ai/tools/mcp/")
    pub endpoint: String,

    /// Headers sent with every request, in insertion order
    pub headers: Vec<(String, String)>,
}

impl TransportConfig {
    /// Create a configuration with no headers
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: Vec::new(),
        }
    }

    /// Bearer-authenticated JSON configuration
    pub fn bearer(endpoint: impl Into<String>, token: &str) -> Self {
        Self::new(endpoint)
            .with_header("Authorization", format!("Bearer {}", token))
            .with_header("Content-Type", "application/json")
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("TransportConfig")
            .field("endpoint", &self.endpoint)
            .field("headers", &headers)
            .finish()
    }
}
