//! Auth configuration types

use serde::{Deserialize, Serialize};

/// Location for access token placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    Header,
    /// Place in query parameter
    #[default]
    Query,
}

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Access token placed in a header or query parameter
    AccessToken {
        /// Where to place the token
        location: Location,
        /// Header or query parameter name
        name: String,
        /// Prefix to add before the value (e.g., "Token ")
        prefix: Option<String>,
        /// The token value
        value: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Token sent as a query parameter, the way the collection API expects it
    pub fn query_token(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AccessToken {
            location: Location::Query,
            name: name.into(),
            prefix: None,
            value: value.into(),
        }
    }

    /// Bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// True when no credentials are attached
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
