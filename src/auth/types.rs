//! Auth configuration types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username (the API key for key-based access)
        username: String,
        /// Password
        #[serde(default)]
        password: String,
    },

    /// Bearer token authentication (personal access or OAuth token)
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Arbitrary headers added to every request
    CustomHeaders {
        /// Header name to value
        headers: HashMap<String, String>,
    },
}

impl AuthConfig {
    /// Basic auth with an API key as the username and an empty password
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::Basic {
            username: key.into(),
            password: String::new(),
        }
    }

    /// Bearer auth with the given token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Check if any credential is configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
