use std::fmt;

use serde::{Deserialize, Serialize};

/// Response of `GET /config/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigStatus {
    #[serde(default)]
    pub is_configured: bool,
}

/// AI provider settings submitted to `POST /config`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
    pub publishable_key: Option<String>,
    pub project_url: Option<String>,
}

// Keep the key out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("model_name", &self.model_name)
            .field("publishable_key", &self.publishable_key)
            .field("project_url", &self.project_url)
            .finish()
    }
}
