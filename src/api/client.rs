use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::{
    ApiConfig, ConfigStatus, Conversation, ConversationId, MessagesPage, NewConversation,
    NewMessage,
};

const JSON: &str = "application/json";
const REQUEST_ID_HEADER: &str = "X-Request-Id";

// Characters that cannot appear verbatim inside a single path segment
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'[')
    .add(b']');

/// Client for the backend REST API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    server_url: Url,
    api_prefix: String,
}

impl ApiClient {
    pub fn new(server_url: Url, api_prefix: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        // A backend on this machine is never reached through a proxy
        if is_loopback(&server_url) {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self { http, server_url, api_prefix: normalize_prefix(api_prefix) })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// URL of an endpoint below the API prefix, e.g. `/chat/conversations`
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.root_url(&format!("{}{}", self.api_prefix, endpoint))
    }

    fn root_url(&self, path: &str) -> Result<Url, ApiError> {
        let root = self.server_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", root, path))?)
    }

    /// Liveness probe at the server root (outside the API prefix)
    pub async fn health(&self) -> Result<Value, ApiError> {
        let url = self.root_url("/health")?;
        self.request::<()>(Method::GET, url, None).await
    }

    pub async fn config_status(&self) -> Result<ConfigStatus, ApiError> {
        let url = self.endpoint_url("/config/status")?;
        extract_data(self.request::<()>(Method::GET, url, None).await?)
    }

    pub async fn save_config(&self, config: &ApiConfig) -> Result<(), ApiError> {
        let url = self.endpoint_url("/config")?;
        self.request(Method::POST, url, Some(config)).await?;
        Ok(())
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let url = self.endpoint_url("/chat/conversations")?;
        extract_data(self.request::<()>(Method::GET, url, None).await?)
    }

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation, ApiError> {
        let url = self.endpoint_url("/chat/conversations")?;
        let body = NewConversation { title };
        extract_data(self.request(Method::POST, url, Some(&body)).await?)
    }

    pub async fn conversation_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<MessagesPage, ApiError> {
        let url = self.endpoint_url(&messages_path(conversation_id))?;
        extract_data(self.request::<()>(Method::GET, url, None).await?)
    }

    pub async fn send_message(
        &self,
        conversation_id: &ConversationId,
        content: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint_url(&messages_path(conversation_id))?;
        let body = NewMessage { content };
        self.request(Method::POST, url, Some(&body)).await?;
        Ok(())
    }

    /// The single request wrapper every endpoint goes through
    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(%method, %url, %request_id, "sending api request");

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let result: Result<Value, ApiError> = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?;
            debug!(status, %request_id, "received api response");
            parse_response(status, &bytes)
        }
        .await;

        if let Err(e) = &result {
            warn!(%method, %url, %request_id, error = %e, "api request failed");
        }
        result
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn messages_path(conversation_id: &ConversationId) -> String {
    format!(
        "/chat/conversations/{}/messages",
        utf8_percent_encode(conversation_id.as_str(), SEGMENT_ENCODE_SET)
    )
}

/// Normalize an API prefix to `/segment` form; empty or `/` means no prefix
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{}", trimmed) }
}

fn parse_response(status: u16, body: &[u8]) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_slice::<Value>(body).ok().and_then(|v| error_message(&v));
        return Err(ApiError::Status { status, message });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        error => error.get("message").and_then(Value::as_str).map(str::to_string),
    }
}

fn extract_data<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    match body {
        Value::Object(mut fields) => match fields.remove("data") {
            None | Some(Value::Null) => Err(ApiError::MissingData),
            Some(data) => Ok(serde_json::from_value(data)?),
        },
        _ => Err(ApiError::MissingData),
    }
}
