use std::time::Duration;

use hypr_bot_config::{ConfigSection, RemoteState, UpdatePayload};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::view::{StateView, refresh_view};

pub const UPDATE_PATH: &str = "/api/update";
pub const STATE_PATH: &str = "/api/state";
pub const PERSONALITY_PATH: &str = "/api/personality";
pub const STREAM_PATH: &str = "/api/stream";

const DEFAULT_USER_AGENT: &str = concat!("cattrix-config-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct PersonalityBody<'a> {
    value: &'a str,
}

#[derive(Serialize)]
struct StreamBody<'a> {
    video_id: &'a str,
}

pub struct ConfigSyncClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    bearer_token: Option<String>,
    user_agent: String,
}

impl ConfigSyncClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            bearer_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<ConfigSyncClient, Error> {
        let parsed = url::Url::parse(&self.base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(url::ParseError::RelativeUrlWithoutBase));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = &self.bearer_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Client)?;

        Ok(ConfigSyncClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Talks to the bot's configuration API.
///
/// Every call is a single request: no caching, no retry. Wrap calls with
/// [`crate::with_retry`] when a retry policy is wanted.
#[derive(Clone)]
pub struct ConfigSyncClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConfigSyncClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ConfigSyncClientBuilder {
        ConfigSyncClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn submit_section(&self, section: &ConfigSection) -> Result<(), Error> {
        let payload = UpdatePayload::new(section.clone());
        self.submit_payload(&payload).await
    }

    pub async fn submit_payload(&self, payload: &UpdatePayload) -> Result<(), Error> {
        self.post_json(UPDATE_PATH, payload).await?;
        tracing::info!(section = %payload.name(), "section_submitted");
        Ok(())
    }

    pub async fn fetch_state(&self) -> Result<RemoteState, Error> {
        let resp = self.http.get(self.url(STATE_PATH)).send().await?;
        let resp = ensure_success(resp).await?;
        let body = resp.bytes().await?;

        let state: RemoteState = serde_json::from_slice(&body)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        tracing::debug!(streams = state.streams.len(), "state_fetched");
        Ok(state)
    }

    /// Single-field personality update on its dedicated endpoint.
    pub async fn set_personality(&self, value: &str) -> Result<(), Error> {
        self.post_json(PERSONALITY_PATH, &PersonalityBody { value })
            .await?;
        tracing::info!("personality_set");
        Ok(())
    }

    /// Asks the server to join the live chat of `video_id`.
    pub async fn join_stream(&self, video_id: &str) -> Result<(), Error> {
        self.post_json(STREAM_PATH, &StreamBody { video_id }).await?;
        tracing::info!(video_id = %video_id, "stream_join_requested");
        Ok(())
    }

    /// Sends `section` through its dedicated endpoint when one exists, falling
    /// back to the update endpoint otherwise.
    pub async fn submit_legacy(&self, section: &ConfigSection) -> Result<(), Error> {
        match section {
            ConfigSection::Personality(value) => self.set_personality(value).await,
            ConfigSection::Streams(streams) => {
                for video_id in streams.keys() {
                    self.join_stream(video_id).await?;
                }
                Ok(())
            }
            other => self.submit_section(other).await,
        }
    }

    /// Submits, then fetches and re-renders. The two requests run one after
    /// the other, never concurrently.
    pub async fn submit_and_refresh<V>(
        &self,
        section: &ConfigSection,
        view: &mut V,
    ) -> Result<RemoteState, Error>
    where
        V: StateView + ?Sized,
    {
        self.submit_section(section).await?;
        let state = self.fetch_state().await?;
        refresh_view(&state, view);
        Ok(state)
    }

    pub async fn submit_section_with_cancel(
        &self,
        section: &ConfigSection,
        token: &CancellationToken,
    ) -> Result<(), Error> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.submit_section(section) => result,
        }
    }

    pub async fn submit_legacy_with_cancel(
        &self,
        section: &ConfigSection,
        token: &CancellationToken,
    ) -> Result<(), Error> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.submit_legacy(section) => result,
        }
    }

    pub async fn fetch_state_with_cancel(
        &self,
        token: &CancellationToken,
    ) -> Result<RemoteState, Error> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.fetch_state() => result,
        }
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), Error> {
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = server_message(&body);
    tracing::warn!(status = status.as_u16(), detail = ?message, "server_rejected_request");
    Err(Error::Server {
        status: status.as_u16(),
        message,
    })
}

/// Pulls a human-readable message out of an error body: a JSON `error`,
/// `message` or `detail` field (also `error.message`), else the trimmed text.
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["error", "message", "detail"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(serde_json::Value::Object(inner)) => {
                    if let Some(serde_json::Value::String(s)) = inner.get("message") {
                        return Some(s.clone());
                    }
                }
                _ => {}
            }
        }
        return None;
    }

    Some(trimmed.to_string())
}
