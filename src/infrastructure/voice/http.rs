use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::voice::{
    CallMetadata, OutboundCall, PlacedCall, VoiceCallProvider,
};

#[derive(Debug, Clone)]
pub struct VoiceClientConfig {
    pub base_url: String,
    pub api_key: String,
    /// `None` leaves the deadline to the HTTP stack and the provider.
    pub timeout: Option<Duration>,
    pub voice: String,
    pub model: String,
    pub max_duration_minutes: u32,
    pub wait_for_greeting: bool,
    pub interruption_threshold: u32,
    pub temperature: f32,
}

pub struct HttpVoiceClient {
    http: Client,
    config: VoiceClientConfig,
}

impl HttpVoiceClient {
    pub fn new(config: VoiceClientConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&config.api_key).context("invalid voice API key header value")?,
        );

        let mut builder = Client::builder()
            .user_agent("callback-desk/voice")
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build voice API client")?;

        Ok(Self { http, config })
    }

    fn calls_url(&self) -> String {
        format!("{}/v1/calls", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VoiceCallProvider for HttpVoiceClient {
    async fn place_call(&self, call: &OutboundCall) -> anyhow::Result<PlacedCall> {
        let payload = PlaceCallPayload {
            phone_number: &call.phone_number,
            task: &call.task,
            first_sentence: &call.first_sentence,
            knowledge_base: call.knowledge_base.as_deref(),
            voice: &self.config.voice,
            model: &self.config.model,
            wait_for_greeting: self.config.wait_for_greeting,
            interruption_threshold: self.config.interruption_threshold,
            temperature: self.config.temperature,
            max_duration: self.config.max_duration_minutes,
            request_data: &call.metadata,
        };

        let response = self
            .http
            .post(self.calls_url())
            .json(&payload)
            .send()
            .await
            .context("voice API unreachable")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read voice API response")?;
        debug!(status = %status, callback_request_id = %call.metadata.callback_request_id, "voice API responded");

        if !status.is_success() {
            let detail = serde_json::from_str::<PlaceCallResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(body);
            anyhow::bail!("voice API returned {status}: {detail}");
        }

        let parsed: PlaceCallResponse =
            serde_json::from_str(&body).context("failed to parse voice API response")?;

        if parsed.status.as_deref() != Some("success") {
            anyhow::bail!(
                "voice API refused call: {}",
                parsed
                    .message
                    .unwrap_or_else(|| "unknown error".to_string())
            );
        }

        let call_id = parsed
            .call_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("voice API response is missing call_id"))?;

        Ok(PlacedCall {
            call_id,
            status: parsed.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct PlaceCallPayload<'a> {
    phone_number: &'a str,
    task: &'a str,
    first_sentence: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    knowledge_base: Option<&'a str>,
    voice: &'a str,
    model: &'a str,
    wait_for_greeting: bool,
    interruption_threshold: u32,
    temperature: f32,
    max_duration: u32,
    request_data: &'a CallMetadata,
}

#[derive(Debug, Deserialize)]
struct PlaceCallResponse {
    status: Option<String>,
    call_id: Option<String>,
    message: Option<String>,
}
