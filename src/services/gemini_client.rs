use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    configuration::GeminiSettings,
    domain::search::{GroundingSource, QueryError, UNKNOWN_ERROR_MESSAGE},
};

const RATE_LIMIT_MARKERS: [&str; 3] = ["429", "quota", "RESOURCE_EXHAUSTED"];

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    tools: [Tool; 2],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Tool {
    GoogleSearch {},
    GoogleMaps {},
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Debug)]
pub struct Content {
    pub parts: Option<Vec<Part>>,
}

#[derive(Deserialize, Debug)]
pub struct Part {
    pub text: Option<String>,
    pub thought: Option<bool>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Deserialize, Debug)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Deserialize, Debug)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.as_ref().and_then(|c| c.first())
    }

    /// Text of the first candidate, thought parts excluded.
    pub fn text(&self) -> String {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Web citations of the first candidate in response order. Chunks
    /// without a web reference (maps places) are dropped.
    pub fn web_sources(&self) -> Vec<GroundingSource> {
        self.first_candidate()
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.grounding_chunks.as_ref())
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .map(|web| GroundingSource {
                        title: web.title.clone().unwrap_or_default(),
                        url: web.uri.clone().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Everything we could learn about a failed call, whatever shape the
/// failure came in.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpstreamError {
    pub http_status: Option<u16>,
    pub code: Option<i64>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub raw: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Single(ApiErrorEnvelope),
    List(Vec<ApiErrorEnvelope>),
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}

impl UpstreamError {
    pub fn from_response_body(http_status: u16, body: String) -> Self {
        let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(ApiErrorBody::Single(envelope)) => Some(envelope.error),
            Ok(ApiErrorBody::List(envelopes)) => envelopes.into_iter().next().map(|e| e.error),
            Err(_) => None,
        };

        match detail {
            Some(detail) => UpstreamError {
                http_status: Some(http_status),
                code: detail.code,
                status: detail.status,
                message: detail.message,
                raw: body,
            },
            None => UpstreamError {
                http_status: Some(http_status),
                raw: body,
                ..Default::default()
            },
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        // The request url holds the base url and model, neither of which may
        // feed the rate-limit markers.
        let e = e.without_url();
        UpstreamError {
            http_status: e.status().map(|s| s.as_u16()),
            message: Some(e.to_string()),
            raw: format!("{:?}", e),
            ..Default::default()
        }
    }
}

/// The one place upstream error shapes are inspected.
pub fn classify(error: &UpstreamError) -> QueryError {
    let status_is_429 = error.http_status == Some(429) || error.code == Some(429);
    let mentions_rate_limit = [
        error.message.as_deref(),
        error.status.as_deref(),
        Some(error.raw.as_str()),
    ]
    .iter()
    .flatten()
    .any(|text| RATE_LIMIT_MARKERS.iter().any(|marker| text.contains(marker)));

    if status_is_429 || mentions_rate_limit {
        return QueryError::RateLimited;
    }

    match error.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => QueryError::Unknown(message.to_string()),
        _ => QueryError::Unknown(UNKNOWN_ERROR_MESSAGE.to_string()),
    }
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(GeminiClient {
            client,
            base_url: settings.base_url,
            model: settings.model,
            api_key: settings.api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Single-prompt generation with Google Search and Google Maps grounding.
    pub async fn generate_content(
        &self,
        prompt: &str,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        let request = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
            tools: [Tool::GoogleSearch {}, Tool::GoogleMaps {}],
        };

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = match res.text().await {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("Failed to read Gemini error body for {}: {:?}", status, e);
                    String::new()
                }
            };
            return Err(UpstreamError::from_response_body(status.as_u16(), body));
        }

        let response = res.json::<GenerateContentResponse>().await?;
        log::info!(
            "Gemini returned {} candidates",
            response.candidates.as_ref().map_or(0, |c| c.len())
        );

        Ok(response)
    }
}
