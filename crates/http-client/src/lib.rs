use std::sync::Arc;

use async_trait::async_trait;
use eyre::WrapErr;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use models::config::ProviderConfig;
use models::{Candidate, SearchKind, StreamVariant, VariantKind, VariantListing};
use stream_matcher::{CandidateSearch, ResolutionError, SearchError, StreamResolver};

const WATCH_URL_PREFIX: &str = "https://youtube.com/watch?v=";

/// Search result as returned by the catalog gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultDto {
    pub title: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Seconds; missing or null for live streams and some shorts.
    #[serde(default)]
    pub duration: Option<u64>,
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfoDto {
    #[serde(default)]
    pub length_seconds: u64,
    #[serde(default)]
    pub formats: Vec<FormatDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatDto {
    pub url: String,
    #[serde(default)]
    pub audio_encoding: Option<String>,
    #[serde(default)]
    pub audio_bitrate: Option<u32>,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub has_video: bool,
}

impl SearchResultDto {
    /// `None` when no identifier can be pulled out of the link.
    pub fn into_candidate(self) -> Option<Candidate> {
        let identifier = extract_video_id(&self.link)?;
        Some(Candidate {
            identifier,
            title: self.title,
            channel: self.channel,
            description: self.description.filter(|d| !d.is_empty()),
            duration_seconds: self.duration.unwrap_or(0),
            link: self.link,
        })
    }
}

impl From<VideoInfoDto> for VariantListing {
    fn from(info: VideoInfoDto) -> Self {
        let variants = info
            .formats
            .into_iter()
            .filter_map(|format| {
                let kind = VariantKind::from_tracks(format.has_audio, format.has_video)?;
                let bitrate_kbps = format.audio_bitrate.filter(|kbps| *kbps > 0)?;
                Some(StreamVariant {
                    access_url: format.url,
                    encoding: format.audio_encoding.unwrap_or_default(),
                    bitrate_kbps,
                    kind,
                })
            })
            .collect();

        Self {
            length_seconds: info.length_seconds,
            variants,
        }
    }
}

/// Pull the video identifier out of a search result link.
pub fn extract_video_id(link: &str) -> Option<String> {
    let link = link.trim();
    if let Some(rest) = link.strip_prefix(WATCH_URL_PREFIX) {
        let id = rest.split(['&', '#']).next().unwrap_or_default();
        return (!id.is_empty()).then(|| id.to_string());
    }

    let url = Url::parse(link).ok()?;
    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
        return (!id.is_empty()).then(|| id.into_owned());
    }
    if url.domain() == Some("youtu.be") {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }
    None
}

/// HTTP client for the catalog gateway; serves as both the candidate search
/// and the stream resolver.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    config: ProviderConfig,
    client: Arc<reqwest::Client>,
}

impl CatalogClient {
    pub fn new(config: &ProviderConfig) -> eyre::Result<Self> {
        let client = Arc::new(
            reqwest::Client::builder()
                .default_headers(default_headers()?)
                .user_agent(&config.user_agent)
                .timeout(config.request_timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .wrap_err("build reqwest client")?,
        );

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    pub async fn search_videos(
        &self,
        query: &str,
        limit: usize,
        kind: SearchKind,
    ) -> Result<Vec<Candidate>, SearchError> {
        let url = format!("{}/search", self.config.search_url);
        let limit = limit.to_string();
        let resp = self
            .client
            .get(url)
            .query(&[("q", query), ("limit", limit.as_str()), ("type", kind.as_str())])
            .send()
            .await
            .map_err(search_error)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            return Err(SearchError::Transport(format!(
                "search gateway error: HTTP {}",
                resp.status()
            )));
        }

        let results = resp
            .json::<Vec<SearchResultDto>>()
            .await
            .map_err(|e| SearchError::Malformed(format!("search parse failed: {e}")))?;
        let total = results.len();
        let candidates = results
            .into_iter()
            .filter_map(SearchResultDto::into_candidate)
            .collect::<Vec<_>>();
        if candidates.len() < total {
            tracing::debug!(
                "dropped {} search results without a video id",
                total - candidates.len()
            );
        }
        Ok(candidates)
    }

    pub async fn video_formats(&self, identifier: &str) -> Result<VariantListing, ResolutionError> {
        let url = format!(
            "{}/videos/{}/formats",
            self.config.resolver_url,
            urlencoding::encode(identifier)
        );

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ResolutionError::Timeout {
                    identifier: identifier.to_string(),
                }
            } else {
                ResolutionError::Transport(format!("formats request failed: {e}"))
            }
        })?;

        let status = resp.status();
        if matches!(
            status,
            StatusCode::NOT_FOUND | StatusCode::GONE | StatusCode::FORBIDDEN
        ) {
            return Err(ResolutionError::Unavailable {
                identifier: identifier.to_string(),
                reason: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(ResolutionError::Transport(format!(
                "formats gateway error: HTTP {status}"
            )));
        }

        let info = resp
            .json::<VideoInfoDto>()
            .await
            .map_err(|e| ResolutionError::Malformed(format!("formats parse failed: {e}")))?;
        Ok(info.into())
    }
}

#[async_trait]
impl CandidateSearch for CatalogClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        kind: SearchKind,
    ) -> Result<Vec<Candidate>, SearchError> {
        self.search_videos(query, limit, kind).await
    }
}

#[async_trait]
impl StreamResolver for CatalogClient {
    async fn get_variants(&self, identifier: &str) -> Result<VariantListing, ResolutionError> {
        self.video_formats(identifier).await
    }
}

fn search_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Transport(format!("search request failed: {e}"))
    }
}

fn default_headers() -> eyre::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    Ok(headers)
}
