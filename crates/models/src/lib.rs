use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod config;

/// Song the caller wants a stream for. `duration_ms == 0` means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSong {
    pub title: String,
    #[serde(default)]
    pub album: Option<String>,
    pub artist: String,
    #[serde(default)]
    pub album_artist: Option<String>,
    #[serde(default, rename = "duration")]
    pub duration_ms: u64,
}

impl TargetSong {
    /// Album name, if present and non-blank.
    pub fn album(&self) -> Option<&str> {
        self.album
            .as_deref()
            .map(str::trim)
            .filter(|album| !album.is_empty())
    }
}

/// One search hit from the candidate search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub identifier: String,
    pub title: String,
    pub channel: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 0 when the provider did not report a length.
    #[serde(default)]
    pub duration_seconds: u64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub identifier: String,
    pub score: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Video,
}

impl SearchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
        }
    }
}

/// Which tracks an encoded variant carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariantKind {
    AudioOnly,
    Muxed,
    VideoOnly,
}

impl VariantKind {
    pub fn from_tracks(has_audio: bool, has_video: bool) -> Option<Self> {
        match (has_audio, has_video) {
            (true, false) => Some(Self::AudioOnly),
            (true, true) => Some(Self::Muxed),
            (false, true) => Some(Self::VideoOnly),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamVariant {
    pub access_url: String,
    pub encoding: String,
    pub bitrate_kbps: u32,
    pub kind: VariantKind,
}

/// Everything the stream resolver reports for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantListing {
    pub length_seconds: u64,
    pub variants: Vec<StreamVariant>,
}

/// Client-facing summary of a chosen variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStream {
    pub url: String,
    pub format: String,
    pub bitrate: u32,
}

impl From<&StreamVariant> for AudioStream {
    fn from(variant: &StreamVariant) -> Self {
        Self {
            url: variant.access_url.clone(),
            format: variant.encoding.clone(),
            bitrate: variant.bitrate_kbps,
        }
    }
}

/// Result of a stream lookup.
///
/// The empty selection (no identifier, no streams, zero expiry) is the only
/// "not found" signal; lookups never surface an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub high_quality: Option<AudioStream>,
    pub low_quality: Option<AudioStream>,
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(rename = "expiryDate")]
    pub expiry_epoch_ms: i64,
    #[serde(default, rename = "lifespan", skip_serializing_if = "Option::is_none")]
    pub lifespan_ms: Option<i64>,
}

impl StreamSelection {
    pub fn empty() -> Self {
        Self {
            id: None,
            high_quality: None,
            low_quality: None,
            duration_ms: None,
            expiry_epoch_ms: 0,
            lifespan_ms: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low_quality.is_none()
    }

    /// Non-empty with a known expiry.
    pub fn is_usable(&self) -> bool {
        !self.is_empty() && self.expiry_epoch_ms != 0
    }
}
