use std::str::FromStr;
use std::time::Duration;

use eyre::WrapErr;

/// Tuning knobs for scoring and selection.
///
/// The defaults are empirically tuned and have no derivation beyond "works
/// on real search results"; keep them unless there is data saying otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Candidates whose title similarity falls below this are dropped outright.
    pub min_title_similarity: u8,
    /// Final score needed for a candidate to be ranked at all.
    pub min_accept_score: f64,
    /// Similarity at which artist/album text counts as corroborating.
    pub corroboration_similarity: u8,
    pub max_duration_gap_ms: u64,
    pub duration_penalty_divisor: f64,
    pub unknown_duration_penalty: f64,
    pub artist_channel_bonus: f64,
    pub artist_missing_penalty: f64,
    pub album_bonus: f64,
    /// Album corroboration only runs while the score is still below this.
    pub album_check_below: f64,
    pub min_low_quality_kbps: u32,
    /// How many ranked candidates are probed per attempt.
    pub fallback_depth: usize,
    pub max_attempts: usize,
    pub search_limit: usize,
    /// Albums longer than this are left out of the search query.
    pub max_album_query_len: usize,
    pub call_timeout: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_title_similarity: 75,
            min_accept_score: 80.0,
            corroboration_similarity: 85,
            max_duration_gap_ms: 90_000,
            duration_penalty_divisor: 2000.0,
            unknown_duration_penalty: 5.0,
            artist_channel_bonus: 2.0,
            artist_missing_penalty: 5.0,
            album_bonus: 5.0,
            album_check_below: 85.0,
            min_low_quality_kbps: 100,
            fallback_depth: 3,
            max_attempts: 3,
            search_limit: 6,
            max_album_query_len: 40,
            call_timeout: Duration::from_secs(15),
        }
    }
}

impl MatchConfig {
    /// Defaults, overridden by any `MATCH_*` variables that are set.
    pub fn from_env() -> eyre::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            min_title_similarity: env_or(
                "MATCH_MIN_TITLE_SIMILARITY",
                defaults.min_title_similarity,
            )?,
            min_accept_score: env_or("MATCH_MIN_ACCEPT_SCORE", defaults.min_accept_score)?,
            corroboration_similarity: env_or(
                "MATCH_CORROBORATION_SIMILARITY",
                defaults.corroboration_similarity,
            )?,
            max_duration_gap_ms: env_or("MATCH_MAX_DURATION_GAP_MS", defaults.max_duration_gap_ms)?,
            duration_penalty_divisor: env_or(
                "MATCH_DURATION_PENALTY_DIVISOR",
                defaults.duration_penalty_divisor,
            )?,
            unknown_duration_penalty: env_or(
                "MATCH_UNKNOWN_DURATION_PENALTY",
                defaults.unknown_duration_penalty,
            )?,
            artist_channel_bonus: env_or(
                "MATCH_ARTIST_CHANNEL_BONUS",
                defaults.artist_channel_bonus,
            )?,
            artist_missing_penalty: env_or(
                "MATCH_ARTIST_MISSING_PENALTY",
                defaults.artist_missing_penalty,
            )?,
            album_bonus: env_or("MATCH_ALBUM_BONUS", defaults.album_bonus)?,
            album_check_below: env_or("MATCH_ALBUM_CHECK_BELOW", defaults.album_check_below)?,
            min_low_quality_kbps: env_or(
                "MATCH_MIN_LOW_QUALITY_KBPS",
                defaults.min_low_quality_kbps,
            )?,
            fallback_depth: env_or("MATCH_FALLBACK_DEPTH", defaults.fallback_depth)?,
            max_attempts: env_or("MATCH_MAX_ATTEMPTS", defaults.max_attempts)?,
            search_limit: env_or("MATCH_SEARCH_LIMIT", defaults.search_limit)?,
            max_album_query_len: env_or("MATCH_MAX_ALBUM_QUERY_LEN", defaults.max_album_query_len)?,
            call_timeout: Duration::from_secs(env_or(
                "MATCH_CALL_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )?),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .wrap_err_with(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
