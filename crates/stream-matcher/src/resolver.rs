//! Turns a resolver's variant listing into a high/low quality stream pair.

use std::sync::LazyLock;
use std::time::Duration;

use models::{AudioStream, StreamSelection, StreamVariant, VariantKind, VariantListing};
use regex::Regex;

use crate::error::ResolutionError;
use crate::provider::StreamResolver;

static EXPIRY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexpire=(\d+)\b").expect("valid expiry regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityPair<'a> {
    /// Only set when a strictly lower-bitrate alternative exists for `low`.
    pub high: Option<&'a StreamVariant>,
    pub low: &'a StreamVariant,
}

/// Pick the high/low audio pair out of `variants`.
///
/// High is the best bitrate. Low is the best bitrate strictly below high and
/// at least `min_low_kbps`. Without such a low, the best variant becomes the
/// low slot and high stays empty. Returns `None` when no audio-only variant
/// exists.
pub fn select_quality_pair(
    variants: &[StreamVariant],
    min_low_kbps: u32,
) -> Option<QualityPair<'_>> {
    let audio = || variants.iter().filter(|v| v.kind == VariantKind::AudioOnly);

    let best = audio().reduce(|best, v| {
        if v.bitrate_kbps > best.bitrate_kbps {
            v
        } else {
            best
        }
    })?;

    let lower = audio()
        .filter(|v| v.bitrate_kbps < best.bitrate_kbps && v.bitrate_kbps >= min_low_kbps)
        .reduce(|low, v| {
            if v.bitrate_kbps > low.bitrate_kbps {
                v
            } else {
                low
            }
        });

    Some(match lower {
        Some(low) => QualityPair {
            high: Some(best),
            low,
        },
        None => QualityPair {
            high: None,
            low: best,
        },
    })
}

/// Expiry of a stream URL in epoch milliseconds, or 0 when the URL carries
/// no usable `expire=` token.
pub fn expiry_from_url(url: &str) -> i64 {
    EXPIRY_TOKEN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .and_then(|secs| secs.checked_mul(1000))
        .unwrap_or(0)
}

/// Build the selection for one resolved identifier.
///
/// An expiry of 0 is returned as-is; deciding it is unusable is the caller's
/// job.
pub fn build_selection(
    identifier: &str,
    listing: &VariantListing,
    min_low_kbps: u32,
    now_ms: i64,
) -> Result<StreamSelection, ResolutionError> {
    let pair = select_quality_pair(&listing.variants, min_low_kbps).ok_or_else(|| {
        ResolutionError::Unavailable {
            identifier: identifier.to_string(),
            reason: format!("no audio-only variants among {}", listing.variants.len()),
        }
    })?;

    let expiry_epoch_ms = expiry_from_url(&pair.low.access_url);
    let duration_ms = i64::try_from(listing.length_seconds)
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
        .unwrap_or(0);

    Ok(StreamSelection {
        id: Some(identifier.to_string()),
        high_quality: pair.high.map(AudioStream::from),
        low_quality: Some(AudioStream::from(pair.low)),
        duration_ms: Some(duration_ms),
        expiry_epoch_ms,
        lifespan_ms: Some(expiry_epoch_ms - now_ms),
    })
}

/// Fetch variants for `identifier` and build its selection. A call that
/// outlives `timeout` fails like any other resolution error.
pub async fn resolve(
    resolver: &dyn StreamResolver,
    identifier: &str,
    min_low_kbps: u32,
    timeout: Duration,
) -> Result<StreamSelection, ResolutionError> {
    let listing = tokio::time::timeout(timeout, resolver.get_variants(identifier))
        .await
        .map_err(|_| ResolutionError::Timeout {
            identifier: identifier.to_string(),
        })??;

    let now_ms = chrono::Utc::now().timestamp_millis();
    build_selection(identifier, &listing, min_low_kbps, now_ms)
}
