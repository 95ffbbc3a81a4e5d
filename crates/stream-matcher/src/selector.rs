//! Search, score, rank, then probe the best few candidates for a stream.
//!
//! Two nested loops: an outer bounded retry over whole attempts and an inner
//! fallback chain over the top-ranked candidates. The first resolution with
//! a known expiry ends both. Nothing in here returns an error; exhausting
//! every attempt yields [`StreamSelection::empty`].

use std::sync::Arc;

use models::{Candidate, SearchKind, StreamSelection, TargetSong};

use crate::config::MatchConfig;
use crate::error::SearchError;
use crate::provider::{CandidateSearch, StreamResolver};
use crate::{ranker, resolver, scorer};

/// Search text for a song: title and artist, plus the album when it is short
/// and not just the artist's name again.
pub fn build_query(song: &TargetSong, max_album_len: usize) -> String {
    let mut query = format!("{} {}", song.title, song.artist);
    if let Some(album) = song.album() {
        if album != song.artist && album.chars().count() <= max_album_len {
            query.push(' ');
            query.push_str(album);
        }
    }
    query
}

#[derive(Clone)]
pub struct StreamSelector {
    search: Arc<dyn CandidateSearch>,
    resolver: Arc<dyn StreamResolver>,
    config: MatchConfig,
}

impl StreamSelector {
    pub fn new(
        search: Arc<dyn CandidateSearch>,
        resolver: Arc<dyn StreamResolver>,
        config: MatchConfig,
    ) -> Self {
        Self {
            search,
            resolver,
            config,
        }
    }

    pub async fn select_stream(&self, song: &TargetSong) -> StreamSelection {
        let query = build_query(song, self.config.max_album_query_len);

        for attempt in 1..=self.config.max_attempts {
            if let Some(selection) = self.attempt(song, &query, attempt).await {
                return selection;
            }
        }

        tracing::warn!(
            "no usable stream for {:?} after {} attempts",
            query,
            self.config.max_attempts
        );
        StreamSelection::empty()
    }

    /// Ranked identifiers for one fresh search.
    pub async fn ranked_candidates(&self, song: &TargetSong, query: &str) -> Vec<String> {
        let candidates = match self.search_candidates(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("candidate search for {:?} failed: {}", query, e);
                return Vec::new();
            }
        };

        let scored = scorer::score_all(song, &candidates, &self.config);
        tracing::debug!(
            "{} of {} candidates survived scoring for {:?}",
            scored.len(),
            candidates.len(),
            query
        );
        ranker::rank(scored)
    }

    async fn attempt(
        &self,
        song: &TargetSong,
        query: &str,
        attempt: usize,
    ) -> Option<StreamSelection> {
        let ranked = self.ranked_candidates(song, query).await;
        if ranked.is_empty() {
            tracing::debug!("attempt {}: no candidates for {:?}", attempt, query);
            return None;
        }

        for identifier in ranked.iter().take(self.config.fallback_depth) {
            match resolver::resolve(
                self.resolver.as_ref(),
                identifier,
                self.config.min_low_quality_kbps,
                self.config.call_timeout,
            )
            .await
            {
                Ok(selection) if selection.is_usable() => {
                    tracing::info!(
                        "attempt {}: selected {} for {:?}",
                        attempt,
                        identifier,
                        query
                    );
                    return Some(selection);
                }
                Ok(_) => {
                    tracing::warn!("attempt {}: {} has no usable expiry", attempt, identifier);
                }
                Err(e) => {
                    tracing::warn!("attempt {}: {}", attempt, e);
                }
            }
        }

        None
    }

    async fn search_candidates(&self, query: &str) -> Result<Vec<Candidate>, SearchError> {
        tokio::time::timeout(
            self.config.call_timeout,
            self.search
                .search(query, self.config.search_limit, SearchKind::Video),
        )
        .await
        .map_err(|_| SearchError::Timeout)?
    }
}
