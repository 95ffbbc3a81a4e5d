//! Candidate scoring.
//!
//! Scoring is an ordered list of stages. Each stage sees the running score
//! and either returns an adjusted score or rejects the candidate; the first
//! rejection ends the pipeline.

use std::sync::LazyLock;

use models::{Candidate, ScoredCandidate, TargetSong};
use regex::Regex;

use crate::config::MatchConfig;
use crate::fuzzy::partial_ratio;

static UNOFFICIAL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(live|remix|mix|cover|unofficial|instrumental|sessions)\b")
        .expect("valid marker regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TitleMismatch { similarity: u8 },
    UnofficialMarker { term: String },
    DurationMismatch { gap_ms: u64 },
    BelowAcceptance,
}

struct ScoreContext<'a> {
    song: &'a TargetSong,
    candidate: &'a Candidate,
    config: &'a MatchConfig,
    description: String,
}

type Stage = fn(&ScoreContext<'_>, f64) -> Result<f64, Rejection>;

const STAGES: [(&str, Stage); 6] = [
    ("title", title_similarity),
    ("markers", unofficial_markers),
    ("duration", duration_gap),
    ("artist", artist_confirmation),
    ("album", album_corroboration),
    ("accept", acceptance),
];

/// Score one candidate against the target song.
pub fn score(
    song: &TargetSong,
    candidate: &Candidate,
    config: &MatchConfig,
) -> Result<ScoredCandidate, Rejection> {
    let ctx = ScoreContext {
        song,
        candidate,
        config,
        description: candidate
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase(),
    };

    let mut running = 0.0;
    for (name, stage) in STAGES {
        running = stage(&ctx, running).inspect_err(|rejection| {
            tracing::debug!(
                "rejected {} at {} stage: {:?}",
                candidate.identifier,
                name,
                rejection
            );
        })?;
    }

    Ok(ScoredCandidate {
        identifier: candidate.identifier.clone(),
        score: running,
    })
}

/// Score every candidate, keeping survivors in input order.
pub fn score_all(
    song: &TargetSong,
    candidates: &[Candidate],
    config: &MatchConfig,
) -> Vec<ScoredCandidate> {
    candidates
        .iter()
        .filter_map(|candidate| score(song, candidate, config).ok())
        .collect()
}

fn title_similarity(ctx: &ScoreContext<'_>, _running: f64) -> Result<f64, Rejection> {
    let similarity = partial_ratio(&ctx.candidate.title, &ctx.song.title);
    if similarity < ctx.config.min_title_similarity {
        return Err(Rejection::TitleMismatch { similarity });
    }
    Ok(f64::from(similarity))
}

// Only the first marker in the candidate title is checked.
fn unofficial_markers(ctx: &ScoreContext<'_>, running: f64) -> Result<f64, Rejection> {
    let Some(found) = UNOFFICIAL_MARKER.find(&ctx.candidate.title) else {
        return Ok(running);
    };
    let term = found.as_str().to_lowercase();

    let in_target = UNOFFICIAL_MARKER
        .find_iter(&ctx.song.title)
        .any(|m| m.as_str().eq_ignore_ascii_case(&term));
    if in_target {
        Ok(running)
    } else {
        Err(Rejection::UnofficialMarker { term })
    }
}

fn duration_gap(ctx: &ScoreContext<'_>, running: f64) -> Result<f64, Rejection> {
    let song_ms = ctx.song.duration_ms;
    if song_ms == 0 {
        return Ok(running);
    }

    let candidate_ms = ctx.candidate.duration_seconds.saturating_mul(1000);
    if candidate_ms == 0 {
        return Ok(running - ctx.config.unknown_duration_penalty);
    }

    let gap_ms = song_ms.abs_diff(candidate_ms);
    if gap_ms > ctx.config.max_duration_gap_ms {
        return Err(Rejection::DurationMismatch { gap_ms });
    }
    Ok(running - gap_ms as f64 / ctx.config.duration_penalty_divisor)
}

fn artist_confirmation(ctx: &ScoreContext<'_>, running: f64) -> Result<f64, Rejection> {
    let threshold = ctx.config.corroboration_similarity;
    let artist = &ctx.song.artist;

    // Channel named after the artist: likely an official upload.
    if partial_ratio(artist, &ctx.candidate.channel) >= threshold {
        return Ok(running + ctx.config.artist_channel_bonus);
    }

    if partial_ratio(artist, &ctx.candidate.title) < threshold
        && !ctx.description.contains(&artist.to_lowercase())
    {
        return Ok(running - ctx.config.artist_missing_penalty);
    }
    Ok(running)
}

fn album_corroboration(ctx: &ScoreContext<'_>, running: f64) -> Result<f64, Rejection> {
    let Some(album) = ctx.song.album() else {
        return Ok(running);
    };
    if running >= ctx.config.album_check_below {
        return Ok(running);
    }

    if partial_ratio(album, &ctx.candidate.title) >= ctx.config.corroboration_similarity
        || ctx.description.contains(&album.to_lowercase())
    {
        return Ok(running + ctx.config.album_bonus);
    }
    Ok(running)
}

fn acceptance(ctx: &ScoreContext<'_>, running: f64) -> Result<f64, Rejection> {
    if running < ctx.config.min_accept_score {
        return Err(Rejection::BelowAcceptance);
    }
    Ok(running)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, artist: &str, duration_ms: u64) -> TargetSong {
        TargetSong {
            title: title.to_string(),
            album: None,
            artist: artist.to_string(),
            album_artist: None,
            duration_ms,
        }
    }

    fn candidate(title: &str, channel: &str, duration_seconds: u64) -> Candidate {
        Candidate {
            identifier: "vid".to_string(),
            title: title.to_string(),
            channel: channel.to_string(),
            description: None,
            duration_seconds,
            link: "https://youtube.com/watch?v=vid".to_string(),
        }
    }

    fn run_stage(
        stage: Stage,
        song: &TargetSong,
        cand: &Candidate,
        running: f64,
    ) -> Result<f64, Rejection> {
        let config = MatchConfig::default();
        let ctx = ScoreContext {
            song,
            candidate: cand,
            config: &config,
            description: cand
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase(),
        };
        stage(&ctx, running)
    }

    #[test]
    fn rejects_low_title_similarity_regardless_of_other_fields() {
        let target = song("Bohemian Rhapsody", "Queen", 354_000);
        let mut cand = candidate("Never Gonna Give You Up", "Queen Official", 354);
        cand.description = Some("Queen - Bohemian Rhapsody".to_string());

        let result = score(&target, &cand, &MatchConfig::default());
        assert!(matches!(result, Err(Rejection::TitleMismatch { .. })));
    }

    #[test]
    fn accepts_official_upload() {
        let target = song("Bohemian Rhapsody", "Queen", 354_000);
        let cand = candidate(
            "Queen – Bohemian Rhapsody (Official Video Remastered)",
            "Queen Official",
            359,
        );

        let scored = score(&target, &cand, &MatchConfig::default()).unwrap();
        assert_eq!(scored.identifier, "vid");
        // 100 - 5000/2000 + 2
        assert!((scored.score - 99.5).abs() < 1e-9, "score was {}", scored.score);
    }

    #[test]
    fn live_marker_rejected_unless_in_target_title() {
        let config = MatchConfig::default();
        let cand = candidate("Bohemian Rhapsody (Live at Wembley)", "Queen Official", 0);

        let studio = song("Bohemian Rhapsody", "Queen", 0);
        assert_eq!(
            score(&studio, &cand, &config),
            Err(Rejection::UnofficialMarker {
                term: "live".to_string()
            })
        );

        let live = song("Bohemian Rhapsody - live", "Queen", 0);
        assert!(score(&live, &cand, &config).is_ok());
    }

    #[test]
    fn markers_only_match_whole_words() {
        let target = song("Bohemian Rhapsody", "Queen", 0);
        let cand = candidate("Bohemian Rhapsody (Remixed Mixtape Edition)", "Queen", 0);
        assert_eq!(run_stage(unofficial_markers, &target, &cand, 90.0), Ok(90.0));

        let cand = candidate("Bohemian Rhapsody [REMIX]", "Queen", 0);
        assert!(run_stage(unofficial_markers, &target, &cand, 90.0).is_err());
    }

    #[test]
    fn only_first_marker_is_checked_against_target_title() {
        let target = song("Creep (Live)", "Radiohead", 0);
        let cand = candidate("Radiohead - Creep (Live) Acoustic Sessions", "Radiohead", 0);
        assert_eq!(run_stage(unofficial_markers, &target, &cand, 90.0), Ok(90.0));
        assert!(score(&target, &cand, &MatchConfig::default()).is_ok());

        let cand = candidate("Radiohead - Creep Cover (Live)", "Someone", 0);
        assert_eq!(
            run_stage(unofficial_markers, &target, &cand, 90.0),
            Err(Rejection::UnofficialMarker {
                term: "cover".to_string()
            })
        );
    }

    #[test]
    fn equal_durations_cost_nothing() {
        let target = song("Song", "Artist", 200_000);
        let cand = candidate("Song", "Artist", 200);
        assert_eq!(run_stage(duration_gap, &target, &cand, 100.0), Ok(100.0));
    }

    #[test]
    fn large_duration_gap_rejects() {
        let target = song("Song", "Artist", 200_000);
        let cand = candidate("Song", "Artist", 400);
        assert_eq!(
            run_stage(duration_gap, &target, &cand, 100.0),
            Err(Rejection::DurationMismatch { gap_ms: 200_000 })
        );
    }

    #[test]
    fn duration_penalty_scales_with_gap() {
        let target = song("Song", "Artist", 200_000);
        assert_eq!(
            run_stage(duration_gap, &target, &candidate("Song", "Artist", 230), 100.0),
            Ok(85.0)
        );
        assert_eq!(
            run_stage(duration_gap, &target, &candidate("Song", "Artist", 290), 100.0),
            Ok(55.0)
        );
        assert!(
            run_stage(duration_gap, &target, &candidate("Song", "Artist", 291), 100.0).is_err()
        );
    }

    #[test]
    fn unknown_durations() {
        let target = song("Song", "Artist", 200_000);
        assert_eq!(
            run_stage(duration_gap, &target, &candidate("Song", "Artist", 0), 100.0),
            Ok(95.0)
        );

        let unknown_target = song("Song", "Artist", 0);
        assert_eq!(
            run_stage(duration_gap, &unknown_target, &candidate("Song", "Artist", 999), 100.0),
            Ok(100.0)
        );
    }

    #[test]
    fn artist_channel_match_adds_bonus() {
        let target = song("Song", "Radiohead", 0);
        let cand = candidate("Song", "RadioheadVEVO", 0);
        assert_eq!(run_stage(artist_confirmation, &target, &cand, 90.0), Ok(92.0));
    }

    #[test]
    fn artist_in_title_or_description_avoids_penalty() {
        let target = song("Creep", "Radiohead", 0);

        let in_title = candidate("Radiohead - Creep", "Music Uploads", 0);
        assert_eq!(run_stage(artist_confirmation, &target, &in_title, 90.0), Ok(90.0));

        let mut in_description = candidate("Creep", "Music Uploads", 0);
        in_description.description = Some("Provided to YouTube by XL. Creep · RADIOHEAD".to_string());
        assert_eq!(
            run_stage(artist_confirmation, &target, &in_description, 90.0),
            Ok(90.0)
        );

        let missing = candidate("Creep", "Music Uploads", 0);
        assert_eq!(run_stage(artist_confirmation, &target, &missing, 90.0), Ok(85.0));
    }

    #[test]
    fn album_corroboration_only_below_threshold() {
        let mut target = song("Airbag", "Radiohead", 0);
        target.album = Some("OK Computer".to_string());
        let cand = candidate("Airbag (OK Computer)", "Uploads", 0);

        assert_eq!(run_stage(album_corroboration, &target, &cand, 80.0), Ok(85.0));
        assert_eq!(run_stage(album_corroboration, &target, &cand, 85.0), Ok(85.0));

        let mut described = candidate("Airbag", "Uploads", 0);
        described.description = Some("from the album ok computer".to_string());
        assert_eq!(run_stage(album_corroboration, &target, &described, 80.0), Ok(85.0));

        let plain = candidate("Airbag", "Uploads", 0);
        assert_eq!(run_stage(album_corroboration, &target, &plain, 80.0), Ok(80.0));
    }

    #[test]
    fn album_bonus_can_lift_candidate_over_acceptance() {
        let mut target = song("Airbag", "Radiohead", 0);
        let mut cand = candidate("Airbag", "Uploads", 0);
        cand.description = Some("OK Computer deluxe".to_string());

        // 100 - 16 (unknown duration) - 5 (artist missing) = 79
        target.duration_ms = 280_000;
        let config = MatchConfig {
            unknown_duration_penalty: 16.0,
            ..MatchConfig::default()
        };
        assert_eq!(
            score(&target, &cand, &config),
            Err(Rejection::BelowAcceptance)
        );

        target.album = Some("OK Computer".to_string());
        let scored = score(&target, &cand, &config).unwrap();
        assert_eq!(scored.score, 84.0);
    }

    #[test]
    fn score_all_keeps_input_order_of_survivors() {
        let target = song("Creep", "Radiohead", 0);
        let mut first = candidate("Radiohead - Creep", "Radiohead", 0);
        first.identifier = "a".to_string();
        let mut rejected = candidate("Karma Police", "Radiohead", 0);
        rejected.identifier = "b".to_string();
        let mut second = candidate("Creep (Radiohead)", "Uploads", 0);
        second.identifier = "c".to_string();

        let scored = score_all(&target, &[first, rejected, second], &MatchConfig::default());
        let ids = scored.iter().map(|s| s.identifier.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
