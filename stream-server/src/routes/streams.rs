use axum::{
    extract::{Query, State},
    Json,
};
use models::{StreamSelection, TargetSong};
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/stream`: always answers 200 with a selection, possibly the
/// empty one. Only malformed query parameters are errors.
pub async fn find_stream(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<StreamSelection>> {
    let song = parse_target_song(&params)?;
    let selection = state.selector.select_stream(&song).await;
    Ok(Json(selection))
}

fn parse_target_song(params: &HashMap<String, String>) -> Result<TargetSong> {
    let title = required_param(params, "title")?;
    let artist = required_param(params, "artist")?;
    let album = optional_param(params, "album");
    let album_artist = optional_param(params, "albumArtist").or_else(|| Some(artist.clone()));
    let duration_ms = match optional_param(params, "duration") {
        Some(value) => value.parse::<u64>().map_err(|_| {
            AppError::BadRequest("duration must be a non-negative integer".to_string())
        })?,
        None => 0,
    };

    Ok(TargetSong {
        title,
        album,
        artist,
        album_artist,
        duration_ms,
    })
}

fn required_param(params: &HashMap<String, String>, key: &str) -> Result<String> {
    optional_param(params, key)
        .ok_or_else(|| AppError::BadRequest(format!("missing query param: {}", key)))
}

fn optional_param(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_full_query() {
        let song = parse_target_song(&params(&[
            ("title", "Airbag"),
            ("artist", "Radiohead"),
            ("album", "OK Computer"),
            ("albumArtist", "Radiohead"),
            ("duration", "284000"),
        ]))
        .unwrap();
        assert_eq!(song.title, "Airbag");
        assert_eq!(song.album.as_deref(), Some("OK Computer"));
        assert_eq!(song.duration_ms, 284_000);
    }

    #[test]
    fn defaults_album_artist_and_duration() {
        let song =
            parse_target_song(&params(&[("title", "Airbag"), ("artist", "Radiohead")])).unwrap();
        assert_eq!(song.album, None);
        assert_eq!(song.album_artist.as_deref(), Some("Radiohead"));
        assert_eq!(song.duration_ms, 0);
    }

    #[test]
    fn rejects_missing_or_bad_params() {
        assert!(matches!(
            parse_target_song(&params(&[("artist", "Radiohead")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_target_song(&params(&[("title", "  "), ("artist", "Radiohead")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_target_song(&params(&[
                ("title", "Airbag"),
                ("artist", "Radiohead"),
                ("duration", "-5")
            ])),
            Err(AppError::BadRequest(_))
        ));
    }
}
