//! Partial fuzzy text similarity.
//!
//! The shorter string is slid across the longer one and the best windowed
//! ratio wins, so a short exact phrase buried in a noisy title still scores
//! close to 100.

use strsim::normalized_levenshtein;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Lowercase, strip punctuation and collapse whitespace before comparing.
    pub full_process: bool,
    /// Drop non-ASCII characters during processing.
    pub force_ascii: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            full_process: true,
            force_ascii: false,
        }
    }
}

pub fn normalize(text: &str, force_ascii: bool) -> String {
    let cleaned = text
        .chars()
        .filter(|c| !force_ascii || c.is_ascii())
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Best windowed similarity between `a` and `b`, 0..=100.
pub fn similarity(a: &str, b: &str, options: MatchOptions) -> u8 {
    let (a, b) = if options.full_process {
        (
            normalize(a, options.force_ascii),
            normalize(b, options.force_ascii),
        )
    } else {
        (a.to_string(), b.to_string())
    };

    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let short_str = short.iter().collect::<String>();

    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        let window_str = window.iter().collect::<String>();
        let ratio = normalized_levenshtein(&short_str, &window_str);
        if ratio > best {
            best = ratio;
            if best >= 1.0 {
                break;
            }
        }
    }

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

/// [`similarity`] with default options.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    similarity(a, b, MatchOptions::default())
}
