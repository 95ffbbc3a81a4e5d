use std::cmp::Ordering;

use models::ScoredCandidate;

/// Identifiers ordered best-first. Equal scores keep their input order.
pub fn rank(mut candidates: Vec<ScoredCandidate>) -> Vec<String> {
    // sort_by is stable
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.into_iter().map(|c| c.identifier).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(identifier: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            identifier: identifier.to_string(),
            score,
        }
    }

    #[test]
    fn orders_by_score_descending_and_keeps_ties_stable() {
        let ranked = rank(vec![scored("A", 80.0), scored("B", 95.0), scored("C", 80.0)]);
        assert_eq!(ranked, vec!["B", "A", "C"]);
    }

    #[test]
    fn fractional_scores_rank_correctly() {
        let ranked = rank(vec![
            scored("A", 81.5),
            scored("B", 81.25),
            scored("C", 101.0),
        ]);
        assert_eq!(ranked, vec!["C", "A", "B"]);
    }

    #[test]
    fn empty_input_yields_empty_ranking() {
        assert!(rank(Vec::new()).is_empty());
    }
}
