//! Free-text filtering of candidates.

use super::model::Candidate;

/// Returns the candidates whose searchable text contains `query`.
///
/// Matching is case-insensitive over display name, username, first and last
/// name, category label, the space-joined skill labels and the bio. A query
/// that is empty after trimming returns every candidate. Input order is kept.
pub fn filter_candidates(candidates: &[Candidate], query: &str) -> Vec<Candidate> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return candidates.to_vec();
    }

    candidates
        .iter()
        .filter(|candidate| matches_query(candidate, &needle))
        .cloned()
        .collect()
}

/// Trimmed, lowercased form of a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether any searchable field of `candidate` contains `needle`.
///
/// `needle` must already be normalized with [`normalize_query`].
pub fn matches_query(candidate: &Candidate, needle: &str) -> bool {
    let skills = candidate.skills_text();
    let fields = [
        candidate.display_name.as_str(),
        candidate.username.as_str(),
        candidate.first_name.as_str(),
        candidate.last_name.as_str(),
        candidate.category_label(),
        skills.as_str(),
        candidate.bio.as_str(),
    ];

    fields
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serviceman::model::CategoryRef;

    fn candidate(id: u64, name: &str) -> Candidate {
        Candidate {
            id,
            display_name: name.to_string(),
            ..Default::default()
        }
    }

    fn pool() -> Vec<Candidate> {
        vec![
            Candidate {
                username: "pipeking".to_string(),
                category: Some(CategoryRef {
                    id: Some(1),
                    name: "Plumbing".to_string(),
                }),
                ..candidate(1, "Mario Rossi")
            },
            Candidate {
                skills: vec!["Wiring".to_string(), "Solar Panels".to_string()],
                ..candidate(2, "Nikola T")
            },
            Candidate {
                bio: "Twenty years fixing roofs and gutters.".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Builder".to_string(),
                ..candidate(3, "Bob Builder")
            },
        ]
    }

    fn ids(candidates: &[Candidate]) -> Vec<u64> {
        candidates.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let pool = pool();
        assert_eq!(filter_candidates(&pool, ""), pool);
        assert_eq!(filter_candidates(&pool, "   \t"), pool);
    }

    #[test]
    fn test_matches_each_searchable_field() {
        let pool = pool();
        assert_eq!(ids(&filter_candidates(&pool, "rossi")), vec![1]);
        assert_eq!(ids(&filter_candidates(&pool, "PIPEKING")), vec![1]);
        assert_eq!(ids(&filter_candidates(&pool, "plumb")), vec![1]);
        assert_eq!(ids(&filter_candidates(&pool, "solar")), vec![2]);
        assert_eq!(ids(&filter_candidates(&pool, "gutters")), vec![3]);
        assert_eq!(ids(&filter_candidates(&pool, "builder")), vec![3]);
    }

    #[test]
    fn test_skill_labels_are_matched_across_the_join() {
        let pool = pool();
        assert_eq!(ids(&filter_candidates(&pool, "wiring solar")), vec![2]);
    }

    #[test]
    fn test_query_is_trimmed() {
        let pool = pool();
        assert_eq!(ids(&filter_candidates(&pool, "  mario  ")), vec![1]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(filter_candidates(&pool(), "carpentry").is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let pool = vec![candidate(9, "Ann"), candidate(4, "Anna"), candidate(7, "Joanne")];
        assert_eq!(ids(&filter_candidates(&pool, "ann")), vec![9, 4, 7]);
    }

    #[test]
    fn test_every_result_matches_and_no_match_is_dropped() {
        let pool = pool();
        for query in ["o", "b", "ing", "x", "t"] {
            let needle = normalize_query(query);
            let result = filter_candidates(&pool, query);

            assert!(result.iter().all(|c| matches_query(c, &needle)));
            let expected = pool.iter().filter(|c| matches_query(c, &needle)).count();
            assert_eq!(result.len(), expected);
        }
    }
}
