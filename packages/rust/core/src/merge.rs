//! Multi-field match merging.
//!
//! The orchestrator searches the index once per target field; this module
//! folds the per-field [`MatchMap`]s into one ranked map.

use cnsearch_shared::MatchMap;

/// Merge match maps in sequence order.
///
/// The first map introducing a key fixes its non-score fields; later maps'
/// duplicate keys only raise the score to the maximum observed. Merging
/// zero maps yields an empty map.
pub fn merge_matches<I>(maps: I) -> MatchMap
where
    I: IntoIterator<Item = MatchMap>,
{
    let mut merged = MatchMap::new();

    for map in maps {
        for (key, incoming) in map {
            match merged.get_mut(&key) {
                Some(existing) => {
                    existing.score = existing.score.max(incoming.score);
                }
                None => {
                    merged.insert(key, incoming);
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnsearch_shared::Match;

    fn entry(score: f64, company_name: &str) -> Match {
        Match {
            score,
            company_name: company_name.into(),
            company_url: String::new(),
            normalized_name: company_name.to_lowercase(),
            query_string: String::new(),
        }
    }

    fn map_of(entries: &[(&str, f64, &str)]) -> MatchMap {
        entries
            .iter()
            .map(|(key, score, name)| (key.to_string(), entry(*score, name)))
            .collect()
    }

    #[test]
    fn zero_maps_yield_empty_map() {
        assert!(merge_matches(Vec::new()).is_empty());
    }

    #[test]
    fn single_map_is_identity() {
        let m = map_of(&[("acme", 3.0, "Acme"), ("globex", 1.5, "Globex")]);
        assert_eq!(merge_matches([m.clone()]), m);
    }

    #[test]
    fn duplicate_key_takes_max_score() {
        let a = map_of(&[("acme", 12.3, "Acme")]);
        let b = map_of(&[("acme", 8.1, "Acme")]);

        let merged = merge_matches([a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["acme"].score, 12.3);

        // max is taken even when the later map scores higher
        let a = map_of(&[("acme", 8.1, "Acme")]);
        let b = map_of(&[("acme", 12.3, "Acme")]);
        assert_eq!(merge_matches([a, b])["acme"].score, 12.3);
    }

    #[test]
    fn first_map_fixes_non_score_fields() {
        let a = map_of(&[("acme", 2.0, "Acme Corp")]);
        let b = map_of(&[("acme", 9.0, "Acme Corporation Ltd")]);

        let merged = merge_matches([a, b]);
        assert_eq!(merged["acme"].company_name, "Acme Corp");
        assert_eq!(merged["acme"].score, 9.0);
    }

    #[test]
    fn scores_commute_but_tie_break_does_not() {
        let a = map_of(&[("acme", 2.0, "From A")]);
        let b = map_of(&[("acme", 9.0, "From B")]);

        let ab = merge_matches([a.clone(), b.clone()]);
        let ba = merge_matches([b, a]);

        assert_eq!(ab["acme"].score, ba["acme"].score);
        assert_eq!(ab["acme"].company_name, "From A");
        assert_eq!(ba["acme"].company_name, "From B");
    }

    #[test]
    fn disjoint_keys_are_unioned() {
        let a = map_of(&[("acme", 2.0, "Acme")]);
        let b = map_of(&[("globex", 4.0, "Globex")]);

        let merged = merge_matches([a, b]);
        assert_eq!(merged.len(), 2);
    }
}
