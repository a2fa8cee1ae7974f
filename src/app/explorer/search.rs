use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::SimNode;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of nodes whose name, id or labels fuzzy-match `query`. `None` when the query is
/// blank so callers can tell "no search" from "no hits".
pub(in crate::app) fn search_matches(nodes: &[SimNode], query: &str) -> Option<HashSet<usize>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    let matches = nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let hit = fuzzy_match_score(&matcher, &node.display_name(), query).is_some()
                || fuzzy_match_score(&matcher, &node.id.to_string(), query).is_some()
                || node
                    .labels
                    .iter()
                    .any(|label| fuzzy_match_score(&matcher, label, query).is_some());
            hit.then_some(index)
        })
        .collect();

    Some(matches)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Rect, pos2, vec2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::super::{ForceParams, ForceSimulation};
    use super::*;
    use crate::graph::GraphPayload;

    fn simulation() -> ForceSimulation {
        let payload = GraphPayload::parse(
            r#"{
                "nodes": [
                    { "id": 1, "labels": ["Table"], "properties": { "name": "customer_orders" } },
                    { "id": 2, "labels": ["Column"], "properties": { "name": "order_id" } },
                    { "id": 3, "labels": ["BusinessMetric"], "properties": { "name": "Revenue" } }
                ]
            }"#,
        )
        .expect("payload parses");
        let canvas = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 400.0));
        ForceSimulation::new(
            &payload,
            canvas.size(),
            ForceParams::default(),
            &mut StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn blank_query_is_not_a_search() {
        assert!(search_matches(simulation().nodes(), "   ").is_none());
    }

    #[test]
    fn matches_names_case_insensitively() {
        let simulation = simulation();
        let matches = search_matches(simulation.nodes(), "ORDER").expect("search ran");
        assert_eq!(matches, HashSet::from([0, 1]));

        let matches = search_matches(simulation.nodes(), "revenue").expect("search ran");
        assert_eq!(matches, HashSet::from([2]));
    }

    #[test]
    fn matches_category_labels() {
        let simulation = simulation();
        let matches = search_matches(simulation.nodes(), "BusinessMetric").expect("search ran");
        assert_eq!(matches, HashSet::from([2]));
    }
}
