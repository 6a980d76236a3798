//! Full-text filtering over resolved concepts, the way a browsing UI narrows
//! the list as someone types.

use crate::hierarchy::{ConceptGraph, ConceptRecord};

/// Case-insensitive substring match against any of the record's search terms.
/// An empty (or all-whitespace) needle matches everything.
pub fn matches_term(record: &ConceptRecord, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_terms
        .iter()
        .any(|term| term.to_lowercase().contains(&needle))
}

/// Matching records in graph order.
pub fn search_concepts<'a>(graph: &'a ConceptGraph, needle: &str) -> Vec<&'a ConceptRecord> {
    graph
        .iter()
        .filter(|record| matches_term(record, needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::ingest::build_concept_graph;
    use crate::progress::NoopProgress;
    use serde_json::json;

    fn graph() -> ConceptGraph {
        let doc = json!({"@graph": [
            {
                "@id": "ndc9:1",
                "skos:notation": "1",
                "skos:prefLabel": [{"@value": "Philosophy", "@language": "en"}, {"@value": "哲学", "@language": "ja"}],
                "ndcv:indexedTerm": {"xl:literalForm": "Philosophy", "ndl:transcription": "テツガク"},
            },
            {
                "@id": "ndc9:2",
                "skos:notation": "2",
                "skos:prefLabel": "歴史",
                "ndcv:indexedTerm": [{"xl:literalForm": "History"}],
            },
        ]});
        build_concept_graph(doc, &IngestConfig::default(), &mut NoopProgress)
            .unwrap()
            .0
    }

    fn found(graph: &ConceptGraph, needle: &str) -> Vec<String> {
        search_concepts(graph, needle)
            .into_iter()
            .map(|r| r.notation.clone())
            .collect()
    }

    #[test]
    fn test_search() {
        let graph = graph();
        assert_eq!(found(&graph, "哲"), vec!["1"]);
        assert_eq!(found(&graph, "history"), vec!["2"]);
        assert_eq!(found(&graph, "PHILO"), vec!["1"]);
        assert_eq!(found(&graph, "2"), vec!["2"]);
        assert_eq!(found(&graph, "  "), vec!["1", "2"]);
        assert!(found(&graph, "geology").is_empty());
    }
}
