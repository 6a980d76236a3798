use serde_json::{json, Value};
use ustr::Ustr;

use ndc_tools::hierarchy::resolve_hierarchy_in_order;
use ndc_tools::{
    build_concept_graph, parse_concept_document, parse_concept_str, ConceptGraph, IngestConfig,
    LogCollector, NoopProgress,
};

const SAMPLE: &str = include_str!("data/ndc9_sample.json");

fn sample_graph(sink: &mut LogCollector) -> ConceptGraph {
    let document: Value = serde_json::from_str(SAMPLE).unwrap();
    build_concept_graph(document, &IngestConfig::default(), sink)
        .unwrap()
        .0
}

fn placement(graph: &ConceptGraph) -> Value {
    json!(graph
        .iter()
        .map(|record| json!({
            "@id": record.id,
            "depth": record.depth,
            "ancestors": record.ancestors,
        }))
        .collect::<Vec<Value>>())
}

#[test]
fn test_sample_placement() {
    let mut sink = LogCollector::new();
    let graph = sample_graph(&mut sink);

    insta::assert_json_snapshot!(placement(&graph), @r###"
    [
      {
        "@id": "ndc9:913.6",
        "depth": 3,
        "ancestors": [
          "ndc9:9",
          "ndc9:91",
          "ndc9:913"
        ]
      },
      {
        "@id": "ndc9:9",
        "depth": 0,
        "ancestors": []
      },
      {
        "@id": "ndc9:913",
        "depth": 2,
        "ancestors": [
          "ndc9:9",
          "ndc9:91"
        ]
      },
      {
        "@id": "ndc9:91",
        "depth": 1,
        "ancestors": [
          "ndc9:9"
        ]
      },
      {
        "@id": "ndc9:913.6-collection",
        "depth": 4,
        "ancestors": [
          "ndc9:9",
          "ndc9:91",
          "ndc9:913",
          "ndc9:913.6"
        ]
      },
      {
        "@id": "ndc9:99x",
        "depth": 1,
        "ancestors": [
          "ndc9:99"
        ]
      }
    ]
    "###);

    let warnings: Vec<&String> = sink
        .logs
        .iter()
        .filter(|log| log.starts_with("Warning: "))
        .collect();
    assert_eq!(
        warnings,
        vec!["Warning: Parent concept not found: ndc9:99 (while resolving ndc9:99x)"]
    );
}

#[test]
fn test_sample_records() {
    let records = parse_concept_str(SAMPLE, &IngestConfig::default(), &mut NoopProgress).unwrap();

    let modern = &records[0];
    assert_eq!(modern.label, "小説．物語：近代");
    assert_eq!(
        modern.search_terms,
        vec![
            "小説．物語：近代",
            "913.6",
            "近代小説",
            "キンダイ ショウセツ",
            "現代小説",
            "ゲンダイ ショウセツ",
        ]
    );

    // Pass-through fields come back out under their JSON-LD keys.
    let value = serde_json::to_value(modern).unwrap();
    assert_eq!(value["skos:note"], json!("明治以降の作品"));
    assert_eq!(value["@type"], json!("ndcv:Section"));
    assert_eq!(value["skos:prefLabel"][1]["@language"], json!("ja"));
    assert_eq!(value["prefLabel"], json!("小説．物語：近代"));
    assert_eq!(value["parentRef"], json!("ndc9:913"));
    assert_eq!(value["skos:broader"], json!({"@id": "ndc9:913"}));
    assert_eq!(
        value["ndcv:indexedTerm"][1],
        json!({"xl:literalForm": "現代小説", "ndl:transcription": "ゲンダイ ショウセツ"})
    );

    let collection = records
        .iter()
        .find(|r| r.id.as_str() == "ndc9:913.6-collection")
        .unwrap();
    let value = serde_json::to_value(collection).unwrap();
    assert_eq!(value["dct:isPartOf"], json!({"@id": "ndc9:913.6"}));
    assert!(value.get("skos:broader").is_none());

    let root = &records[1];
    let value = serde_json::to_value(root).unwrap();
    assert!(value.get("parentRef").is_none());
    assert_eq!(value["skos:narrower"], json!([{"@id": "ndc9:91"}]));

    let notations: Vec<&str> = records.iter().map(|r| r.notation.as_str()).collect();
    assert!(!notations.contains(&""));
    assert!(records
        .iter()
        .all(|r| r.id.as_str() != "http://jla.or.jp/data/ndc9" && r.id.as_str() != "ndc9:range"));
}

#[test]
fn test_sample_order_independence() {
    let baseline = sample_graph(&mut LogCollector::new());

    let document: Value = serde_json::from_str(SAMPLE).unwrap();
    let mut graph = ConceptGraph::new();
    for record in parse_concept_document(document, &IngestConfig::default(), &mut NoopProgress)
        .unwrap()
    {
        let mut record = record;
        record.ancestors.clear();
        record.depth = 0;
        graph.insert(record);
    }
    let reversed: Vec<Ustr> = baseline.iter().rev().map(|r| r.id).collect();
    resolve_hierarchy_in_order(&mut graph, reversed, &mut NoopProgress);

    assert_eq!(placement(&graph), placement(&baseline));
    for record in &graph {
        assert_eq!(record.depth as usize, record.ancestors.len(), "{}", record.id);
        if let (Some(parent), Some(last)) = (record.parent_ref, record.ancestors.last()) {
            assert_eq!(parent, *last, "{}", record.id);
        }
    }
}

#[test]
fn test_deep_chain_reuses_parent_chains() {
    // A long chain listed root-first.  Each record after the root reuses its
    // parent's memoized chain instead of walking back up.
    let depth = 2000;
    let mut nodes = vec![];
    for i in 0..depth {
        let mut node = json!({"@id": format!("deep:{}", i), "skos:notation": i.to_string()});
        if i > 0 {
            node["skos:broader"] = json!(format!("deep:{}", i - 1));
        }
        nodes.push(node);
    }

    let mut sink = LogCollector::new();
    let (graph, summary) =
        build_concept_graph(json!({ "@graph": nodes }), &IngestConfig::default(), &mut sink).unwrap();

    assert_eq!(summary.concepts, depth);
    assert_eq!(summary.resolve.memo_hits, depth - 1);
    let leaf = graph.get(&format!("deep:{}", depth - 1)).unwrap();
    assert_eq!(leaf.depth as usize, depth - 1);
    assert_eq!(leaf.ancestors.first().map(|a| a.as_str()), Some("deep:0"));
}
