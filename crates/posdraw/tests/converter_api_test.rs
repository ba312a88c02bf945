//! Integration tests for the Converter API
//!
//! These tests run whole documents through the public API, from JSON text to
//! draw.io XML on disk.

use std::fs;

use posdraw::{
    Converter, LoadOutcome, LoadStrategy, PosDrawError,
    check::{DocumentSummary, VertexCategory},
    config::AppConfig,
    output_path_for,
    skip::SkipReason,
};
use posdraw_parser::error::{ErrorCode, Severity};

const START_END: &str = r#"{
  "diagram": {
    "elements": {
      "elements": {
        "A": {"name": "rect", "props": {"x": 0, "y": 0, "w": 100, "h": 50},
              "textBlock": [{"text": "Start"}]},
        "B": {"name": "round", "props": {"x": 200, "y": 0, "w": 100, "h": 50},
              "textBlock": [{"text": "End"}]},
        "L": {"name": "linker", "from": {"id": "A"}, "to": {"id": "B"},
              "points": [{"x": 100, "y": 25}, {"x": 150, "y": 25}, {"x": 200, "y": 25}]}
      }
    }
  }
}"#;

const DANGLING: &str = r#"{
  "diagram": {
    "elements": {
      "elements": {
        "A": {"name": "rect", "props": {"x": 0, "y": 0, "w": 100, "h": 50}},
        "B": {"name": "round", "props": {"x": 200, "y": 0, "w": 100, "h": 50}},
        "L": {"name": "linker", "from": {"id": "A"}, "to": {"id": "C"}}
      }
    }
  }
}"#;

fn load(converter: &Converter, source: &str) -> LoadOutcome {
    converter
        .load_reader(&mut source.as_bytes(), LoadStrategy::Full)
        .expect("Failed to load document")
}

#[test]
fn test_converter_api_exists() {
    let _converter = Converter::default();
    let _configured = Converter::new(AppConfig::default());
}

#[test]
fn test_two_nodes_one_connector() {
    let converter = Converter::default();
    let collection = load(&converter, START_END).into_collection();

    let conversion = converter.convert(&collection);
    let report = conversion.report();
    assert_eq!(report.nodes(), 2);
    assert_eq!(report.connectors(), 1);
    assert!(report.skipped().is_empty());

    let xml = converter
        .render_xml(conversion.document())
        .expect("Failed to render XML");
    assert!(xml.contains(r#"<mxCell id="A" value="Start""#));
    assert!(xml.contains(r#"<mxCell id="B" value="End""#));
    assert!(xml.contains(r#"source="A" target="B" edge="1""#));
    assert!(xml.contains(r#"<mxPoint x="150" y="25"/>"#));
}

#[test]
fn test_dangling_connector_is_skipped() {
    let converter = Converter::default();
    let collection = load(&converter, DANGLING).into_collection();

    let conversion = converter.convert(&collection);
    let report = conversion.report();
    assert_eq!(report.nodes(), 2);
    assert_eq!(report.connectors(), 0);
    assert_eq!(report.skipped().len(), 1);
    assert_eq!(report.skipped()[0].id(), "L");
    assert!(matches!(
        report.skipped()[0].reason(),
        SkipReason::MissingEndpoint { .. }
    ));
}

#[test]
fn test_strategies_convert_identically() {
    let converter = Converter::default();

    let mut outputs = Vec::new();
    for strategy in [LoadStrategy::Full, LoadStrategy::Subtree] {
        let outcome = converter
            .load_reader(&mut START_END.as_bytes(), strategy)
            .expect("Failed to load document");
        let conversion = converter.convert(&outcome.into_collection());
        outputs.push(
            converter
                .render_xml(conversion.document())
                .expect("Failed to render XML"),
        );
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_convert_file_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("flow.pos");
    fs::write(&input, START_END).expect("Failed to write input");
    let output = output_path_for(&input);

    let converter = Converter::default();
    let file_report = converter
        .convert_file(&input, &output)
        .expect("Failed to convert file");

    assert!(file_report.elements_found());
    assert!(file_report.warning().is_none());
    assert_eq!(file_report.strategy(), LoadStrategy::Full);
    assert_eq!(file_report.output(), output.as_path());
    assert_eq!(output.file_name().and_then(|n| n.to_str()), Some("flow.drawio.xml"));

    let xml = fs::read_to_string(&output).expect("Failed to read output");
    let summary = DocumentSummary::from_xml(&xml).expect("Output should be draw.io XML");
    assert_eq!(summary.vertices(), 2);
    assert_eq!(summary.edges(), 1);
    assert_eq!(summary.categories().get(&VertexCategory::Rectangle), Some(&1));
    assert_eq!(summary.categories().get(&VertexCategory::Ellipse), Some(&1));
}

#[test]
fn test_convert_file_without_elements() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("empty.pos");
    fs::write(&input, r#"{"diagram": {"page": {}}}"#).expect("Failed to write input");
    let output = dir.path().join("empty.drawio.xml");

    let file_report = Converter::default()
        .convert_file(&input, &output)
        .expect("Failed to convert file");

    assert!(!file_report.elements_found());
    assert_eq!(file_report.report().nodes(), 0);

    let warning = file_report.warning().expect("Expected a warning");
    assert_eq!(warning.severity(), Severity::Warning);
    assert_eq!(warning.code(), Some(ErrorCode::W001));

    let xml = fs::read_to_string(&output).expect("Failed to read output");
    let summary = DocumentSummary::from_xml(&xml).expect("Output should be draw.io XML");
    assert_eq!(summary.vertices(), 0);
    assert!(xml.contains(r#"<mxCell id="1" parent="0"/>"#));
}

#[test]
fn test_invalid_json_returns_parse_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("broken.pos");
    fs::write(&input, r#"{"diagram": "#).expect("Failed to write input");
    let output = dir.path().join("broken.drawio.xml");

    let err = Converter::default()
        .convert_file(&input, &output)
        .expect_err("Should fail on truncated JSON");

    match err {
        PosDrawError::Parse { err, path } => {
            assert_eq!(path, input);
            assert_eq!(err.diagnostic().code(), Some(ErrorCode::E002));
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
    assert!(!output.exists(), "No output should be written on failure");
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = Converter::default().load(dir.path().join("missing.pos"));

    assert!(matches!(result, Err(PosDrawError::Io(_))));
}

#[test]
fn test_auto_strategy_streams_large_files() {
    let config: AppConfig = serde_json::from_str(
        r#"{"loader": {"strategy": "auto", "subtree_threshold": 16}}"#,
    )
    .expect("Failed to build config");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("big.pos");
    fs::write(&input, START_END).expect("Failed to write input");

    let file_report = Converter::new(config)
        .convert_file(&input, dir.path().join("big.drawio.xml"))
        .expect("Failed to convert file");

    assert_eq!(file_report.strategy(), LoadStrategy::Subtree);
    assert_eq!(file_report.report().connectors(), 1);
}
