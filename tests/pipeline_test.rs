//! End-to-end pipeline tests: archives on disk through to CSV text.

mod common;

use common::*;
use completion_eval::archive::ArchiveError;
use completion_eval::event::{IdeEvent, NameKind, TerminationState};
use completion_eval::export::{write_csv, ExportOptions, HEADER_WIDTH};
use completion_eval::{
    ContextProcessor, Evaluator, MethodCallRecommender, ModelStore, RankedRetriever, Scorecard,
};
use std::path::Path;
use tempfile::TempDir;

fn csv_text(scorecard: &Scorecard) -> String {
    let mut buf = Vec::new();
    write_csv(&mut buf, scorecard.records(), &ExportOptions::default()).unwrap();
    String::from_utf8(buf).unwrap()
}

fn evaluate<R: RankedRetriever>(retriever: R, events_dir: &Path) -> Scorecard {
    Evaluator::new(ContextProcessor, retriever)
        .evaluate_directory(events_dir, false)
        .unwrap()
        .scorecard
}

#[test]
fn test_round_trip_single_event() {
    let dir = TempDir::new().unwrap();
    write_archive(
        dir.path(),
        "session.jsonl",
        &[applied(
            "Foo.bar()",
            vec![invocation("Foo", Some("Foo.bar()"))],
        )],
    );

    let card = evaluate(
        StubRetriever::new(&[("A.x()", 0.9), ("B.y()", 0.5)]),
        dir.path(),
    );
    let out = csv_text(&card);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 2, "header plus exactly one row");
    assert_eq!(lines[0].split(',').count(), HEADER_WIDTH);
    assert_eq!(
        lines[1],
        "True,Foo.bar(),\
         A.x(),0.9,1.0,0.5,0.25,0.125,1.0,0.75,0.0,1.0,\
         B.y(),0.5,1.0,0.5,0.25,0.125,1.0,0.75,0.0,1.0"
    );
}

#[test]
fn test_unmatched_event_row() {
    let dir = TempDir::new().unwrap();
    write_archive(
        dir.path(),
        "session.jsonl",
        &[applied(
            "Foo.bar()",
            vec![
                invocation("Foo", Some("Foo.baz()")),
                invocation("Foo", None),
            ],
        )],
    );

    let card = evaluate(StubRetriever::new(&[("A.x()", 0.9)]), dir.path());
    let out = csv_text(&card);
    assert_eq!(out.lines().nth(1), Some("False,Foo.bar()"));
}

#[test]
fn test_filtered_events_never_reach_output() {
    let dir = TempDir::new().unwrap();
    let inv = || vec![invocation("Foo", Some("Foo.bar()"))];
    write_archive(
        dir.path(),
        "session.jsonl",
        &[
            IdeEvent::Other,
            completion_with(
                TerminationState::Cancelled,
                Some((NameKind::Method, "Foo.cancelled()")),
                inv(),
            ),
            completion_with(TerminationState::Applied, None, inv()),
            completion_with(
                TerminationState::Applied,
                Some((NameKind::Field, "Foo.field")),
                inv(),
            ),
            applied("Foo.bar()", inv()),
        ],
    );

    let card = evaluate(StubRetriever::new(&[]), dir.path());
    assert_eq!(card.len(), 1);
    let out = csv_text(&card);
    assert!(!out.contains("Foo.cancelled()"));
    assert!(!out.contains("Foo.field"));
    assert_eq!(out.lines().nth(1), Some("True,Foo.bar()"));
}

#[test]
fn test_no_qualifying_events_writes_header_only() {
    let dir = TempDir::new().unwrap();
    write_archive(dir.path(), "empty.jsonl", &[]);
    write_archive(dir.path(), "others.jsonl", &[IdeEvent::Other, IdeEvent::Other]);

    let card = evaluate(StubRetriever::new(&[("A.x()", 0.9)]), dir.path());
    assert!(card.is_empty());
    let out = csv_text(&card);
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("evaluated,selectedMethod,recommendedMethod_0,"));
}

#[test]
fn test_ranked_results_truncated_to_first_ten() {
    let dir = TempDir::new().unwrap();
    write_archive(
        dir.path(),
        "session.jsonl",
        &[applied("m()", vec![invocation("Foo", Some("m()"))])],
    );
    let names: Vec<String> = (0..14).map(|i| format!("C.m{i}()")).collect();
    let candidates: Vec<(&str, f64)> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), 1.0 - i as f64 / 100.0))
        .collect();
    let retriever = StubRetriever::new(&candidates);
    let expected = retriever.0.clone();

    let card = evaluate(retriever, dir.path());
    let results = card.records()[0].ranked_results().unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(results, &expected[..10]);
}

#[test]
fn test_records_follow_archive_then_event_order() {
    let dir = TempDir::new().unwrap();
    let ev = |id: &str| applied(id, vec![]);
    write_archive(dir.path(), "b.jsonl", &[ev("b1()"), ev("b2()")]);
    write_archive(dir.path(), "a.jsonl", &[ev("a1()"), ev("a2()"), ev("a1()")]);
    write_archive(dir.path(), "c.jsonl", &[ev("c1()")]);

    let card = evaluate(StubRetriever::new(&[]), dir.path());
    let ids: Vec<&str> = card
        .records()
        .iter()
        .map(|r| r.selected_method.as_str())
        .collect();
    assert_eq!(ids, vec!["a1()", "a2()", "a1()", "b1()", "b2()", "c1()"]);
}

#[test]
fn test_malformed_archive_aborts_by_default() {
    let dir = TempDir::new().unwrap();
    write_archive(dir.path(), "a.jsonl", &[applied("m()", vec![])]);
    std::fs::write(dir.path().join("b.jsonl"), "{\"type\": \"completion\"\n").unwrap();

    let err = Evaluator::new(ContextProcessor, StubRetriever::new(&[]))
        .evaluate_directory(dir.path(), false)
        .unwrap_err();
    assert!(matches!(err, ArchiveError::Malformed { line: 1, .. }));
}

#[test]
fn test_malformed_archive_skipped_when_requested() {
    let dir = TempDir::new().unwrap();
    write_archive(dir.path(), "a.jsonl", &[applied("m()", vec![])]);
    std::fs::write(dir.path().join("b.jsonl"), "garbage\n").unwrap();
    write_archive(dir.path(), "c.jsonl", &[applied("n()", vec![])]);

    let report = Evaluator::new(ContextProcessor, StubRetriever::new(&[]))
        .evaluate_directory(dir.path(), true)
        .unwrap();
    assert_eq!(report.archives, 3);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("b.jsonl"));
    assert_eq!(report.scorecard.len(), 2);
}

#[test]
fn test_model_recommender_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let model_dir = dir.path().join("model");
    let events_dir = dir.path().join("events");
    std::fs::create_dir(&events_dir).unwrap();

    write_model(
        &model_dir,
        &[
            model_entry("List", "List.size()", Some("int")),
            model_entry("List", "List.isEmpty()", Some("boolean")),
            model_entry("List", "List.get(int)", Some("Object")),
            model_entry("List", "List.hashCode()", Some("int")),
        ],
    );
    write_archive(
        &events_dir,
        "session.jsonl",
        &[
            applied("List.size()", vec![invocation("List", Some("List.size()"))]),
            applied("Map.get(K)", vec![invocation("Map", Some("Map.get(K)"))]),
        ],
    );

    let run = || {
        let model = ModelStore::load(&model_dir).unwrap();
        let card = evaluate(MethodCallRecommender::new(model), &events_dir);
        csv_text(&card)
    };
    let first = run();
    let second = run();
    assert_eq!(first.as_bytes(), second.as_bytes());

    let rows: Vec<&str> = first.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    // Exact-context ties rank by name
    assert!(rows[0].starts_with("True,List.size(),List.hashCode(),1.0,"));
    assert!(rows[0].contains(",List.size(),1.0,"));
    // Matched but nothing known about Map
    assert_eq!(rows[1], "True,Map.get(K)");
}
