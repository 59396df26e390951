//! Tests for the clipboard model.

use super::*;
use crate::state::sink::MemorySink;

fn model() -> (ClipboardModel, MemorySink) {
    let sink = MemorySink::new();
    (ClipboardModel::new(Box::new(sink.clone())), sink)
}

/// Add an entry whose text is exactly `label — Genesis 1:{n}`.
fn add_labeled(model: &mut ClipboardModel, label: &str) -> EntryId {
    let verse = model.len();
    model.add("gn", 0, verse, label, "Genesis")
}

fn labels(model: &ClipboardModel) -> Vec<String> {
    model
        .entries()
        .iter()
        .map(|e| e.text().split(" — ").next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn entry_text_uses_one_based_label() {
    assert_eq!(
        format_entry_text("In the beginning.", "Genesis", 0, 0),
        "In the beginning. — Genesis 1:1"
    );
    assert_eq!(
        format_entry_text("  Jesus wept. ", "John", 10, 34),
        "Jesus wept. — John 11:35"
    );
}

#[test]
fn add_then_remove_serializes_in_order() {
    let (mut model, sink) = model();
    model.add("gn", 0, 0, "A", "Genesis");
    model.add("gn", 0, 1, "B", "Genesis");

    insta::assert_snapshot!(model.serialize(), @r"
    A — Genesis 1:1
    B — Genesis 1:2
    ");

    let removal = model.remove_at(0).unwrap();
    assert_eq!(removal.entry.text(), "A — Genesis 1:1");
    assert!(!removal.became_empty);
    assert_eq!(model.serialize(), "B — Genesis 1:2");
    assert_eq!(sink.last().as_deref(), Some("B — Genesis 1:2"));
}

#[test]
fn every_mutation_syncs_once() {
    let (mut model, sink) = model();
    add_labeled(&mut model, "A");
    add_labeled(&mut model, "B");
    add_labeled(&mut model, "C");
    model.move_to(0, 2).unwrap();
    model.remove_at(1).unwrap();

    assert_eq!(sink.write_count(), 5);
    assert_eq!(sink.last(), Some(model.serialize()));
}

#[test]
fn move_to_uses_splice_semantics() {
    let (mut model, _) = model();
    for label in ["A", "B", "C"] {
        add_labeled(&mut model, label);
    }

    model.move_to(0, 2).unwrap();
    assert_eq!(labels(&model), ["B", "C", "A"]);

    model.move_to(2, 0).unwrap();
    assert_eq!(labels(&model), ["A", "B", "C"]);

    // A swap would give [C, B, A]; splice shifts the middle instead.
    model.move_to(2, 0).unwrap();
    assert_eq!(labels(&model), ["C", "A", "B"]);
}

#[test]
fn move_to_same_position_keeps_order() {
    let (mut model, sink) = model();
    add_labeled(&mut model, "A");
    add_labeled(&mut model, "B");

    model.move_to(1, 1).unwrap();

    assert_eq!(labels(&model), ["A", "B"]);
    assert_eq!(sink.write_count(), 3);
}

#[test]
fn out_of_range_is_rejected_without_mutation() {
    let (mut model, sink) = model();
    add_labeled(&mut model, "A");

    assert_eq!(
        model.remove_at(1),
        Err(ClipboardError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(
        model.move_to(0, 3),
        Err(ClipboardError::IndexOutOfRange { index: 3, len: 1 })
    );
    assert_eq!(
        model.move_to(5, 0),
        Err(ClipboardError::IndexOutOfRange { index: 5, len: 1 })
    );
    assert_eq!(labels(&model), ["A"]);
    assert_eq!(sink.write_count(), 1);
}

#[test]
fn removing_last_entry_signals_became_empty() {
    let (mut model, sink) = model();
    add_labeled(&mut model, "A");

    let removal = model.remove_at(0).unwrap();

    assert!(removal.became_empty);
    assert!(model.is_empty());
    assert_eq!(sink.last().as_deref(), Some(""));
}

#[test]
fn clear_reports_whether_anything_was_removed() {
    let (mut model, sink) = model();
    assert!(!model.clear());

    add_labeled(&mut model, "A");
    add_labeled(&mut model, "B");
    assert!(model.clear());
    assert!(model.is_empty());
    assert_eq!(sink.last().as_deref(), Some(""));
}

#[test]
fn ids_are_unique_even_for_the_same_verse() {
    let (mut model, _) = model();
    let first = model.add("jo", 10, 34, "Jesus wept.", "John");
    let second = model.add("jo", 10, 34, "Jesus wept.", "John");

    assert_ne!(first, second);
    assert!(first.as_str().starts_with("jo-10-34-"));
    assert_eq!(model.len(), 2);
}

#[test]
fn position_of_follows_reordering() {
    let (mut model, _) = model();
    let a = add_labeled(&mut model, "A");
    add_labeled(&mut model, "B");
    let c = add_labeled(&mut model, "C");

    model.move_to(2, 0).unwrap();

    assert_eq!(model.position_of(&c), Some(0));
    assert_eq!(model.position_of(&a), Some(1));
    model.remove_at(1).unwrap();
    assert_eq!(model.position_of(&a), None);
}

#[test]
fn entry_keeps_source_coordinates() {
    let (mut model, _) = model();
    model.add("ps", 22, 0, "The LORD is my shepherd.", "Psalms");

    let entry = model.get(0).unwrap();
    assert_eq!(entry.book(), "ps");
    assert_eq!(entry.chapter(), 22);
    assert_eq!(entry.verse(), 0);
    assert_eq!(entry.text(), "The LORD is my shepherd. — Psalms 23:1");
    assert!(model.get(1).is_none());
}

#[test]
fn sink_failure_does_not_roll_back() {
    let (mut model, sink) = model();
    sink.set_failing(true);

    add_labeled(&mut model, "A");

    assert_eq!(model.len(), 1);
    assert_eq!(sink.write_count(), 0);

    sink.set_failing(false);
    add_labeled(&mut model, "B");
    assert_eq!(sink.last(), Some(model.serialize()));
}
