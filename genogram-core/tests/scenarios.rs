//! End-to-end layout scenarios through the public API.

use genogram_core::document::{ChildLink, CoupleLink, FetusEntry, RawDocument, Subject, SubjectId};
use genogram_core::layout::Generation;
use genogram_core::output::{EdgeKind, NodeKind};
use genogram_core::{correct_document, correct_json, render_json, LayoutConfig};

fn pos(doc: &RawDocument, id: i64) -> (f64, f64) {
    doc.subjects.iter().find(|s| s.id == SubjectId(id)).map(|s| (s.x, s.y)).unwrap()
}

fn couple_over_child() -> RawDocument {
    RawDocument {
        subjects: vec![Subject::new(1, 0.0, 0.0), Subject::new(2, 30.0, 0.0), Subject::new(3, 15.0, 150.0)],
        couples: vec![CoupleLink::new(1, 2)],
        children: vec![ChildLink::new(Some(1), Some(2), 3)],
        ..RawDocument::default()
    }
}

fn siblings_on_one_slot() -> RawDocument {
    RawDocument {
        subjects: vec![
            Subject::new(1, 0.0, 0.0),
            Subject::new(2, 60.0, 0.0),
            Subject::new(3, 30.0, 150.0),
            Subject::new(4, 30.0, 150.0),
        ],
        couples: vec![CoupleLink::new(1, 2)],
        children: vec![ChildLink::new(Some(1), Some(2), 3), ChildLink::new(Some(1), Some(2), 4)],
        ..RawDocument::default()
    }
}

fn overlapping_couples() -> RawDocument {
    RawDocument {
        subjects: vec![
            Subject::new(1, 0.0, 150.0),
            Subject::new(2, 60.0, 150.0),
            Subject::new(3, 30.0, 150.0),
            Subject::new(4, 90.0, 150.0),
            Subject::new(5, 60.0, 300.0),
        ],
        couples: vec![CoupleLink::new(1, 2), CoupleLink::new(3, 4)],
        children: vec![ChildLink::new(Some(3), Some(4), 5)],
        ..RawDocument::default()
    }
}

#[test]
fn test_couple_spans_child() {
    let cfg = LayoutConfig::default();
    let out = correct_document(&couple_over_child(), &cfg);

    let (x1, y1) = pos(&out, 1);
    let (x2, _) = pos(&out, 2);
    assert!(x1 <= 15.0 - cfg.couple_margin);
    assert!(x2 >= 15.0 + cfg.couple_margin);
    assert_eq!((x1, x2), (-15.0, 45.0));
    assert_eq!(y1, 0.0);
    assert_eq!(pos(&out, 3), (15.0, 150.0));
}

#[test]
fn test_stacked_strangers_are_separated() {
    let doc = RawDocument {
        subjects: vec![Subject::new(1, 0.0, 0.0), Subject::new(2, 0.0, 0.0)],
        ..RawDocument::default()
    };
    let out = correct_document(&doc, &LayoutConfig::default());
    assert_eq!(pos(&out, 1), (0.0, 0.0));
    assert_eq!(pos(&out, 2), (60.0, 0.0));
}

#[test]
fn test_fetus_lands_one_generation_down() {
    let doc = RawDocument {
        subjects: vec![Subject::new(1, 0.0, 300.0), Subject::new(2, 60.0, 300.0)],
        couples: vec![CoupleLink::new(1, 2)],
        fetus: vec![FetusEntry::pending(Some(1), Some(2), "pregnancy")],
        ..RawDocument::default()
    };
    let out = correct_document(&doc, &LayoutConfig::default());
    let (_, y) = out.fetus[0].position().unwrap();
    assert_eq!(y, Generation::Child.center());

    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["fetus"][0], serde_json::json!([1, 2, "pregnancy", 30.0, 450.0]));
}

#[test]
fn test_overlapping_subtree_is_shifted() {
    let cfg = LayoutConfig::default();
    let out = correct_document(&overlapping_couples(), &cfg);

    let offset = 60.0 - 30.0 + cfg.subtree_margin;
    assert_eq!(pos(&out, 1).0, 0.0);
    assert_eq!(pos(&out, 2).0, 60.0);
    assert_eq!(pos(&out, 3).0, 30.0 + offset);
    assert_eq!(pos(&out, 4).0, 90.0 + offset);
    assert_eq!(pos(&out, 5).0, 60.0 + offset);
    assert!(pos(&out, 3).0 >= pos(&out, 2).0);
}

#[test]
fn test_siblings_moved_apart_stay_spanned() {
    let cfg = LayoutConfig::default();
    let out = correct_document(&siblings_on_one_slot(), &cfg);

    assert_eq!(pos(&out, 3), (30.0, 150.0));
    assert_eq!(pos(&out, 4), (90.0, 150.0));
    assert!(pos(&out, 1).0 <= 30.0 - cfg.couple_margin);
    assert!(pos(&out, 2).0 >= 90.0 + cfg.couple_margin);
}

#[test]
fn test_shifted_subtree_avoids_bystander() {
    let mut doc = overlapping_couples();
    doc.subjects.push(Subject::new(9, 150.0, 150.0));
    let out = correct_document(&doc, &LayoutConfig::default());

    let mut xs: Vec<f64> = [1, 2, 3, 4, 9].iter().map(|&id| pos(&out, id).0).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    assert_eq!(xs.len(), 5, "two subjects share a slot in the parent band");
    assert_eq!(pos(&out, 4).0, 150.0);
    assert_eq!(pos(&out, 9).0, 210.0);
}

#[test]
fn test_orphan_fetus_is_rendered() {
    let input = r#"{
        "subjects": [{"id": 1, "x": 0, "y": 0}],
        "fetus": [[8, 9, "pregnancy"]]
    }"#;
    let out = render_json(input, None).unwrap();
    assert_eq!(out.nodes.len(), 2);

    let fetus = out.nodes.iter().find(|n| n.kind == NodeKind::Fetus).unwrap();
    assert_eq!((fetus.x, fetus.y), (0.0, Generation::Child.center()));
    assert_eq!(fetus.generation, Generation::Child);
}

#[test]
fn test_correction_is_idempotent() {
    let cfg = LayoutConfig::default();
    let mut with_bystander = overlapping_couples();
    with_bystander.subjects.push(Subject::new(9, 150.0, 150.0));
    for doc in [couple_over_child(), overlapping_couples(), siblings_on_one_slot(), with_bystander] {
        let once = correct_document(&doc, &cfg);
        let twice = correct_document(&once, &cfg);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_cyclic_family_terminates() {
    // Each couple's child is a partner in the other couple
    let doc = RawDocument {
        subjects: vec![
            Subject::new(1, 0.0, 150.0),
            Subject::new(2, 60.0, 150.0),
            Subject::new(3, 30.0, 150.0),
            Subject::new(4, 90.0, 150.0),
        ],
        couples: vec![CoupleLink::new(1, 2), CoupleLink::new(3, 4)],
        children: vec![ChildLink::new(Some(1), Some(2), 3), ChildLink::new(Some(3), Some(4), 1)],
        ..RawDocument::default()
    };
    let out = correct_document(&doc, &LayoutConfig::default());
    assert_eq!(out.subjects.len(), 4);
}

#[test]
fn test_render_json_end_to_end() {
    let input = r#"{
        "subjects": [
            {"id": 1, "kind": "person", "x": 0, "y": 0, "gender": "男", "status": "deceased", "deathYear": "2001年"},
            {"id": 2, "kind": "person", "x": 30, "y": 0, "gender": "female", "illness": "diabetes; 高血压"},
            {"id": 3, "kind": "person", "x": 15, "y": 150, "name": "Ann"}
        ],
        "couples": [[1, 2, "married"]],
        "children": [[1, 2, 3, "adopted"]],
        "fetus": [[1, 2, "miscarriage"], [8, 9, "pregnancy"]],
        "relations": [[1, 3, "close"]]
    }"#;
    let out = render_json(input, Some(r#"{"couple_margin": 45}"#)).unwrap();

    // Three people and two fetuses; the orphaned one has no child edge
    assert_eq!(out.nodes.iter().filter(|n| n.kind == NodeKind::Person).count(), 3);
    assert_eq!(out.nodes.iter().filter(|n| n.kind == NodeKind::Fetus).count(), 2);

    let father = out.node_for_subject(SubjectId(1)).unwrap();
    assert_eq!(father.death_year, Some(2001));
    assert_eq!(father.x, -30.0);
    assert_eq!(father.generation, Generation::Grandparent);

    let partner = out.edges.iter().find(|e| e.kind == EdgeKind::Partner).unwrap();
    let child_edges = out.edges.iter().filter(|e| e.kind == EdgeKind::Child).count();
    assert_eq!(child_edges, 2);
    assert!(out.edges.iter().filter(|e| e.kind == EdgeKind::Child).all(|e| e.from == partner.id));
    assert_eq!(out.edges.iter().filter(|e| e.kind == EdgeKind::Relation).count(), 1);
}

#[test]
fn test_correct_json_keeps_unknown_fields() {
    let input = r#"{"subjects": [{"id": 1, "x": 1, "y": 2, "notes": "keep me"}]}"#;
    let corrected: serde_json::Value = serde_json::from_str(&correct_json(input, None).unwrap()).unwrap();
    assert_eq!(corrected["subjects"][0]["notes"], "keep me");
    assert_eq!(corrected["subjects"][0]["x"], 0.0);
    assert_eq!(corrected["subjects"][0]["y"], 0.0);
}
