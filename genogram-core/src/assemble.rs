//! Build the renderable document from a corrected raw document.
//!
//! Rules:
//! - Every subject and every placed fetus becomes a node with a fresh id
//! - Couples become partner connections (one per distinct pair)
//! - Children and fetuses hang from their parents' partner connection, or
//!   from the one parent we can find when there is none
//! - Relations become relation connections
//! - Links to unknown subjects are dropped

use std::collections::HashMap;

use crate::document::vocab::{
    child_status_from, fetus_status_from, gender_from, illnesses_from, life_status_from,
    partner_status_from, year_from, Gender, LifeStatus,
};
use crate::document::{RawDocument, SubjectId, SubjectKind};
use crate::layout::{Generation, Grid, LayoutConfig};
use crate::output::{DiagramOutput, EdgeKind, EdgeOutput, EdgeStatus, NodeKind, NodeOutput};

/// Sequential identifiers, unique within one output.
#[derive(Debug, Default)]
struct IdGen {
    nodes: usize,
    edges: usize,
}

impl IdGen {
    fn node(&mut self) -> String {
        self.nodes += 1;
        format!("node-{}", self.nodes)
    }

    fn edge(&mut self) -> String {
        self.edges += 1;
        format!("edge-{}", self.edges)
    }
}

/// Unordered pair key for looking up partner connections.
fn pair(a: SubjectId, b: SubjectId) -> (SubjectId, SubjectId) {
    if a <= b { (a, b) } else { (b, a) }
}

struct Assembler {
    ids: IdGen,
    grid: Grid,
    out: DiagramOutput,
    subject_nodes: HashMap<SubjectId, String>,
    partner_edges: HashMap<(SubjectId, SubjectId), String>,
}

impl Assembler {
    fn node_of(&self, id: Option<SubjectId>) -> Option<String> {
        id.and_then(|id| self.subject_nodes.get(&id).cloned())
    }

    /// Where a child connection starts: the parents' partner connection, else
    /// the father's node, else the mother's.
    fn parent_source(&self, father: Option<SubjectId>, mother: Option<SubjectId>) -> Option<String> {
        if let (Some(f), Some(m)) = (father, mother) {
            if let Some(edge) = self.partner_edges.get(&pair(f, m)) {
                return Some(edge.clone());
            }
        }
        self.node_of(father).or_else(|| self.node_of(mother))
    }

    fn push_edge(&mut self, kind: EdgeKind, from: String, to: String, status: Option<EdgeStatus>, label: Option<String>) -> String {
        let id = self.ids.edge();
        self.out.edges.push(EdgeOutput { id: id.clone(), kind, from, to, status, label });
        id
    }
}

pub fn assemble_document(doc: &RawDocument, cfg: &LayoutConfig) -> DiagramOutput {
    let mut asm = Assembler {
        ids: IdGen::default(),
        grid: cfg.grid(),
        out: DiagramOutput::default(),
        subject_nodes: HashMap::with_capacity(doc.subjects.len()),
        partner_edges: HashMap::new(),
    };

    for subject in &doc.subjects {
        if asm.subject_nodes.contains_key(&subject.id) {
            log::warn!("duplicate subject id {} dropped from output", subject.id.0);
            continue;
        }
        let id = asm.ids.node();
        asm.subject_nodes.insert(subject.id, id.clone());
        asm.out.nodes.push(NodeOutput {
            id,
            kind: match subject.kind {
                SubjectKind::Person => NodeKind::Person,
                SubjectKind::Fetus => NodeKind::Fetus,
            },
            subject_id: Some(subject.id),
            x: subject.x,
            y: subject.y,
            generation: Generation::of(asm.grid.snap(subject.y)),
            name: subject.name.clone(),
            gender: gender_from(subject.gender.as_deref()),
            life_status: life_status_from(subject.life_status.as_deref()),
            illnesses: illnesses_from(subject.illness.as_ref()),
            birth_year: year_from(subject.birth_year.as_ref()),
            death_year: year_from(subject.death_year.as_ref()),
            fetus_status: None,
        });
    }

    let mut fetus_nodes: Vec<Option<String>> = Vec::with_capacity(doc.fetus.len());
    for (fi, entry) in doc.fetus.iter().enumerate() {
        let Some((x, y)) = entry.position() else {
            log::warn!("fetus #{fi} is still pending and is left out");
            fetus_nodes.push(None);
            continue;
        };
        let id = asm.ids.node();
        asm.out.nodes.push(NodeOutput {
            id: id.clone(),
            kind: NodeKind::Fetus,
            subject_id: None,
            x,
            y,
            generation: Generation::of(asm.grid.snap(y)),
            name: None,
            gender: Gender::Unknown,
            life_status: LifeStatus::Unknown,
            illnesses: Vec::new(),
            birth_year: None,
            death_year: None,
            fetus_status: Some(fetus_status_from(Some(entry.status()))),
        });
        fetus_nodes.push(Some(id));
    }

    for link in &doc.couples {
        let key = pair(link.husband, link.wife);
        if asm.partner_edges.contains_key(&key) {
            continue;
        }
        let (Some(from), Some(to)) = (asm.node_of(Some(link.husband)), asm.node_of(Some(link.wife))) else {
            continue;
        };
        let status = EdgeStatus::Partner(partner_status_from(link.status.as_deref()));
        let id = asm.push_edge(EdgeKind::Partner, from, to, Some(status), None);
        asm.partner_edges.insert(key, id);
    }

    for link in &doc.children {
        let (Some(from), Some(to)) = (asm.parent_source(link.father, link.mother), asm.node_of(Some(link.child))) else {
            continue;
        };
        let status = EdgeStatus::Child(child_status_from(link.status.as_deref()));
        asm.push_edge(EdgeKind::Child, from, to, Some(status), None);
    }

    for (entry, node) in doc.fetus.iter().zip(&fetus_nodes) {
        let Some(to) = node.clone() else {
            continue;
        };
        let Some(from) = asm.parent_source(entry.father(), entry.mother()) else {
            continue;
        };
        let status = EdgeStatus::Fetus(fetus_status_from(Some(entry.status())));
        asm.push_edge(EdgeKind::Child, from, to, Some(status), None);
    }

    for link in &doc.relations {
        let (Some(from), Some(to)) = (asm.node_of(Some(link.a)), asm.node_of(Some(link.b))) else {
            continue;
        };
        let label = Some(link.description.trim().to_string()).filter(|d| !d.is_empty());
        asm.push_edge(EdgeKind::Relation, from, to, None, label);
    }

    log::debug!("assembled {} nodes, {} edges", asm.out.nodes.len(), asm.out.edges.len());
    asm.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::vocab::{FetusStatus, PartnerStatus};
    use crate::document::{ChildLink, CoupleLink, FetusEntry, RelationLink, Subject, YearValue};

    fn family() -> RawDocument {
        let mut father = Subject::new(1, -15.0, 0.0);
        father.gender = Some("male".to_string());
        father.birth_year = Some(YearValue::Text("约1950年".to_string()));
        RawDocument {
            subjects: vec![father, Subject::new(2, 45.0, 0.0), Subject::new(3, 15.0, 150.0)],
            couples: vec![CoupleLink { status: Some("Married".to_string()), ..CoupleLink::new(1, 2) }],
            children: vec![ChildLink::new(Some(1), Some(2), 3), ChildLink::new(None, Some(2), 99)],
            fetus: vec![
                FetusEntry::Placed {
                    father: Some(SubjectId(1)),
                    mother: Some(SubjectId(2)),
                    status: "miscarriage".to_string(),
                    x: 75.0,
                    y: 150.0,
                },
                FetusEntry::pending(Some(7), None, "pregnancy"),
            ],
            relations: vec![RelationLink { a: SubjectId(1), b: SubjectId(3), description: " close ".to_string() }],
        }
    }

    #[test]
    fn test_nodes_for_subjects_and_placed_fetuses() {
        let out = assemble_document(&family(), &LayoutConfig::default());
        assert_eq!(out.nodes.len(), 4);

        let father = out.node_for_subject(SubjectId(1)).unwrap();
        assert_eq!(father.gender, Gender::Male);
        assert_eq!(father.birth_year, Some(1950));
        assert_eq!(father.generation, Generation::Grandparent);

        let fetus = out.nodes.iter().find(|n| n.kind == NodeKind::Fetus).unwrap();
        assert_eq!(fetus.fetus_status, Some(FetusStatus::Miscarriage));
        assert_eq!((fetus.x, fetus.y), (75.0, 150.0));
    }

    #[test]
    fn test_children_hang_from_partner_edge() {
        let out = assemble_document(&family(), &LayoutConfig::default());
        let partner = out.edges.iter().find(|e| e.kind == EdgeKind::Partner).unwrap();
        assert_eq!(partner.status, Some(EdgeStatus::Partner(PartnerStatus::Married)));

        let children: Vec<&EdgeOutput> = out.edges.iter().filter(|e| e.kind == EdgeKind::Child).collect();
        // Child 99 does not exist, so only the child and the placed fetus remain
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|e| e.from == partner.id));
    }

    #[test]
    fn test_single_parent_fallback() {
        let doc = RawDocument {
            subjects: vec![Subject::new(2, 0.0, 0.0), Subject::new(3, 0.0, 150.0)],
            children: vec![ChildLink::new(Some(1), Some(2), 3)],
            ..RawDocument::default()
        };
        let out = assemble_document(&doc, &LayoutConfig::default());
        let mother = out.node_for_subject(SubjectId(2)).unwrap();
        assert_eq!(out.edges.len(), 1);
        assert_eq!(out.edges[0].from, mother.id);
    }

    #[test]
    fn test_relation_label_trimmed() {
        let out = assemble_document(&family(), &LayoutConfig::default());
        let relation = out.edges.iter().find(|e| e.kind == EdgeKind::Relation).unwrap();
        assert_eq!(relation.label.as_deref(), Some("close"));
    }

    #[test]
    fn test_ids_are_unique() {
        let out = assemble_document(&family(), &LayoutConfig::default());
        let mut ids: Vec<&str> = out.nodes.iter().map(|n| n.id.as_str()).chain(out.edges.iter().map(|e| e.id.as_str())).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_serialized_shape() {
        let out = assemble_document(&family(), &LayoutConfig::default());
        let json: serde_json::Value = serde_json::to_value(&out).unwrap();
        assert_eq!(json["nodes"][0]["generation"], "grandparent");
        assert_eq!(json["nodes"][0]["gender"], "male");
        assert_eq!(json["edges"][0]["kind"], "partner");
        assert_eq!(json["edges"][0]["status"], "married");
        assert!(json.get("error").is_none());
    }
}
