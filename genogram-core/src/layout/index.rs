// Relationship index for the correction passes.
//
// Built fresh for every run from the document's flat link lists:
// 1. id -> position in `subjects`
// 2. couple key -> record with its children and fetus entries
// 3. subject -> couples it is a partner in (for subtree discovery)
// 4. child -> the couple that lists it (for lineage ordering)
//
// Links that point at unknown couples are left out; they still reach the
// output by direct id reference.

use std::collections::HashMap;

use crate::document::{CoupleKey, RawDocument, SubjectId};

/// Everything the passes need to know about one couple.
#[derive(Debug, Clone, PartialEq)]
pub struct CoupleRecord {
    pub key: CoupleKey,
    pub husband: SubjectId,
    pub wife: SubjectId,
    /// Person children, in link order, without duplicates.
    pub children: Vec<SubjectId>,
    /// Indices into the document's fetus list.
    pub fetuses: Vec<usize>,
    /// Position among distinct couples in input order (tie-breaker).
    pub order: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    subjects: HashMap<SubjectId, usize>,
    couples: Vec<CoupleRecord>,
    by_key: HashMap<CoupleKey, usize>,
    by_partner: HashMap<SubjectId, Vec<usize>>,
    parents: HashMap<SubjectId, usize>,
}

impl RelationshipIndex {
    pub fn build(doc: &RawDocument) -> Self {
        let mut subjects: HashMap<SubjectId, usize> = HashMap::with_capacity(doc.subjects.len());
        for (idx, subject) in doc.subjects.iter().enumerate() {
            // First occurrence wins if a producer repeats an id
            subjects.entry(subject.id).or_insert(idx);
        }

        let mut couples: Vec<CoupleRecord> = Vec::new();
        let mut by_key: HashMap<CoupleKey, usize> = HashMap::new();
        let mut by_partner: HashMap<SubjectId, Vec<usize>> = HashMap::new();

        for link in &doc.couples {
            let key = link.key();
            if by_key.contains_key(&key) {
                continue;
            }
            let order = couples.len();
            by_key.insert(key, order);
            by_partner.entry(link.husband).or_default().push(order);
            if link.wife != link.husband {
                by_partner.entry(link.wife).or_default().push(order);
            }
            couples.push(CoupleRecord {
                key,
                husband: link.husband,
                wife: link.wife,
                children: Vec::new(),
                fetuses: Vec::new(),
                order,
            });
        }

        let mut parents: HashMap<SubjectId, usize> = HashMap::new();
        for link in &doc.children {
            let Some(&ci) = link.parent_key().and_then(|key| by_key.get(&key)) else {
                log::trace!("child {} has no matching couple", link.child.0);
                continue;
            };
            parents.entry(link.child).or_insert(ci);
            let record = &mut couples[ci];
            if !record.children.contains(&link.child) {
                record.children.push(link.child);
            }
        }

        for (fi, entry) in doc.fetus.iter().enumerate() {
            let Some(&ci) = entry.parent_key().and_then(|key| by_key.get(&key)) else {
                log::trace!("fetus #{fi} has no matching couple");
                continue;
            };
            couples[ci].fetuses.push(fi);
        }

        Self { subjects, couples, by_key, by_partner, parents }
    }

    /// Position of a subject in the document's subject list.
    pub fn subject_index(&self, id: SubjectId) -> Option<usize> {
        self.subjects.get(&id).copied()
    }

    pub fn couples(&self) -> &[CoupleRecord] {
        &self.couples
    }

    pub fn couple(&self, key: CoupleKey) -> Option<&CoupleRecord> {
        self.by_key.get(&key).map(|&ci| &self.couples[ci])
    }

    /// Couples (by position in `couples()`) in which `id` is a partner.
    pub fn couples_of(&self, id: SubjectId) -> &[usize] {
        self.by_partner.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The couple `id` is a child of. The first link wins.
    pub fn parent_couple(&self, id: SubjectId) -> Option<usize> {
        self.parents.get(&id).copied()
    }
}
