use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier assigned to a subject by the upstream producer.
/// Unique within a document, not necessarily contiguous.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    #[default]
    Person,
    Fetus,
}

/// A year as the producer wrote it: either a bare number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

/// Illness field: a single (possibly delimited) string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    One(String),
    Many(Vec<String>),
}

/// A person or unborn fetus with producer-assigned coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    #[serde(default)]
    pub kind: SubjectKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Life status ("alive", "deceased", ...)
    #[serde(default, rename = "status", alias = "lifeStatus", alias = "life_status", skip_serializing_if = "Option::is_none")]
    pub life_status: Option<String>,
    #[serde(default, alias = "birthYear", skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<YearValue>,
    #[serde(default, alias = "deathYear", skip_serializing_if = "Option::is_none")]
    pub death_year: Option<YearValue>,
    #[serde(default, alias = "illnesses", skip_serializing_if = "Option::is_none")]
    pub illness: Option<TextList>,
    /// Any other producer fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subject {
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        Self {
            id: SubjectId(id),
            kind: SubjectKind::Person,
            x,
            y,
            name: None,
            gender: None,
            life_status: None,
            birth_year: None,
            death_year: None,
            illness: None,
            extra: Map::new(),
        }
    }
}

/// `[idA, idB, status?]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CoupleRepr", into = "CoupleRepr")]
pub struct CoupleLink {
    pub husband: SubjectId,
    pub wife: SubjectId,
    pub status: Option<String>,
}

impl CoupleLink {
    pub fn new(husband: i64, wife: i64) -> Self {
        Self { husband: SubjectId(husband), wife: SubjectId(wife), status: None }
    }

    pub fn key(&self) -> CoupleKey {
        CoupleKey(self.husband, self.wife)
    }
}

/// Ordered `(husband, wife)` pair identifying a couple.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoupleKey(pub SubjectId, pub SubjectId);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CoupleRepr {
    Full(SubjectId, SubjectId, Option<String>),
    Pair(SubjectId, SubjectId),
}

impl From<CoupleRepr> for CoupleLink {
    fn from(repr: CoupleRepr) -> Self {
        match repr {
            CoupleRepr::Full(husband, wife, status) => Self { husband, wife, status },
            CoupleRepr::Pair(husband, wife) => Self { husband, wife, status: None },
        }
    }
}

impl From<CoupleLink> for CoupleRepr {
    fn from(link: CoupleLink) -> Self {
        match link.status {
            Some(status) => CoupleRepr::Full(link.husband, link.wife, Some(status)),
            None => CoupleRepr::Pair(link.husband, link.wife),
        }
    }
}

/// `[fatherId|null, motherId|null, childId, status?]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChildRepr", into = "ChildRepr")]
pub struct ChildLink {
    pub father: Option<SubjectId>,
    pub mother: Option<SubjectId>,
    pub child: SubjectId,
    pub status: Option<String>,
}

impl ChildLink {
    pub fn new(father: Option<i64>, mother: Option<i64>, child: i64) -> Self {
        Self {
            father: father.map(SubjectId),
            mother: mother.map(SubjectId),
            child: SubjectId(child),
            status: None,
        }
    }

    /// Couple key this link hangs from, if both parents are named.
    pub fn parent_key(&self) -> Option<CoupleKey> {
        Some(CoupleKey(self.father?, self.mother?))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ChildRepr {
    Full(Option<SubjectId>, Option<SubjectId>, SubjectId, Option<String>),
    Short(Option<SubjectId>, Option<SubjectId>, SubjectId),
}

impl From<ChildRepr> for ChildLink {
    fn from(repr: ChildRepr) -> Self {
        match repr {
            ChildRepr::Full(father, mother, child, status) => Self { father, mother, child, status },
            ChildRepr::Short(father, mother, child) => Self { father, mother, child, status: None },
        }
    }
}

impl From<ChildLink> for ChildRepr {
    fn from(link: ChildLink) -> Self {
        match link.status {
            Some(status) => ChildRepr::Full(link.father, link.mother, link.child, Some(status)),
            None => ChildRepr::Short(link.father, link.mother, link.child),
        }
    }
}

/// A fetus entry. `Pending` is what the producer writes (`[father, mother, status]`);
/// `Placed` carries the coordinates the fetus placer derived (`[father, mother, status, x, y]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FetusRepr", into = "FetusRepr")]
pub enum FetusEntry {
    Pending {
        father: Option<SubjectId>,
        mother: Option<SubjectId>,
        status: String,
    },
    Placed {
        father: Option<SubjectId>,
        mother: Option<SubjectId>,
        status: String,
        x: f64,
        y: f64,
    },
}

impl FetusEntry {
    pub fn pending(father: Option<i64>, mother: Option<i64>, status: &str) -> Self {
        FetusEntry::Pending {
            father: father.map(SubjectId),
            mother: mother.map(SubjectId),
            status: status.to_string(),
        }
    }

    pub fn father(&self) -> Option<SubjectId> {
        match self {
            FetusEntry::Pending { father, .. } | FetusEntry::Placed { father, .. } => *father,
        }
    }

    pub fn mother(&self) -> Option<SubjectId> {
        match self {
            FetusEntry::Pending { mother, .. } | FetusEntry::Placed { mother, .. } => *mother,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            FetusEntry::Pending { status, .. } | FetusEntry::Placed { status, .. } => status,
        }
    }

    pub fn parent_key(&self) -> Option<CoupleKey> {
        Some(CoupleKey(self.father()?, self.mother()?))
    }

    /// Coordinates, once placed.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            FetusEntry::Placed { x, y, .. } => Some((*x, *y)),
            FetusEntry::Pending { .. } => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, FetusEntry::Placed { .. })
    }

    /// Move an already placed fetus. Pending entries are left alone.
    pub(crate) fn set_position(&mut self, new_x: f64, new_y: f64) {
        if let FetusEntry::Placed { x, y, .. } = self {
            *x = new_x;
            *y = new_y;
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FetusRepr {
    Placed(Option<SubjectId>, Option<SubjectId>, String, f64, f64),
    Pending(Option<SubjectId>, Option<SubjectId>, String),
}

impl From<FetusRepr> for FetusEntry {
    fn from(repr: FetusRepr) -> Self {
        match repr {
            FetusRepr::Placed(father, mother, status, x, y) => {
                FetusEntry::Placed { father, mother, status, x, y }
            }
            FetusRepr::Pending(father, mother, status) => FetusEntry::Pending { father, mother, status },
        }
    }
}

impl From<FetusEntry> for FetusRepr {
    fn from(entry: FetusEntry) -> Self {
        match entry {
            FetusEntry::Placed { father, mother, status, x, y } => {
                FetusRepr::Placed(father, mother, status, x, y)
            }
            FetusEntry::Pending { father, mother, status } => FetusRepr::Pending(father, mother, status),
        }
    }
}

/// `[idA, idB, description]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RelationRepr", into = "RelationRepr")]
pub struct RelationLink {
    pub a: SubjectId,
    pub b: SubjectId,
    pub description: String,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RelationRepr {
    Described(SubjectId, SubjectId, String),
    Bare(SubjectId, SubjectId),
}

impl From<RelationRepr> for RelationLink {
    fn from(repr: RelationRepr) -> Self {
        match repr {
            RelationRepr::Described(a, b, description) => Self { a, b, description },
            RelationRepr::Bare(a, b) => Self { a, b, description: String::new() },
        }
    }
}

impl From<RelationLink> for RelationRepr {
    fn from(link: RelationLink) -> Self {
        RelationRepr::Described(link.a, link.b, link.description)
    }
}

/// The raw document as produced upstream (and, after correction, handed back
/// in the same shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub couples: Vec<CoupleLink>,
    #[serde(default)]
    pub children: Vec<ChildLink>,
    #[serde(default)]
    pub fetus: Vec<FetusEntry>,
    #[serde(default)]
    pub relations: Vec<RelationLink>,
}
