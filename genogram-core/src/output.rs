//! Output types for the diagram renderer.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! draws them as-is. Every coordinate here has already been corrected.

use serde::Serialize;

use crate::document::vocab::{ChildStatus, FetusStatus, Gender, LifeStatus, PartnerStatus};
use crate::document::SubjectId;
use crate::layout::Generation;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Person,
    Fetus,
}

/// A subject ready for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOutput {
    pub id: String,
    pub kind: NodeKind,
    /// Producer id, absent for nodes built from fetus entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    pub x: f64,
    pub y: f64,
    pub generation: Generation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub gender: Gender,
    pub life_status: LifeStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub illnesses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetus_status: Option<FetusStatus>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Partner,
    Child,
    Relation,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EdgeStatus {
    Partner(PartnerStatus),
    Child(ChildStatus),
    Fetus(FetusStatus),
}

/// A connection between two outputs.
///
/// `to` is always a node. `from` is a node, except for child connections
/// hanging from a couple, where it is that couple's partner connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeOutput {
    pub id: String,
    pub kind: EdgeKind,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EdgeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// The combined output sent to the frontend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagramOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl DiagramOutput {
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(ErrorInfo { message: message.into() }),
            ..Self::default()
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeOutput> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_for_subject(&self, subject: SubjectId) -> Option<&NodeOutput> {
        self.nodes.iter().find(|n| n.subject_id == Some(subject))
    }
}
