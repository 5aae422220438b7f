mod error;
mod types;
pub mod vocab;

pub use error::{ConfigError, DocumentError};
pub use types::*;

/// Parse a raw document and check the caller-side precondition: at least one
/// subject, and every coordinate finite.
pub fn parse_document(input: &str) -> Result<RawDocument, DocumentError> {
    let doc: RawDocument = serde_json::from_str(input)?;
    validate_document(&doc)?;
    Ok(doc)
}

pub fn validate_document(doc: &RawDocument) -> Result<(), DocumentError> {
    if doc.subjects.is_empty() {
        return Err(DocumentError::NoSubjects);
    }
    if let Some(bad) = doc.subjects.iter().find(|s| !s.x.is_finite() || !s.y.is_finite()) {
        return Err(DocumentError::NonFiniteCoordinate { id: bad.id.0 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let input = r#"{
            "subjects": [{"id": 1, "kind": "person", "x": 0, "y": 0}],
            "couples": [],
            "children": [],
            "fetus": [],
            "relations": []
        }"#;
        let doc = parse_document(input).unwrap();
        assert_eq!(doc.subjects.len(), 1);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let doc = parse_document(r#"{"subjects": [{"id": 1, "x": 0, "y": 0}]}"#).unwrap();
        assert!(doc.couples.is_empty());
        assert!(doc.fetus.is_empty());
    }

    #[test]
    fn test_empty_subjects_rejected() {
        let err = parse_document(r#"{"subjects": []}"#).unwrap_err();
        assert!(matches!(err, DocumentError::NoSubjects));
    }

    #[test]
    fn test_missing_coordinate_rejected() {
        let err = parse_document(r#"{"subjects": [{"id": 1, "x": 0}]}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }
}
