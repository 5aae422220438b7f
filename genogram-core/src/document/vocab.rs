//! Controlled vocabularies for the free-text fields a producer writes.
//!
//! Every lookup is case-insensitive and trims whitespace. Anything not in a
//! registry maps to the `Unknown` variant; nothing here fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::types::{TextList, YearValue};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStatus {
    Alive,
    Deceased,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Married,
    Divorced,
    Separated,
    Engaged,
    Cohabiting,
    Widowed,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildStatus {
    Biological,
    Adopted,
    Foster,
    Step,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetusStatus {
    Pregnancy,
    Miscarriage,
    Abortion,
    Stillbirth,
    Unknown,
}

// ============================================================================
// Registries: (spelling, canonical value)
// ============================================================================

pub const GENDER_REGISTRY: &[(&str, Gender)] = &[
    ("male", Gender::Male),
    ("m", Gender::Male),
    ("man", Gender::Male),
    ("boy", Gender::Male),
    ("男", Gender::Male),
    ("female", Gender::Female),
    ("f", Gender::Female),
    ("woman", Gender::Female),
    ("girl", Gender::Female),
    ("女", Gender::Female),
];

pub const LIFE_STATUS_REGISTRY: &[(&str, LifeStatus)] = &[
    ("alive", LifeStatus::Alive),
    ("living", LifeStatus::Alive),
    ("健在", LifeStatus::Alive),
    ("在世", LifeStatus::Alive),
    ("dead", LifeStatus::Deceased),
    ("deceased", LifeStatus::Deceased),
    ("died", LifeStatus::Deceased),
    ("去世", LifeStatus::Deceased),
    ("已故", LifeStatus::Deceased),
];

pub const PARTNER_STATUS_REGISTRY: &[(&str, PartnerStatus)] = &[
    ("married", PartnerStatus::Married),
    ("marriage", PartnerStatus::Married),
    ("结婚", PartnerStatus::Married),
    ("已婚", PartnerStatus::Married),
    ("divorced", PartnerStatus::Divorced),
    ("divorce", PartnerStatus::Divorced),
    ("离婚", PartnerStatus::Divorced),
    ("separated", PartnerStatus::Separated),
    ("separation", PartnerStatus::Separated),
    ("分居", PartnerStatus::Separated),
    ("engaged", PartnerStatus::Engaged),
    ("订婚", PartnerStatus::Engaged),
    ("cohabiting", PartnerStatus::Cohabiting),
    ("cohabitation", PartnerStatus::Cohabiting),
    ("同居", PartnerStatus::Cohabiting),
    ("widowed", PartnerStatus::Widowed),
    ("丧偶", PartnerStatus::Widowed),
];

pub const CHILD_STATUS_REGISTRY: &[(&str, ChildStatus)] = &[
    ("biological", ChildStatus::Biological),
    ("natural", ChildStatus::Biological),
    ("亲生", ChildStatus::Biological),
    ("adopted", ChildStatus::Adopted),
    ("adoption", ChildStatus::Adopted),
    ("领养", ChildStatus::Adopted),
    ("收养", ChildStatus::Adopted),
    ("foster", ChildStatus::Foster),
    ("寄养", ChildStatus::Foster),
    ("step", ChildStatus::Step),
    ("stepchild", ChildStatus::Step),
    ("继子女", ChildStatus::Step),
];

pub const FETUS_STATUS_REGISTRY: &[(&str, FetusStatus)] = &[
    ("pregnancy", FetusStatus::Pregnancy),
    ("pregnant", FetusStatus::Pregnancy),
    ("怀孕", FetusStatus::Pregnancy),
    ("miscarriage", FetusStatus::Miscarriage),
    ("流产", FetusStatus::Miscarriage),
    ("abortion", FetusStatus::Abortion),
    ("induced abortion", FetusStatus::Abortion),
    ("人工流产", FetusStatus::Abortion),
    ("stillbirth", FetusStatus::Stillbirth),
    ("stillborn", FetusStatus::Stillbirth),
    ("死产", FetusStatus::Stillbirth),
];

/// Illness synonyms collapsed onto one label.
pub const ILLNESS_REGISTRY: &[(&str, &str)] = &[
    ("diabetes", "diabetes"),
    ("diabetes mellitus", "diabetes"),
    ("糖尿病", "diabetes"),
    ("hypertension", "hypertension"),
    ("high blood pressure", "hypertension"),
    ("高血压", "hypertension"),
    ("cancer", "cancer"),
    ("癌症", "cancer"),
    ("heart disease", "heart disease"),
    ("cardiac disease", "heart disease"),
    ("心脏病", "heart disease"),
    ("stroke", "stroke"),
    ("中风", "stroke"),
    ("depression", "depression"),
    ("抑郁症", "depression"),
    ("alcoholism", "alcohol abuse"),
    ("alcohol abuse", "alcohol abuse"),
    ("酗酒", "alcohol abuse"),
    ("substance abuse", "substance abuse"),
    ("drug abuse", "substance abuse"),
    ("dementia", "dementia"),
    ("alzheimer's", "dementia"),
    ("阿尔茨海默病", "dementia"),
];

fn lookup<T: Copy>(registry: &[(&str, T)], raw: Option<&str>, fallback: T) -> T {
    let Some(raw) = raw else {
        return fallback;
    };
    let key = raw.trim().to_lowercase();
    registry
        .iter()
        .find(|(spelling, _)| *spelling == key)
        .map(|(_, value)| *value)
        .unwrap_or(fallback)
}

pub fn gender_from(raw: Option<&str>) -> Gender {
    lookup(GENDER_REGISTRY, raw, Gender::Unknown)
}

pub fn life_status_from(raw: Option<&str>) -> LifeStatus {
    lookup(LIFE_STATUS_REGISTRY, raw, LifeStatus::Unknown)
}

pub fn partner_status_from(raw: Option<&str>) -> PartnerStatus {
    lookup(PARTNER_STATUS_REGISTRY, raw, PartnerStatus::Unknown)
}

pub fn child_status_from(raw: Option<&str>) -> ChildStatus {
    lookup(CHILD_STATUS_REGISTRY, raw, ChildStatus::Unknown)
}

pub fn fetus_status_from(raw: Option<&str>) -> FetusStatus {
    lookup(FETUS_STATUS_REGISTRY, raw, FetusStatus::Unknown)
}

static ILLNESS_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;/，；、]").unwrap());

/// Split, canonicalize and dedupe an illness field. Unknown illnesses pass
/// through trimmed.
pub fn illnesses_from(raw: Option<&TextList>) -> Vec<String> {
    let pieces: Vec<&str> = match raw {
        None => return Vec::new(),
        Some(TextList::One(text)) => ILLNESS_SEPARATOR_RE.split(text).collect(),
        Some(TextList::Many(items)) => items.iter().map(String::as_str).collect(),
    };

    let mut out: Vec<String> = Vec::new();
    for piece in pieces {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        let label = ILLNESS_REGISTRY
            .iter()
            .find(|(spelling, _)| *spelling == key)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or_else(|| trimmed.to_string());
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\D)([12]\d{3})(?:\D|$)").unwrap());

/// Pull a four digit year out of whatever the producer wrote.
pub fn year_from(raw: Option<&YearValue>) -> Option<i32> {
    match raw? {
        YearValue::Number(n) if (1000..=2999).contains(n) => Some(*n as i32),
        YearValue::Number(_) => None,
        YearValue::Text(text) => YEAR_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_lookup_is_case_insensitive() {
        assert_eq!(gender_from(Some(" Male ")), Gender::Male);
        assert_eq!(gender_from(Some("F")), Gender::Female);
        assert_eq!(gender_from(Some("女")), Gender::Female);
        assert_eq!(gender_from(Some("robot")), Gender::Unknown);
        assert_eq!(gender_from(None), Gender::Unknown);
    }

    #[test]
    fn test_statuses() {
        assert_eq!(life_status_from(Some("deceased")), LifeStatus::Deceased);
        assert_eq!(partner_status_from(Some("离婚")), PartnerStatus::Divorced);
        assert_eq!(child_status_from(Some("Adopted")), ChildStatus::Adopted);
        assert_eq!(fetus_status_from(Some("pregnancy")), FetusStatus::Pregnancy);
        assert_eq!(fetus_status_from(Some("")), FetusStatus::Unknown);
    }

    #[test]
    fn test_illness_split_and_dedupe() {
        let raw = TextList::One("Diabetes, high blood pressure; diabetes mellitus、asthma".to_string());
        assert_eq!(
            illnesses_from(Some(&raw)),
            vec!["diabetes".to_string(), "hypertension".to_string(), "asthma".to_string()]
        );

        let list = TextList::Many(vec!["  Cancer ".to_string(), "".to_string()]);
        assert_eq!(illnesses_from(Some(&list)), vec!["cancer".to_string()]);
    }

    #[test]
    fn test_year_normalization() {
        assert_eq!(year_from(Some(&YearValue::Number(1965))), Some(1965));
        assert_eq!(year_from(Some(&YearValue::Number(65))), None);
        assert_eq!(year_from(Some(&YearValue::Text("c. 1965".to_string()))), Some(1965));
        assert_eq!(year_from(Some(&YearValue::Text("1965年".to_string()))), Some(1965));
        assert_eq!(year_from(Some(&YearValue::Text("1965-03-02".to_string()))), Some(1965));
        assert_eq!(year_from(Some(&YearValue::Text("unknown".to_string()))), None);
        assert_eq!(year_from(Some(&YearValue::Text("12345".to_string()))), None);
        assert_eq!(year_from(None), None);
    }
}
