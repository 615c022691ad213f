//! Core data model types for bandscore.
//!
//! These types describe a student's score record as the backend stores it,
//! and the configurable set of skills that the admin view works with.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

/// Lowest accepted band score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted band score.
pub const MAX_SCORE: f64 = 75.0;

/// Server-assigned record identifier.
///
/// The backend decides the shape; both integer and string ids are accepted
/// and echoed back verbatim in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Int(n.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl RecordId {
    /// A text id that is empty once trimmed would address the collection itself.
    pub fn is_blank(&self) -> bool {
        matches!(self, RecordId::Text(s) if s.trim().is_empty())
    }
}

/// Raised when parsing an empty or all-whitespace record id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record id must not be blank")]
pub struct BlankIdError;

impl FromStr for RecordId {
    type Err = BlankIdError;

    /// Integers parse as [`RecordId::Int`], anything else non-blank is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BlankIdError);
        }
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

/// An IELTS skill that carries a band score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Listening,
    Reading,
    Speaking,
    Writing,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Listening,
        Skill::Reading,
        Skill::Speaking,
        Skill::Writing,
    ];

    /// Field name used on the wire and in the form.
    pub fn key(self) -> &'static str {
        match self {
            Skill::Listening => "listening",
            Skill::Reading => "reading",
            Skill::Speaking => "speaking",
            Skill::Writing => "writing",
        }
    }

    /// Column header / form label.
    pub fn label(self) -> &'static str {
        match self {
            Skill::Listening => "Listening",
            Skill::Reading => "Reading",
            Skill::Speaking => "Speaking",
            Skill::Writing => "Writing",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Skill {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "listening" => Ok(Skill::Listening),
            "reading" => Ok(Skill::Reading),
            "speaking" => Ok(Skill::Speaking),
            "writing" => Ok(Skill::Writing),
            other => Err(SchemaError::UnknownSkill(other.to_string())),
        }
    }
}

/// Errors raised when building a [`ScoreSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    #[error("skill listed more than once: {0}")]
    Duplicate(Skill),

    #[error("schema must include {0}")]
    MissingRequired(Skill),
}

/// The ordered set of scored skills shown in the form and the record list.
///
/// Listening and Reading are always present; Speaking and Writing are
/// optional, which covers both the four-skill and two-skill admin views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreSchema {
    skills: Vec<Skill>,
}

impl ScoreSchema {
    pub fn new(skills: Vec<Skill>) -> Result<Self, SchemaError> {
        for (i, skill) in skills.iter().enumerate() {
            if skills[..i].contains(skill) {
                return Err(SchemaError::Duplicate(*skill));
            }
        }
        for required in [Skill::Listening, Skill::Reading] {
            if !skills.contains(&required) {
                return Err(SchemaError::MissingRequired(required));
            }
        }
        Ok(Self { skills })
    }

    /// Listening, Reading, Speaking and Writing.
    pub fn full() -> Self {
        Self {
            skills: Skill::ALL.to_vec(),
        }
    }

    /// Listening and Reading only.
    pub fn receptive() -> Self {
        Self {
            skills: vec![Skill::Listening, Skill::Reading],
        }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn contains(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }
}

impl Default for ScoreSchema {
    fn default() -> Self {
        Self::full()
    }
}

impl<'de> Deserialize<'de> for ScoreSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let skills = Vec::<Skill>::deserialize(deserializer)?;
        ScoreSchema::new(skills).map_err(serde::de::Error::custom)
    }
}

/// A student's score record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Assigned by the server on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub listening: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub reading: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub speaking: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub writing: Option<f64>,
}

impl ScoreRecord {
    /// A record with a name and no scores.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            listening: None,
            reading: None,
            speaking: None,
            writing: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_score(mut self, skill: Skill, value: f64) -> Self {
        *self.score_mut(skill) = Some(value);
        self
    }

    pub fn score(&self, skill: Skill) -> Option<f64> {
        match skill {
            Skill::Listening => self.listening,
            Skill::Reading => self.reading,
            Skill::Speaking => self.speaking,
            Skill::Writing => self.writing,
        }
    }

    fn score_mut(&mut self, skill: Skill) -> &mut Option<f64> {
        match skill {
            Skill::Listening => &mut self.listening,
            Skill::Reading => &mut self.reading,
            Skill::Speaking => &mut self.speaking,
            Skill::Writing => &mut self.writing,
        }
    }
}

/// Validated request body for create and update calls.
///
/// Only carries the skills of the active schema; never carries an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePayload {
    pub name: String,
    pub scores: BTreeMap<Skill, f64>,
}

impl ScorePayload {
    /// Wire representation: a [`ScoreRecord`] without an id.
    pub fn to_record(&self) -> ScoreRecord {
        let mut record = ScoreRecord::named(self.name.clone());
        for (skill, value) in &self.scores {
            *record.score_mut(*skill) = Some(*value);
        }
        record
    }
}

impl Serialize for ScorePayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// Display form of a score; whole numbers print without a fraction.
pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Accepts a JSON number, a numeric string, an empty string or null.
///
/// Any other string leaves the score unset so one bad row does not sink the
/// whole listing.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => None,
        Some(Raw::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!(raw = %s, "ignoring non-numeric score");
                None
            }
        },
    })
}
