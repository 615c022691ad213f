//! The create/edit form buffer.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{ScoreRecord, ScoreSchema, Skill};

/// Errors raised by form operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The form is not open.
    #[error("the form is not open")]
    Closed,

    /// The field is neither `name` nor one of the schema skills.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Only records that came from the backend can be edited.
    #[error("record \"{0}\" has no id and cannot be edited")]
    MissingId(String),

    /// No record with this id is in the store.
    #[error("no record with id {0}")]
    NotFound(String),
}

/// Unvalidated form contents: a name plus one raw text value per skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    fields: BTreeMap<Skill, String>,
}

impl FormDraft {
    /// An empty draft with a blank field for every schema skill.
    pub fn empty(schema: &ScoreSchema) -> Self {
        Self {
            name: String::new(),
            fields: schema
                .skills()
                .iter()
                .map(|s| (*s, String::new()))
                .collect(),
        }
    }

    /// A draft holding the editable fields of `record`.
    ///
    /// Scores the record lacks become blank fields.
    pub fn from_record(record: &ScoreRecord, schema: &ScoreSchema) -> Self {
        Self {
            name: record.name.clone(),
            fields: schema
                .skills()
                .iter()
                .map(|s| {
                    let raw = record
                        .score(*s)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    (*s, raw)
                })
                .collect(),
        }
    }

    /// Set a field by its form name. No validation happens here.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        if field == "name" {
            self.name = value.into();
            return Ok(());
        }
        let skill: Skill = field
            .parse()
            .map_err(|_| FormError::UnknownField(field.to_string()))?;
        match self.fields.get_mut(&skill) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(FormError::UnknownField(field.to_string())),
        }
    }

    /// Raw text for a skill, if the skill is part of this draft.
    pub fn field(&self, skill: Skill) -> Option<&str> {
        self.fields.get(&skill).map(String::as_str)
    }

    /// `(skill, raw value)` pairs, Listening first.
    pub fn fields(&self) -> impl Iterator<Item = (Skill, &str)> {
        self.fields.iter().map(|(s, v)| (*s, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.fields.values().all(String::is_empty)
    }
}
