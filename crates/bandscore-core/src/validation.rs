//! Submit-time validation of the form draft.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::draft::FormDraft;
use crate::model::{ScorePayload, ScoreSchema, Skill, MAX_SCORE, MIN_SCORE};

/// Why a draft was refused at submit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    BlankName,

    #[error("{} is required", .0.label())]
    MissingScore(Skill),

    #[error("{} must be a number, got {raw:?}", .skill.label())]
    NotANumber { skill: Skill, raw: String },

    #[error(
        "{} must be between {min} and {max}, got {value}",
        .skill.label(),
        min = MIN_SCORE,
        max = MAX_SCORE
    )]
    OutOfRange { skill: Skill, value: f64 },
}

impl ValidationError {
    /// Warning shown to the user when a submit is refused.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::BlankName | ValidationError::MissingScore(_) => {
                format!("Please fill in every field: {self}.")
            }
            _ => format!("All scores must be between {MIN_SCORE} and {MAX_SCORE} ({self})."),
        }
    }
}

/// Check a draft against the schema and build the request body.
///
/// Every schema skill must hold a finite number in `[0, 75]`; the first
/// offending field is reported.
pub fn validate_draft(
    draft: &FormDraft,
    schema: &ScoreSchema,
) -> Result<ScorePayload, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankName);
    }

    let mut scores = BTreeMap::new();
    for skill in schema.skills() {
        let raw = draft.field(*skill).unwrap_or("").trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingScore(*skill));
        }
        let value = parse_score(*skill, raw)?;
        scores.insert(*skill, value);
    }

    Ok(ScorePayload {
        name: name.to_string(),
        scores,
    })
}

fn parse_score(skill: Skill, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw.parse().map_err(|_| ValidationError::NotANumber {
        skill,
        raw: raw.to_string(),
    })?;
    if value.is_nan() {
        return Err(ValidationError::NotANumber {
            skill,
            raw: raw.to_string(),
        });
    }
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(ValidationError::OutOfRange { skill, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(schema: &ScoreSchema, name: &str, values: &[(&str, &str)]) -> FormDraft {
        let mut d = FormDraft::empty(schema);
        d.set("name", name).unwrap();
        for (field, value) in values {
            d.set(field, *value).unwrap();
        }
        d
    }

    #[test]
    fn accepts_boundaries() {
        let schema = ScoreSchema::full();
        let d = draft(
            &schema,
            "Aziz",
            &[
                ("listening", "0"),
                ("reading", "75"),
                ("speaking", "37.5"),
                ("writing", " 40 "),
            ],
        );
        let payload = validate_draft(&d, &schema).unwrap();
        assert_eq!(payload.name, "Aziz");
        assert_eq!(payload.scores[&Skill::Listening], 0.0);
        assert_eq!(payload.scores[&Skill::Reading], 75.0);
        assert_eq!(payload.scores[&Skill::Writing], 40.0);
    }

    #[test]
    fn rejects_above_max() {
        let schema = ScoreSchema::receptive();
        let d = draft(&schema, "A", &[("listening", "80"), ("reading", "55")]);
        assert_eq!(
            validate_draft(&d, &schema),
            Err(ValidationError::OutOfRange {
                skill: Skill::Listening,
                value: 80.0
            })
        );
    }

    #[test]
    fn rejects_negative() {
        let schema = ScoreSchema::receptive();
        let d = draft(&schema, "A", &[("listening", "10"), ("reading", "-0.5")]);
        assert!(matches!(
            validate_draft(&d, &schema),
            Err(ValidationError::OutOfRange {
                skill: Skill::Reading,
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan_and_text() {
        let schema = ScoreSchema::receptive();
        for raw in ["NaN", "abc", "6o"] {
            let d = draft(&schema, "A", &[("listening", raw), ("reading", "5")]);
            assert!(
                matches!(
                    validate_draft(&d, &schema),
                    Err(ValidationError::NotANumber { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_infinity_as_out_of_range() {
        let schema = ScoreSchema::receptive();
        let d = draft(&schema, "A", &[("listening", "inf"), ("reading", "5")]);
        assert!(matches!(
            validate_draft(&d, &schema),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let schema = ScoreSchema::full();
        let d = draft(&schema, "A", &[("listening", "10"), ("reading", "5")]);
        assert_eq!(
            validate_draft(&d, &schema),
            Err(ValidationError::MissingScore(Skill::Speaking))
        );

        let d = draft(&schema, "   ", &[]);
        assert_eq!(validate_draft(&d, &schema), Err(ValidationError::BlankName));
    }

    #[test]
    fn payload_only_carries_schema_skills() {
        let schema = ScoreSchema::receptive();
        let d = draft(&schema, " Bob ", &[("listening", "10"), ("reading", "5")]);
        let payload = validate_draft(&d, &schema).unwrap();
        assert_eq!(payload.name, "Bob");
        assert_eq!(payload.scores.len(), 2);
    }

    #[test]
    fn user_message_mentions_range() {
        let err = ValidationError::OutOfRange {
            skill: Skill::Listening,
            value: 80.0,
        };
        assert_eq!(
            err.user_message(),
            "All scores must be between 0 and 75 (Listening must be between 0 and 75, got 80)."
        );
    }
}
