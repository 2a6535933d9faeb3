//! Answer envelopes and assembly of the brief document.
//!
//! Responses are stored schema-free, but before they are frozen into a
//! brief every value must fit one of the [`Answers`] shapes. Anything else
//! is a validation failure naming the offending step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::project::ProjectCategory;
use crate::steps::{progress_percent, step_position, total_steps, validate_step_key};
use crate::types::{DbId, Timestamp};

/// Maximum nesting depth of [`Answers::Map`] values.
pub const MAX_ANSWER_DEPTH: usize = 4;

/// Version assigned to a project's first brief.
pub const INITIAL_BRIEF_VERSION: i32 = 1;

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// The shapes a questionnaire answer may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answers {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, Answers>),
}

impl Answers {
    /// Interpret a stored JSON value, enforcing shape and depth.
    pub fn from_value(step_key: &str, value: serde_json::Value) -> Result<Self, CoreError> {
        let answers: Answers = serde_json::from_value(value).map_err(|_| {
            CoreError::Validation(format!(
                "Answers for step '{step_key}' must be text, a list of text, or a nested map"
            ))
        })?;
        answers.validate(step_key)?;
        Ok(answers)
    }

    /// Enforce [`MAX_ANSWER_DEPTH`] on an already-typed answer.
    pub fn validate(&self, step_key: &str) -> Result<(), CoreError> {
        if self.depth() > MAX_ANSWER_DEPTH {
            return Err(CoreError::Validation(format!(
                "Answers for step '{step_key}' nest deeper than {MAX_ANSWER_DEPTH} levels"
            )));
        }
        Ok(())
    }

    fn depth(&self) -> usize {
        match self {
            Answers::Text(_) | Answers::List(_) => 0,
            Answers::Map(map) => 1 + map.values().map(Answers::depth).max().unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Brief content
// ---------------------------------------------------------------------------

/// Who answered the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentIdentity {
    pub email: String,
    pub account_id: Option<DbId>,
}

/// A revision question and its answer, appended when a brief is regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredRevision {
    pub request_id: DbId,
    pub step_key: String,
    pub field_key: Option<String>,
    pub question: String,
    pub response: String,
    pub responded_at: Timestamp,
}

/// Project-level facts copied into the brief at submission time.
#[derive(Debug, Clone)]
pub struct BriefHeader {
    pub title: String,
    pub category: ProjectCategory,
    pub respondent: RespondentIdentity,
    pub submitted_at: Timestamp,
}

/// The structured, immutable body of a brief version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefContent {
    pub title: String,
    pub category: ProjectCategory,
    pub respondent: RespondentIdentity,
    /// Step key → answers.
    pub steps: BTreeMap<String, Answers>,
    /// Answered step keys in questionnaire order.
    pub step_order: Vec<String>,
    pub answered_steps: usize,
    pub total_steps: usize,
    pub submitted_at: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<AnsweredRevision>,
}

impl BriefContent {
    /// Share of the questionnaire answered when the brief was frozen.
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.answered_steps)
    }
}

/// Merge per-step responses into one brief body.
///
/// Step keys are unique per project, so this is a plain merge; if the same
/// key does appear twice the later entry wins.
pub fn assemble_brief<I>(header: BriefHeader, responses: I) -> Result<BriefContent, CoreError>
where
    I: IntoIterator<Item = (String, serde_json::Value)>,
{
    let mut steps = BTreeMap::new();
    for (step_key, value) in responses {
        validate_step_key(&step_key)?;
        let answers = Answers::from_value(&step_key, value)?;
        steps.insert(step_key, answers);
    }

    let mut step_order: Vec<String> = steps.keys().cloned().collect();
    step_order.sort_by_key(|k| step_position(k).unwrap_or(usize::MAX));

    Ok(BriefContent {
        title: header.title,
        category: header.category,
        respondent: header.respondent,
        answered_steps: steps.len(),
        total_steps: total_steps(),
        steps,
        step_order,
        submitted_at: header.submitted_at,
        revisions: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use serde_json::json;

    fn header() -> BriefHeader {
        BriefHeader {
            title: "Acme".to_string(),
            category: ProjectCategory::Branding,
            respondent: RespondentIdentity {
                email: "client@example.com".to_string(),
                account_id: None,
            },
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn accepts_the_three_shapes() {
        assert_eq!(
            Answers::from_value("s", json!("hello")).unwrap(),
            Answers::Text("hello".into())
        );
        assert_eq!(
            Answers::from_value("s", json!(["a", "b"])).unwrap(),
            Answers::List(vec!["a".into(), "b".into()])
        );
        assert_matches!(
            Answers::from_value("s", json!({"name": "Acme", "tags": ["x"]})),
            Ok(Answers::Map(_))
        );
    }

    #[test]
    fn rejects_other_shapes() {
        for value in [json!(42), json!(true), json!(null), json!([1, 2])] {
            let err = Answers::from_value("business_info", value).unwrap_err();
            assert!(err.to_string().contains("business_info"));
        }
    }

    #[test]
    fn rejects_excessive_nesting() {
        let deep = json!({"a": {"b": {"c": {"d": {"e": "too deep"}}}}});
        assert_matches!(
            Answers::from_value("s", deep),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn typed_answers_are_depth_checked() {
        let mut nested = Answers::Text("leaf".into());
        for level in 0..=MAX_ANSWER_DEPTH {
            nested = Answers::Map(BTreeMap::from([(format!("l{level}"), nested)]));
        }
        let err = nested.validate("visual_preferences").unwrap_err();
        assert!(err.to_string().contains("visual_preferences"));

        let shallow = Answers::Map(BTreeMap::from([("k".to_string(), Answers::Text("v".into()))]));
        assert!(shallow.validate("visual_preferences").is_ok());
    }

    #[test]
    fn assembles_in_questionnaire_order() {
        let brief = assemble_brief(
            header(),
            vec![
                ("typography".to_string(), json!("serif")),
                ("business_info".to_string(), json!({"name": "Acme"})),
                ("competitors".to_string(), json!(["Globex"])),
            ],
        )
        .unwrap();

        assert_eq!(brief.answered_steps, 3);
        assert_eq!(brief.total_steps, 10);
        assert_eq!(brief.progress_percent(), 30);
        assert_eq!(
            brief.step_order,
            vec!["business_info", "typography", "competitors"]
        );
        assert!(brief.revisions.is_empty());
    }

    #[test]
    fn later_duplicate_step_wins() {
        let brief = assemble_brief(
            header(),
            vec![
                ("typography".to_string(), json!("serif")),
                ("typography".to_string(), json!("sans")),
            ],
        )
        .unwrap();
        assert_eq!(brief.answered_steps, 1);
        assert_eq!(brief.steps["typography"], Answers::Text("sans".into()));
    }

    #[test]
    fn unknown_step_fails_assembly() {
        let result = assemble_brief(header(), vec![("nope".to_string(), json!("x"))]);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_revisions_are_omitted_from_json() {
        let brief = assemble_brief(header(), Vec::new()).unwrap();
        let value = serde_json::to_value(&brief).unwrap();
        assert!(value.get("revisions").is_none());
        assert_eq!(value["category"], "branding");
    }
}
