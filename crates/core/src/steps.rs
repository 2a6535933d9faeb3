//! The fixed questionnaire step vocabulary.

use crate::error::CoreError;

pub const STEP_BUSINESS_INFO: &str = "business_info";
pub const STEP_PROJECT_GOALS: &str = "project_goals";
pub const STEP_TARGET_AUDIENCE: &str = "target_audience";
pub const STEP_BRAND_PERSONALITY: &str = "brand_personality";
pub const STEP_VISUAL_PREFERENCES: &str = "visual_preferences";
pub const STEP_COLOR_PALETTE: &str = "color_palette";
pub const STEP_TYPOGRAPHY: &str = "typography";
pub const STEP_COMPETITORS: &str = "competitors";
pub const STEP_DELIVERABLES: &str = "deliverables";
pub const STEP_TIMELINE_BUDGET: &str = "timeline_budget";

/// All step keys in questionnaire order.
pub const STEP_KEYS: &[&str] = &[
    STEP_BUSINESS_INFO,
    STEP_PROJECT_GOALS,
    STEP_TARGET_AUDIENCE,
    STEP_BRAND_PERSONALITY,
    STEP_VISUAL_PREFERENCES,
    STEP_COLOR_PALETTE,
    STEP_TYPOGRAPHY,
    STEP_COMPETITORS,
    STEP_DELIVERABLES,
    STEP_TIMELINE_BUDGET,
];

/// Number of steps in the questionnaire.
pub fn total_steps() -> usize {
    STEP_KEYS.len()
}

/// Whole-percent share of the questionnaire covered by `answered` steps,
/// rounded down and capped at 100.
pub fn progress_percent(answered: usize) -> u8 {
    let pct = answered.min(total_steps()) * 100 / total_steps();
    u8::try_from(pct).unwrap_or(100)
}

/// Validate that a step key belongs to the vocabulary.
pub fn validate_step_key(step_key: &str) -> Result<(), CoreError> {
    if step_key.is_empty() {
        return Err(CoreError::Validation(
            "Step key must not be empty".to_string(),
        ));
    }
    if STEP_KEYS.contains(&step_key) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown step '{step_key}'. Must be one of: {}",
            STEP_KEYS.join(", ")
        )))
    }
}

/// Questionnaire position of a step, used to order brief sections.
pub fn step_position(step_key: &str) -> Option<usize> {
    STEP_KEYS.iter().position(|k| *k == step_key)
}
