//! Match creation options

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Caller-supplied settings for a new match. Validated before any mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_match_settings, skip_on_field_errors = false))]
pub struct CreateMatchOptions {
    pub vs_bot: bool,

    #[validate(range(min = 1, max = 25, message = "AI level must be in the range [1,25]"))]
    pub ai_level: Option<i32>,

    #[validate(range(
        min = 180,
        max = 7200,
        message = "Time limit must be in the range [180,7200] seconds"
    ))]
    pub time_limit: Option<i64>,

    #[validate(range(
        min = 5,
        max = 300,
        message = "Extra time per move must be in the range [5,300] seconds"
    ))]
    pub extra_time_per_move: Option<i64>,

    #[validate(range(
        min = 0,
        max = 1,
        message = "First side to act value must be 0 (white) or 1 (black)"
    ))]
    pub first_to_act_side: Option<i32>,
}

fn validate_match_settings(options: &CreateMatchOptions) -> Result<(), ValidationError> {
    // AI level present iff playing against the engine
    if options.vs_bot != options.ai_level.is_some() {
        let mut err = ValidationError::new("ai_settings");
        err.message = Some("AI settings are inconsistent".into());
        return Err(err);
    }

    // An increment without a base time limit is meaningless
    if options.time_limit.is_none() && options.extra_time_per_move.is_some() {
        let mut err = ValidationError::new("time_settings");
        err.message =
            Some("Extra time per move value can't be provided together with null time limit".into());
        return Err(err);
    }

    Ok(())
}
