//! Shared response envelope types for API handlers.
//!
//! Every success body is `{ "data": ... }`, whether it goes to an owner, a
//! respondent on the portal, or a visitor holding a share link. Build it
//! with [`DataResponse`] rather than `serde_json::json!({ "data": ... })` so
//! the payload type is checked at compile time.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Error bodies never use it; those are rendered by
/// [`AppError`](crate::error::AppError) as `{ "error", "code" }`.
///
/// # Example
///
/// ```ignore
/// let brief = SubmissionPipeline::submit(&state.workflow, &actor, id).await?;
/// Ok(Json(DataResponse { data: brief }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_is_wrapped_under_data() {
        let body = serde_json::to_value(DataResponse {
            data: json!({"announced_assets": 2}),
        })
        .unwrap();
        assert_eq!(body, json!({"data": {"announced_assets": 2}}));
    }
}
