use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Form;
use axum_extra::extract::WithRejection;
use event_registration_database::error::DatabaseError;
use event_registration_database::{feedback, registrations, Pool};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::session::RequireStudent;

#[derive(Deserialize)]
pub struct FeedbackPayload {
    rating: i32,
}

pub async fn submit_feedback(
    student: RequireStudent,
    State(pool): State<Pool>,
    WithRejection(Path(reg_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Form(payload), _): WithRejection<Form<FeedbackPayload>, AppError>,
) -> Result<StatusCode, AppError> {
    let mut connection = pool.get().await?;
    let Some(owner_email) = registrations::owner_email(&mut connection, reg_id).await? else {
        return Err(DatabaseError::NotFound {
            entity: "registration",
            id: reg_id,
        }
        .into());
    };
    if owner_email != student.email {
        warn!(reg_id, "feedback for a registration of another student");
        return Err(AppError::Forbidden);
    }
    feedback::submit(&mut connection, reg_id, payload.rating).await?;
    Ok(StatusCode::NO_CONTENT)
}
