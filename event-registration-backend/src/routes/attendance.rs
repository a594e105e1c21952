use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum_extra::extract::WithRejection;
use event_registration_database::{attendance, Pool};

use crate::error::AppError;
use crate::session::RequireAdmin;

pub async fn mark_attendance(
    _admin: RequireAdmin,
    State(pool): State<Pool>,
    WithRejection(Path(reg_id), _): WithRejection<Path<i32>, AppError>,
) -> Result<StatusCode, AppError> {
    let mut connection = pool.get().await?;
    attendance::mark_present(&mut connection, reg_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
