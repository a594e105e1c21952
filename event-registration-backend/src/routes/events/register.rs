use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use axum_extra::extract::WithRejection;
use event_registration_database::registrations::{self, RegistrationOutcome};
use event_registration_database::Pool;
use serde::Deserialize;

use super::list::render_events_page;
use crate::error::AppError;
use crate::session::{RequireStudent, Session};
use crate::templating::Templates;

/// Name and email always come from the session, never from the form.
#[derive(Deserialize)]
pub struct RegisterPayload {
    event_id: i32,
}

pub async fn register(
    student: RequireStudent,
    State(pool): State<Pool>,
    State(templates): State<Arc<Templates>>,
    session: Session,
    WithRejection(Form(payload), _): WithRejection<Form<RegisterPayload>, AppError>,
) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    let outcome = registrations::register(
        &mut connection,
        &student.name,
        &student.email,
        payload.event_id,
    )
    .await?;
    let message = match outcome {
        RegistrationOutcome::Created { student, .. } => {
            Some(format!("{} registered successfully!", student.name))
        }
        RegistrationOutcome::AlreadyRegistered { .. } => None,
    };
    render_events_page(&mut connection, &templates, session.identity(), message).await
}
