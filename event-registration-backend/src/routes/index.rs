use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

use crate::error::AppError;
use crate::session::Session;
use crate::templating::Templates;

#[derive(Serialize)]
struct Home {}

pub async fn index(
    State(templates): State<Arc<Templates>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    templates.render("home", session.identity(), Home {})
}
