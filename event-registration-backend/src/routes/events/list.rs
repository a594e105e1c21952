use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use event_registration_database::models::{Event, RegistrationDetails};
use event_registration_database::{events, registrations, Connection, Pool};
use serde::Serialize;

use crate::error::AppError;
use crate::session::{Identity, Session};
use crate::templating::Templates;

#[derive(Serialize)]
struct EventsPage {
    message: Option<String>,
    events: Vec<Event>,
    registrations: Vec<RegistrationDetails>,
}

pub(super) async fn render_events_page(
    connection: &mut Connection,
    templates: &Templates,
    identity: &Identity,
    message: Option<String>,
) -> Result<Html<String>, AppError> {
    let page = EventsPage {
        message,
        events: events::list(connection).await?,
        registrations: registrations::list_with_details(connection).await?,
    };
    templates.render("events", identity, page)
}

pub async fn list(
    State(pool): State<Pool>,
    State(templates): State<Arc<Templates>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    render_events_page(&mut connection, &templates, session.identity(), None).await
}
