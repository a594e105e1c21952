use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use axum_extra::extract::WithRejection;
use event_registration_database::models::{Event, NewEvent, DEFAULT_EVENT_TYPE};
use event_registration_database::{events, Pool};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::session::{RequireAdmin, Session};
use crate::templating::Templates;

#[derive(Deserialize)]
pub struct CreateEventPayload {
    title: String,
    #[serde(rename = "type", default)]
    event_type: String,
    date: String,
    capacity: i32,
}

#[derive(Serialize, Default)]
struct CreateEventPage {
    success: bool,
    title: String,
    title_error: Option<&'static str>,
    event_type: String,
    date: String,
    capacity: Option<i32>,
    events: Vec<Event>,
}

pub async fn create_event_form(
    _admin: RequireAdmin,
    State(pool): State<Pool>,
    State(templates): State<Arc<Templates>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;
    templates.render(
        "create_event",
        session.identity(),
        CreateEventPage {
            event_type: DEFAULT_EVENT_TYPE.to_owned(),
            events: events::list(&mut connection).await?,
            ..CreateEventPage::default()
        },
    )
}

pub async fn create_event(
    _admin: RequireAdmin,
    State(pool): State<Pool>,
    State(templates): State<Arc<Templates>>,
    session: Session,
    WithRejection(Form(payload), _): WithRejection<Form<CreateEventPayload>, AppError>,
) -> Result<Html<String>, AppError> {
    let mut connection = pool.get().await?;

    let title = payload.title.trim();
    if title.is_empty() {
        return templates.render(
            "create_event",
            session.identity(),
            CreateEventPage {
                title_error: Some("title must not be empty"),
                event_type: payload.event_type,
                date: payload.date,
                capacity: Some(payload.capacity),
                events: events::list(&mut connection).await?,
                ..CreateEventPage::default()
            },
        );
    }

    let event_type = match payload.event_type.trim() {
        "" => DEFAULT_EVENT_TYPE.to_owned(),
        event_type => event_type.to_owned(),
    };
    events::create(
        &mut connection,
        NewEvent {
            title: title.to_owned(),
            event_type,
            date: payload.date,
            capacity: payload.capacity,
        },
    )
    .await?;

    templates.render(
        "create_event",
        session.identity(),
        CreateEventPage {
            success: true,
            event_type: DEFAULT_EVENT_TYPE.to_owned(),
            events: events::list(&mut connection).await?,
            ..CreateEventPage::default()
        },
    )
}
