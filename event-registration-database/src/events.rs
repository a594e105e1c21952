use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};

use crate::error::DatabaseError;
use crate::models::{Event, NewEvent};
use crate::schema::events;
use crate::Connection;

#[instrument(skip(connection))]
pub async fn create(connection: &mut Connection, event: NewEvent) -> Result<Event, DatabaseError> {
    let event = diesel::insert_into(events::table)
        .values(event)
        .returning(Event::as_returning())
        .get_result(connection)
        .await?;
    info!(event_id = event.id, "created event");
    Ok(event)
}

pub async fn list(connection: &mut Connection) -> Result<Vec<Event>, DatabaseError> {
    Ok(events::table
        .select(Event::as_select())
        .order_by(events::id)
        .load(connection)
        .await?)
}

pub async fn find(connection: &mut Connection, id: i32) -> Result<Option<Event>, DatabaseError> {
    Ok(events::table
        .find(id)
        .select(Event::as_select())
        .first(connection)
        .await
        .optional()?)
}
