use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};

use crate::error::DatabaseError;
use crate::models::{Feedback, NewFeedback};
use crate::schema::feedback;
use crate::{registrations, Connection};

pub async fn upsert_by_registration(
    connection: &mut Connection,
    registration_id: i32,
    rating: i32,
) -> Result<Feedback, DatabaseError> {
    Ok(diesel::insert_into(feedback::table)
        .values(NewFeedback {
            registration_id,
            rating,
        })
        .on_conflict(feedback::registration_id)
        .do_update()
        .set(feedback::rating.eq(excluded(feedback::rating)))
        .returning(Feedback::as_returning())
        .get_result(connection)
        .await?)
}

/// Stores the rating for a registration, replacing an earlier one.
///
/// The rating is meant to be between 1 and 5 but any integer is accepted.
#[instrument(skip(connection))]
pub async fn submit(
    connection: &mut Connection,
    registration_id: i32,
    rating: i32,
) -> Result<Feedback, DatabaseError> {
    if !registrations::exists(connection, registration_id).await? {
        return Err(DatabaseError::NotFound {
            entity: "registration",
            id: registration_id,
        });
    }
    let feedback = upsert_by_registration(connection, registration_id, rating).await?;
    info!(registration_id, rating, "stored feedback");
    Ok(feedback)
}

pub async fn find_by_registration(
    connection: &mut Connection,
    registration_id: i32,
) -> Result<Option<Feedback>, DatabaseError> {
    Ok(feedback::table
        .filter(feedback::registration_id.eq(registration_id))
        .select(Feedback::as_select())
        .first(connection)
        .await
        .optional()?)
}
