use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};

use crate::error::DatabaseError;
use crate::models::{Attendance, NewAttendance};
use crate::schema::attendance;
use crate::{registrations, Connection};

/// Inserts or updates the single attendance row of a registration.
pub async fn upsert_by_registration(
    connection: &mut Connection,
    registration_id: i32,
    present: bool,
) -> Result<Attendance, DatabaseError> {
    Ok(diesel::insert_into(attendance::table)
        .values(NewAttendance {
            registration_id,
            present,
        })
        .on_conflict(attendance::registration_id)
        .do_update()
        .set(attendance::present.eq(excluded(attendance::present)))
        .returning(Attendance::as_returning())
        .get_result(connection)
        .await?)
}

/// Marks a registration as attended. Calling it again keeps it attended.
#[instrument(skip(connection))]
pub async fn mark_present(
    connection: &mut Connection,
    registration_id: i32,
) -> Result<Attendance, DatabaseError> {
    if !registrations::exists(connection, registration_id).await? {
        return Err(DatabaseError::NotFound {
            entity: "registration",
            id: registration_id,
        });
    }
    let attendance = upsert_by_registration(connection, registration_id, true).await?;
    info!(registration_id, "marked attendance");
    Ok(attendance)
}

pub async fn find_by_registration(
    connection: &mut Connection,
    registration_id: i32,
) -> Result<Option<Attendance>, DatabaseError> {
    Ok(attendance::table
        .filter(attendance::registration_id.eq(registration_id))
        .select(Attendance::as_select())
        .first(connection)
        .await
        .optional()?)
}
