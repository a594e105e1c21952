use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};

use crate::error::DatabaseError;
use crate::models::{NewRegistration, Registration, RegistrationDetails, Student};
use crate::schema::{attendance, events, feedback, registrations, students};
use crate::{events as event_queries, students as student_queries, Connection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created {
        student: Student,
        registration: Registration,
    },
    AlreadyRegistered {
        student: Student,
        registration: Registration,
    },
}

impl RegistrationOutcome {
    #[must_use]
    pub const fn student(&self) -> &Student {
        match self {
            Self::Created { student, .. } | Self::AlreadyRegistered { student, .. } => student,
        }
    }

    #[must_use]
    pub const fn registration(&self) -> &Registration {
        match self {
            Self::Created { registration, .. } | Self::AlreadyRegistered { registration, .. } => {
                registration
            }
        }
    }
}

pub async fn find(
    connection: &mut Connection,
    student_id: i32,
    event_id: i32,
) -> Result<Option<Registration>, DatabaseError> {
    Ok(registrations::table
        .filter(registrations::student_id.eq(student_id))
        .filter(registrations::event_id.eq(event_id))
        .order_by(registrations::id)
        .select(Registration::as_select())
        .first(connection)
        .await
        .optional()?)
}

pub async fn exists(connection: &mut Connection, id: i32) -> Result<bool, DatabaseError> {
    Ok(
        diesel::select(diesel::dsl::exists(registrations::table.find(id)))
            .get_result(connection)
            .await?,
    )
}

/// Registers the student with `email` for an event, creating the student on first sight.
///
/// Registering twice is a no-op that reports [`RegistrationOutcome::AlreadyRegistered`].
/// The duplicate check and the insert are separate statements without a transaction and
/// the schema has no unique constraint on (`student_id`, `event_id`), so two concurrent
/// calls for the same pair can both insert.
#[instrument(skip(connection))]
pub async fn register(
    connection: &mut Connection,
    name: &str,
    email: &str,
    event_id: i32,
) -> Result<RegistrationOutcome, DatabaseError> {
    if event_queries::find(connection, event_id).await?.is_none() {
        return Err(DatabaseError::NotFound {
            entity: "event",
            id: event_id,
        });
    }

    let student = student_queries::find_or_create(connection, name, email).await?;

    if let Some(registration) = find(connection, student.id, event_id).await? {
        return Ok(RegistrationOutcome::AlreadyRegistered {
            student,
            registration,
        });
    }

    let registration = diesel::insert_into(registrations::table)
        .values(NewRegistration {
            student_id: student.id,
            event_id,
            created_at: Utc::now().naive_utc(),
        })
        .returning(Registration::as_returning())
        .get_result(connection)
        .await?;
    info!(
        registration_id = registration.id,
        student_id = student.id,
        event_id,
        "registered student"
    );
    Ok(RegistrationOutcome::Created {
        student,
        registration,
    })
}

/// Email of the student a registration belongs to.
pub async fn owner_email(
    connection: &mut Connection,
    registration_id: i32,
) -> Result<Option<String>, DatabaseError> {
    Ok(registrations::table
        .inner_join(students::table)
        .filter(registrations::id.eq(registration_id))
        .select(students::email)
        .first(connection)
        .await
        .optional()?)
}

pub async fn list_with_details(
    connection: &mut Connection,
) -> Result<Vec<RegistrationDetails>, DatabaseError> {
    Ok(registrations::table
        .inner_join(students::table)
        .inner_join(events::table)
        .left_join(attendance::table)
        .left_join(feedback::table)
        .select((
            registrations::id,
            students::name,
            students::email,
            events::title,
            attendance::present.nullable(),
            feedback::rating.nullable(),
        ))
        .order_by(registrations::id)
        .load::<RegistrationDetails>(connection)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, NewEvent};
    use crate::{events, in_memory_database};

    async fn intro_to_rust(connection: &mut Connection) -> Event {
        events::create(
            connection,
            NewEvent {
                title: "Intro to Rust".to_owned(),
                event_type: "Workshop".to_owned(),
                date: "2024-05-01".to_owned(),
                capacity: 20,
            },
        )
        .await
        .unwrap()
    }

    async fn registration_count(connection: &mut Connection) -> i64 {
        registrations::table
            .count()
            .get_result(connection)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn registering_twice_yields_one_registration() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();
        let event = intro_to_rust(&mut connection).await;

        let first = register(&mut connection, "Ann", "ann@x.com", event.id)
            .await
            .unwrap();
        let second = register(&mut connection, "Ann", "ann@x.com", event.id)
            .await
            .unwrap();

        assert!(matches!(first, RegistrationOutcome::Created { .. }));
        assert!(matches!(
            second,
            RegistrationOutcome::AlreadyRegistered { .. }
        ));
        assert_eq!(first.registration(), second.registration());
        assert_eq!(registration_count(&mut connection).await, 1);
    }

    #[tokio::test]
    async fn capacity_is_not_enforced() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();
        let event = events::create(
            &mut connection,
            NewEvent {
                title: "Tiny room".to_owned(),
                event_type: "Workshop".to_owned(),
                date: String::new(),
                capacity: 1,
            },
        )
        .await
        .unwrap();

        for (name, email) in [("Ann", "ann@x.com"), ("Bob", "bob@x.com"), ("Cy", "cy@x.com")] {
            register(&mut connection, name, email, event.id)
                .await
                .unwrap();
        }
        assert_eq!(registration_count(&mut connection).await, 3);
    }

    #[tokio::test]
    async fn unknown_event_is_rejected_before_creating_a_student() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();

        let error = register(&mut connection, "Ann", "ann@x.com", 99)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            DatabaseError::NotFound {
                entity: "event",
                id: 99
            }
        ));
        let students: i64 = students::table
            .count()
            .get_result(&mut connection)
            .await
            .unwrap();
        assert_eq!(students, 0);
    }

    // the duplicate check only lives in `register`, the table itself accepts a second
    // row for the same pair. this is what two racing registrations would produce.
    #[tokio::test]
    async fn schema_admits_duplicate_pairs() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();
        let event = intro_to_rust(&mut connection).await;
        let outcome = register(&mut connection, "Ann", "ann@x.com", event.id)
            .await
            .unwrap();

        diesel::insert_into(registrations::table)
            .values(NewRegistration {
                student_id: outcome.student().id,
                event_id: event.id,
                created_at: Utc::now().naive_utc(),
            })
            .execute(&mut connection)
            .await
            .unwrap();

        assert_eq!(registration_count(&mut connection).await, 2);
        assert_eq!(list_with_details(&mut connection).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn details_without_attendance_or_feedback_are_null() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();
        let event = intro_to_rust(&mut connection).await;
        let outcome = register(&mut connection, "Ann", "ann@x.com", event.id)
            .await
            .unwrap();

        let details = list_with_details(&mut connection).await.unwrap();
        assert_eq!(
            details,
            vec![RegistrationDetails {
                reg_id: outcome.registration().id,
                student_name: "Ann".to_owned(),
                student_email: "ann@x.com".to_owned(),
                event_title: "Intro to Rust".to_owned(),
                attendance: None,
                feedback: None,
            }]
        );
    }

    #[tokio::test]
    async fn owner_email_of_registration() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();
        let event = intro_to_rust(&mut connection).await;
        let outcome = register(&mut connection, "Ann", "ann@x.com", event.id)
            .await
            .unwrap();

        let id = outcome.registration().id;
        assert_eq!(
            owner_email(&mut connection, id).await.unwrap().as_deref(),
            Some("ann@x.com")
        );
        assert!(exists(&mut connection, id).await.unwrap());
        assert_eq!(owner_email(&mut connection, id + 1).await.unwrap(), None);
        assert!(!exists(&mut connection, id + 1).await.unwrap());
    }
}
