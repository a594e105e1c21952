use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, instrument};

use crate::error::DatabaseError;
use crate::models::{NewStudent, Student};
use crate::schema::students;
use crate::Connection;

/// Email is the lookup key, but it is not unique in the schema. The oldest match wins.
pub async fn find_by_email(
    connection: &mut Connection,
    email: &str,
) -> Result<Option<Student>, DatabaseError> {
    Ok(students::table
        .filter(students::email.eq(email))
        .order_by(students::id)
        .select(Student::as_select())
        .first(connection)
        .await
        .optional()?)
}

/// The name of an existing student is kept even if `name` differs.
#[instrument(skip(connection))]
pub async fn find_or_create(
    connection: &mut Connection,
    name: &str,
    email: &str,
) -> Result<Student, DatabaseError> {
    if let Some(student) = find_by_email(connection, email).await? {
        return Ok(student);
    }
    let student = diesel::insert_into(students::table)
        .values(NewStudent { name, email })
        .returning(Student::as_returning())
        .get_result(connection)
        .await?;
    debug!(student_id = student.id, "created student");
    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory_database;

    #[tokio::test]
    async fn find_or_create_reuses_student_by_email() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();

        let ann = find_or_create(&mut connection, "Ann", "ann@x.com")
            .await
            .unwrap();
        let again = find_or_create(&mut connection, "Annie", "ann@x.com")
            .await
            .unwrap();
        assert_eq!(ann, again);
        assert_eq!(again.name, "Ann");

        let count: i64 = students::table
            .count()
            .get_result(&mut connection)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let pool = in_memory_database().await.unwrap();
        let mut connection = pool.get().await.unwrap();

        find_or_create(&mut connection, "Ann", "ann@x.com")
            .await
            .unwrap();
        assert!(find_by_email(&mut connection, "bob@x.com")
            .await
            .unwrap()
            .is_none());
    }
}
