pub mod attendance;
pub mod error;
pub mod events;
pub mod feedback;
pub mod models;
pub mod registrations;
pub mod schema;
pub mod students;

use diesel::{ConnectionError, SqliteConnection};
use diesel_async::pooled_connection::deadpool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};
use error::DatabaseError;
use futures_util::FutureExt as _;
use tracing::info;

pub use diesel::result::Error as DieselError;
pub use diesel_async::pooled_connection::deadpool::PoolError;

pub type Connection = SyncConnectionWrapper<SqliteConnection>;
pub type Pool = deadpool::Pool<Connection>;

const IN_MEMORY: &str = ":memory:";

// the unique constraints on registration_id back the upserts in attendance.rs and feedback.rs.
// registrations deliberately has no unique (student_id, event_id) constraint, see registrations::register
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'Workshop',
    date TEXT NOT NULL DEFAULT '',
    capacity INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS students_email_index ON students(email);
CREATE TABLE IF NOT EXISTS registrations (
    id INTEGER PRIMARY KEY NOT NULL,
    student_id INTEGER NOT NULL REFERENCES students(id),
    event_id INTEGER NOT NULL REFERENCES events(id),
    created_at TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS registrations_student_event_index ON registrations(student_id, event_id);
CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY NOT NULL,
    registration_id INTEGER NOT NULL UNIQUE REFERENCES registrations(id),
    present BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY NOT NULL,
    registration_id INTEGER NOT NULL UNIQUE REFERENCES registrations(id),
    rating INTEGER NOT NULL
);
";

async fn establish(database_url: &str) -> diesel::ConnectionResult<Connection> {
    let mut connection = Connection::establish(database_url).await?;
    connection
        .batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
        .await
        .map_err(ConnectionError::CouldntSetupConfiguration)?;
    Ok(connection)
}

pub fn get_database_connection(database_url: &str) -> Result<Pool, DatabaseError> {
    let mut manager_config = ManagerConfig::default();
    manager_config.custom_setup = Box::new(|url| establish(url).boxed());
    let manager = AsyncDieselConnectionManager::<Connection>::new_with_config(
        database_url,
        manager_config,
    );
    let builder = Pool::builder(manager);
    // every connection to :memory: opens its own empty database
    let builder = if database_url == IN_MEMORY {
        builder.max_size(1)
    } else {
        builder
    };
    Ok(builder.build()?)
}

/// Creates all tables that don't exist yet.
pub async fn create_schema(pool: &Pool) -> Result<(), DatabaseError> {
    let mut connection = pool.get().await?;
    connection.batch_execute(SCHEMA).await?;
    info!("database schema is ready");
    Ok(())
}

/// An empty in-memory database with the schema applied.
pub async fn in_memory_database() -> Result<Pool, DatabaseError> {
    let pool = get_database_connection(IN_MEMORY)?;
    create_schema(&pool).await?;
    Ok(pool)
}
