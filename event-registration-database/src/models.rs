use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::{attendance, events, feedback, registrations, students};

pub const DEFAULT_EVENT_TYPE: &str = "Workshop";

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub event_type: String,
    /// Free text, never parsed.
    pub date: String,
    /// Stored for display only, registrations are not limited by it.
    pub capacity: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub title: String,
    pub event_type: String,
    pub date: String,
    pub capacity: i32,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(
    Queryable, Selectable, Identifiable, Associations, Serialize, Debug, Clone, PartialEq, Eq,
)]
#[diesel(belongs_to(Student))]
#[diesel(belongs_to(Event))]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Registration {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = registrations)]
pub struct NewRegistration {
    pub student_id: i32,
    pub event_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Registration))]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Attendance {
    pub id: i32,
    pub registration_id: i32,
    pub present: bool,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = attendance)]
pub struct NewAttendance {
    pub registration_id: i32,
    pub present: bool,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Registration))]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feedback {
    pub id: i32,
    pub registration_id: i32,
    /// Meant to be 1 to 5, not checked.
    pub rating: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = feedback)]
pub struct NewFeedback {
    pub registration_id: i32,
    pub rating: i32,
}

/// One row of the registration overview.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    pub reg_id: i32,
    pub student_name: String,
    pub student_email: String,
    pub event_title: String,
    pub attendance: Option<bool>,
    pub feedback: Option<i32>,
}
