use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::resource::Resource;

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub role: String,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub default_password: Option<String>,
    #[serde(skip_serializing)]
    pub actual_password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub program_start_date: DateTime<Utc>,
    pub program_end_date: DateTime<Utc>,
    pub accommodation: Option<bool>,
    pub amount_paid: Option<i32>,
    pub gender: Option<String>,
    pub student_program: Option<String>,
    pub marital_status: Option<String>,
    pub health_condition: Option<String>,
    pub disability: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sponsor {
    pub id: i32,
    pub user_id: i32,
    pub student_id: i32,
    pub state_of_origin: Option<String>,
    pub lga_of_origin: Option<String>,
    pub home_address: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: i32,
    pub user_id: i32,
    pub course_title: Option<String>,
    pub course_description: Option<String>,
    pub course_instructor: Option<String>,
    pub course_outline: Option<String>,
    pub course_material: Option<String>,
    pub registered_students: Option<String>,
    pub course_start_date: Option<DateTime<Utc>>,
    pub course_end_date: Option<DateTime<Utc>>,
    pub course_project: Option<String>,
    pub course_assignment: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Instructor {
    pub id: i32,
    pub user_id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub instructor_course: Option<String>,
    pub weekly_project: Option<String>,
    pub project_grade: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Admin {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub student_id: i32,
    pub instructor_id: i32,
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
}

impl Resource for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, first_name, last_name, other_names, role, email, username, \
        default_password, actual_password, phone_number, address";
    const COLLECTION: &'static str = "users";
    const SINGULAR: &'static str = "user";
    const SEARCH_COLUMN: Option<&'static str> = Some("username");
}

impl Resource for Student {
    const TABLE: &'static str = "students";
    const COLUMNS: &'static str = "id, user_id, course_id, date_of_birth, program_start_date, \
        program_end_date, accommodation, amount_paid, gender, student_program, marital_status, \
        health_condition, disability, profile_picture";
    const COLLECTION: &'static str = "students";
    const SINGULAR: &'static str = "student";
    const SEARCH_COLUMN: Option<&'static str> = Some("student_program");
}

impl Resource for Sponsor {
    const TABLE: &'static str = "sponsors";
    const COLUMNS: &'static str =
        "id, user_id, student_id, state_of_origin, lga_of_origin, home_address";
    const COLLECTION: &'static str = "sponsors";
    const SINGULAR: &'static str = "sponsor";
    const SEARCH_COLUMN: Option<&'static str> = Some("state_of_origin");
}

impl Resource for Course {
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = "id, user_id, course_title, course_description, \
        course_instructor, course_outline, course_material, registered_students, \
        course_start_date, course_end_date, course_project, course_assignment";
    const COLLECTION: &'static str = "courses";
    const SINGULAR: &'static str = "course";
    const SEARCH_COLUMN: Option<&'static str> = Some("course_title");
}

impl Resource for Instructor {
    const TABLE: &'static str = "instructors";
    const COLUMNS: &'static str = "id, user_id, student_id, course_id, instructor_course, \
        weekly_project, project_grade";
    const COLLECTION: &'static str = "instructors";
    const SINGULAR: &'static str = "instructor";
    const SEARCH_COLUMN: Option<&'static str> = Some("instructor_course");
}

impl Resource for Admin {
    const TABLE: &'static str = "admins";
    const COLUMNS: &'static str =
        "id, user_id, course_id, student_id, instructor_id, admin_password";
    const COLLECTION: &'static str = "admins";
    const SINGULAR: &'static str = "admin";
    const SEARCH_COLUMN: Option<&'static str> = None;
}

// ============================================================================
// Payloads
// ============================================================================

/// Every create/edit body is either a search request or the resource payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchOr<T> {
    Search { search: String },
    Write(T),
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: String,
    #[validate(email, length(max = 120))]
    pub email: String,
    #[validate(length(min = 1, max = 60))]
    pub username: Option<String>,
    #[validate(length(min = 8, max = 300))]
    pub password: String,
    #[validate(length(min = 8, max = 300))]
    pub default_password: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserChanges {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,
    #[validate(email, length(max = 120))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub username: Option<String>,
    #[validate(length(min = 8, max = 300))]
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewStudent {
    pub user_id: i32,
    pub course_id: i32,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub program_start_date: Option<DateTime<Utc>>,
    pub program_end_date: Option<DateTime<Utc>>,
    pub accommodation: Option<bool>,
    pub amount_paid: Option<i32>,
    pub gender: Option<String>,
    pub student_program: Option<String>,
    pub marital_status: Option<String>,
    pub health_condition: Option<String>,
    pub disability: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentChanges {
    pub user_id: Option<i32>,
    pub course_id: Option<i32>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub program_start_date: Option<DateTime<Utc>>,
    pub program_end_date: Option<DateTime<Utc>>,
    pub accommodation: Option<bool>,
    pub amount_paid: Option<i32>,
    pub gender: Option<String>,
    pub student_program: Option<String>,
    pub marital_status: Option<String>,
    pub health_condition: Option<String>,
    pub disability: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewSponsor {
    pub user_id: i32,
    pub student_id: i32,
    pub state_of_origin: Option<String>,
    pub lga_of_origin: Option<String>,
    pub home_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SponsorChanges {
    pub user_id: Option<i32>,
    pub student_id: Option<i32>,
    pub state_of_origin: Option<String>,
    pub lga_of_origin: Option<String>,
    pub home_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCourse {
    pub user_id: i32,
    pub course_title: String,
    pub course_description: Option<String>,
    pub course_instructor: Option<String>,
    pub course_outline: Option<String>,
    pub course_material: Option<String>,
    pub registered_students: Option<String>,
    pub course_start_date: Option<DateTime<Utc>>,
    pub course_end_date: Option<DateTime<Utc>>,
    pub course_project: Option<String>,
    pub course_assignment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseChanges {
    pub user_id: Option<i32>,
    pub course_title: Option<String>,
    pub course_description: Option<String>,
    pub course_instructor: Option<String>,
    pub course_outline: Option<String>,
    pub course_material: Option<String>,
    pub registered_students: Option<String>,
    pub course_start_date: Option<DateTime<Utc>>,
    pub course_end_date: Option<DateTime<Utc>>,
    pub course_project: Option<String>,
    pub course_assignment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewInstructor {
    pub user_id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub instructor_course: Option<String>,
    pub weekly_project: Option<String>,
    pub project_grade: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstructorChanges {
    pub user_id: Option<i32>,
    pub student_id: Option<i32>,
    pub course_id: Option<i32>,
    pub instructor_course: Option<String>,
    pub weekly_project: Option<String>,
    pub project_grade: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewAdmin {
    pub user_id: i32,
    pub course_id: i32,
    pub student_id: i32,
    pub instructor_id: i32,
    pub admin_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminChanges {
    pub user_id: Option<i32>,
    pub course_id: Option<i32>,
    pub student_id: Option<i32>,
    pub instructor_id: Option<i32>,
    pub admin_password: Option<String>,
}

/// Partial updates must carry at least one field.
pub trait Changes {
    fn is_empty(&self) -> bool;
}

macro_rules! impl_changes {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl Changes for $ty {
            fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

impl_changes!(UserChanges {
    first_name, last_name, other_names, role, email, username, password, phone_number, address
});
impl_changes!(StudentChanges {
    user_id, course_id, date_of_birth, program_start_date, program_end_date, accommodation,
    amount_paid, gender, student_program, marital_status, health_condition, disability,
    profile_picture
});
impl_changes!(SponsorChanges {
    user_id, student_id, state_of_origin, lga_of_origin, home_address
});
impl_changes!(CourseChanges {
    user_id, course_title, course_description, course_instructor, course_outline,
    course_material, registered_students, course_start_date, course_end_date, course_project,
    course_assignment
});
impl_changes!(InstructorChanges {
    user_id, student_id, course_id, instructor_course, weekly_project, project_grade
});
impl_changes!(AdminChanges {
    user_id, course_id, student_id, instructor_id, admin_password
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_body_takes_search_branch() {
        let body: SearchOr<NewCourse> =
            serde_json::from_str(r#"{"search": "rust", "course_title": "ignored"}"#).unwrap();
        assert!(matches!(body, SearchOr::Search { search } if search == "rust"));
    }

    #[test]
    fn payload_takes_write_branch() {
        let body: SearchOr<NewCourse> =
            serde_json::from_str(r#"{"user_id": 1, "course_title": "Neverwhere"}"#).unwrap();
        match body {
            SearchOr::Write(course) => {
                assert_eq!(course.user_id, 1);
                assert_eq!(course.course_title, "Neverwhere");
                assert!(course.course_start_date.is_none());
            }
            SearchOr::Search { .. } => panic!("expected write branch"),
        }
    }

    #[test]
    fn unrecognized_payload_matches_nothing() {
        let body = serde_json::from_str::<SearchOr<NewStudent>>(r#"{"javaScript": "one"}"#);
        assert!(body.is_err());
        let body = serde_json::from_str::<SearchOr<NewStudent>>("{}");
        assert!(body.is_err());
    }

    #[test]
    fn empty_changes_detected() {
        assert!(StudentChanges::default().is_empty());
        let changes: CourseChanges =
            serde_json::from_str(r#"{"course_outline": "Machine Learning"}"#).unwrap();
        assert!(!changes.is_empty());
    }

    #[test]
    fn unknown_change_fields_rejected() {
        let changes = serde_json::from_str::<InstructorChanges>(r#"{"grade": "A"}"#);
        assert!(changes.is_err());
    }

    #[test]
    fn user_payload_validation() {
        let user: NewUser = serde_json::from_str(
            r#"{"role": "student", "email": "not-an-email", "password": "short"}"#,
        )
        .unwrap();
        let errors = user.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn password_hashes_never_serialized() {
        let user = User {
            id: 1,
            first_name: Some("Ada".into()),
            last_name: None,
            other_names: None,
            role: "admin".into(),
            email: "ada@example.com".into(),
            username: Some("ada".into()),
            default_password: Some("$argon2id$default".into()),
            actual_password: "$argon2id$actual".into(),
            phone_number: Some("+2348000000000".into()),
            address: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("actual_password").is_none());
        assert!(json.get("default_password").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }
}
