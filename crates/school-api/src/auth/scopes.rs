//! Role to scope grants.
//!
//! A scope is `<verb>:<collection>`, e.g. `get:students` or `delete:courses`.

use std::str::FromStr;

pub const VERBS: [&str; 4] = ["get", "post", "patch", "delete"];

pub const COLLECTIONS: [&str; 6] = [
    "users",
    "students",
    "sponsors",
    "courses",
    "instructors",
    "admins",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Instructor,
    Student,
    Sponsor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
            Role::Sponsor => "sponsor",
        }
    }

    pub fn scopes(&self) -> Vec<String> {
        match self {
            Role::Admin => COLLECTIONS
                .iter()
                .flat_map(|c| VERBS.iter().map(move |v| scope(v, c)))
                .collect(),
            Role::Instructor => {
                let mut scopes: Vec<String> = ["students", "courses", "instructors", "sponsors"]
                    .iter()
                    .map(|c| scope("get", c))
                    .collect();
                for c in ["courses", "instructors"] {
                    scopes.push(scope("post", c));
                    scopes.push(scope("patch", c));
                }
                scopes
            }
            Role::Student => vec![scope("get", "courses"), scope("get", "instructors")],
            Role::Sponsor => vec![scope("get", "students"), scope("get", "courses")],
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            "sponsor" => Ok(Role::Sponsor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

pub fn scope(verb: &str, collection: &str) -> String {
    format!("{}:{}", verb, collection)
}

/// Scopes granted to a stored role string. Unknown roles get nothing.
pub fn scopes_for_role(role: &str) -> Vec<String> {
    role.parse::<Role>().map(|r| r.scopes()).unwrap_or_default()
}
