use chrono::{DateTime, Utc};

/// Named permission group, shared by any number of users
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

/// User model with its resolved roles
#[derive(Clone, Debug)]
pub struct User {
    pub login: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}

/// List projection: login and name only
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub login: String,
    pub name: String,
}

/// A user ready to be persisted. The password is already hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub login: String,
    pub name: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Staged changes for an existing user. `None` leaves the field as is;
/// `Some(roles)` replaces the whole role set.
#[derive(Clone, Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Collapse repeated role names, keeping the first occurrence order.
pub fn distinct_role_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
