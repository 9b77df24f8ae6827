use std::fmt;

use sqlx::FromRow;
use time::Date;

/// Row to be inserted by signup. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub date_of_birth: Date,
    pub gender: String,
}

/// Columns login needs to check a password.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub username: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Unique column of the `user` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    /// Maps a violated constraint name back to its column.
    pub fn from_constraint(constraint: &str) -> Option<Self> {
        match constraint {
            "user_username_key" => Some(Self::Username),
            "user_email_key" => Some(Self::Email),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("Username"),
            Self::Email => f.write_str("Email"),
        }
    }
}
