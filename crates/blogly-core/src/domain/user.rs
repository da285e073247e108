use serde::{Deserialize, Serialize};

use super::{max_len, optional, required};
use crate::error::DomainError;

/// Longest first or last name the schema accepts.
pub const NAME_MAX_LEN: usize = 25;

/// User entity - a blog author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl User {
    /// First and last name joined, without dangling whitespace when the
    /// last name is absent.
    pub fn full_name(&self) -> String {
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{} {}", self.first_name, last).trim().to_string()
    }
}

/// A validated user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

/// Raw user fields as submitted by a form.
#[derive(Debug, Clone, Default)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl UserFields {
    /// Trim every field and check the required ones.
    pub fn normalize(&self) -> Result<NewUser, DomainError> {
        let first_name = required("First name", &self.first_name)?;
        max_len("First name", &first_name, NAME_MAX_LEN)?;

        let last_name = optional(&self.last_name);
        if let Some(last) = &last_name {
            max_len("Last name", last, NAME_MAX_LEN)?;
        }

        Ok(NewUser {
            first_name,
            last_name,
            image_url: optional(&self.image_url),
        })
    }
}
