use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required;
use crate::error::DomainError;

/// Post entity - a blog post written by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post that has not been stored yet, with the tags it starts out with.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tag_ids: BTreeSet<i32>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(user_id: i32, title: String, content: String, tag_ids: BTreeSet<i32>) -> Self {
        Self {
            user_id,
            title,
            content,
            created_at: Utc::now(),
            tag_ids,
        }
    }
}

/// Raw post fields as submitted by a form.
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub tag_ids: BTreeSet<i32>,
}

impl PostFields {
    /// Trimmed title and content.
    pub fn normalize(&self) -> Result<(String, String), DomainError> {
        Ok((
            required("Title", &self.title)?,
            required("Content", &self.content)?,
        ))
    }
}
