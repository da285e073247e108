//! Data Transfer Objects - form payloads and read models.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Prefix of the checkbox fields that carry tag ids on post forms.
pub const TAG_FIELD_PREFIX: &str = "tag-";

/// Add/edit user form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(rename = "first-name")]
    pub first_name: String,
    #[serde(rename = "last-name", default)]
    pub last_name: String,
    #[serde(rename = "image-url", default)]
    pub image_url: String,
}

/// Add/edit tag form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagForm {
    pub name: String,
}

/// Add/edit post form.
///
/// Tags arrive as one field per checked box, named `tag-<id>`, so the form
/// is decoded from the raw field map rather than derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub tag_ids: BTreeSet<i32>,
}

impl PostForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            title: fields.get("title").cloned().unwrap_or_default(),
            content: fields.get("content").cloned().unwrap_or_default(),
            tag_ids: tag_ids_from_fields(fields.keys().map(String::as_str)),
        }
    }
}

/// Collect the ids of all `tag-<id>` field names. Other fields, and tag
/// fields whose suffix is not an integer, are ignored.
pub fn tag_ids_from_fields<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<i32> {
    names
        .into_iter()
        .filter_map(|name| name.strip_prefix(TAG_FIELD_PREFIX))
        .filter_map(|id| id.parse().ok())
        .collect()
}

/// A user as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub full_name: String,
}

/// A post as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

/// A tag as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

/// A tag checkbox on a post form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagChoice {
    pub id: i32,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author: UserResponse,
    pub tags: Vec<TagResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDetailResponse {
    pub tag: TagResponse,
    pub posts: Vec<PostResponse>,
}

/// Everything a new-post form needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostFormResponse {
    pub user: UserResponse,
    pub tags: Vec<TagChoice>,
}

/// Everything an edit-post form needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPostFormResponse {
    pub post: PostResponse,
    pub tags: Vec<TagChoice>,
}
