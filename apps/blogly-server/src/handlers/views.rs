//! Domain records to wire read models.

use std::collections::BTreeSet;

use blogly_core::domain::{Post, Tag, User};
use blogly_shared::dto::{PostResponse, TagChoice, TagResponse, UserResponse};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        image_url: user.image_url.clone(),
        full_name: user.full_name(),
    }
}

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title.clone(),
        content: post.content.clone(),
        created_at: post.created_at.to_rfc3339(),
    }
}

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name.clone(),
    }
}

/// Every tag as a checkbox, checked when its id is in `selected`.
pub fn tag_choices(tags: &[Tag], selected: &BTreeSet<i32>) -> Vec<TagChoice> {
    tags.iter()
        .map(|tag| TagChoice {
            id: tag.id,
            name: tag.name.clone(),
            checked: selected.contains(&tag.id),
        })
        .collect()
}
