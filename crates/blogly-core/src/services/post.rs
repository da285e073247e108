use std::collections::BTreeSet;
use std::sync::Arc;

use crate::change::changed;
use crate::domain::{NewPost, Post, PostFields, Tag};
use crate::error::DomainError;
use crate::outcome::{Outcome, Route};
use crate::ports::{PostRepository, PostTagRepository, TagRepository, UserRepository};
use crate::reconcile::{TagChanges, reconcile};

use super::{error_route, missing};

/// Create, update and delete posts, keeping their tag links in step with
/// what the edit form submitted.
#[derive(Clone)]
pub struct PostService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    post_tags: Arc<dyn PostTagRepository>,
}

impl PostService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        post_tags: Arc<dyn PostTagRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            tags,
            post_tags,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    pub async fn tags(&self, id: i32) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.find_by_post_id(id).await?)
    }

    pub async fn tag_ids(&self, id: i32) -> Result<BTreeSet<i32>, DomainError> {
        Ok(self.post_tags.tag_ids_for_post(id).await?)
    }

    /// Create a post for `user_id` together with its submitted tags.
    pub async fn create(&self, user_id: i32, fields: &PostFields) -> Outcome {
        match self.try_create(user_id, fields).await {
            Ok(post) => Outcome::ok(format!("Post '{}' added.", post.title), Route::User(user_id)),
            Err(err) => {
                let route = error_route(&err, Route::Users, Route::User(user_id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_create(&self, user_id: i32, fields: &PostFields) -> Result<Post, DomainError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", user_id));
        }
        let (title, content) = fields.normalize()?;
        self.check_tags(&fields.tag_ids).await?;

        let post = self
            .posts
            .insert(NewPost::new(user_id, title, content, fields.tag_ids.clone()))
            .await?;
        tracing::info!(
            post_id = post.id,
            user_id,
            tags = fields.tag_ids.len(),
            "Post created"
        );

        Ok(post)
    }

    /// Update title/content and reconcile tags. Nothing is written when
    /// neither changed, and a failed tag change leaves the text untouched.
    pub async fn update(&self, id: i32, fields: &PostFields) -> Outcome {
        match self.try_update(id, fields).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let route = error_route(&err, Route::Users, Route::Post(id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_update(&self, id: i32, fields: &PostFields) -> Result<Outcome, DomainError> {
        let current = self.get(id).await?;
        let (title, content) = fields.normalize()?;
        let current_tags = self.post_tags.tag_ids_for_post(id).await?;

        let text_changed = changed(
            &[current.title.as_str(), current.content.as_str()],
            &[title.as_str(), content.as_str()],
        );
        let tag_changes = reconcile(&current_tags, &fields.tag_ids);

        if !text_changed && tag_changes.is_none() {
            tracing::debug!(post_id = id, "Post update skipped, nothing changed");
            return Ok(Outcome::warning(
                format!(
                    "Post '{}': no changes to title or content. Tags: no changes.",
                    current.title
                ),
                Route::Post(id),
            ));
        }

        let edited = Post {
            title,
            content,
            ..current.clone()
        };
        let updated = match &tag_changes {
            // Text and links go out together so a bad link leaves the text alone.
            Some(changes) => {
                self.check_tags(&changes.to_add).await?;
                let updated = self.posts.update_with_tags(edited, changes).await?;
                tracing::info!(
                    post_id = id,
                    text_changed,
                    added = changes.to_add.len(),
                    removed = changes.to_remove.len(),
                    "Post updated with tags"
                );
                updated
            }
            None => {
                let updated = self
                    .posts
                    .update(edited)
                    .await
                    .map_err(missing("Post", id))?;
                tracing::info!(post_id = id, "Post text updated");
                updated
            }
        };

        let text_message = if text_changed {
            format!("Post '{}' updated.", updated.title)
        } else {
            format!("Post '{}': no changes to title or content.", current.title)
        };
        let tag_message = tag_changes
            .as_ref()
            .map_or_else(|| "Tags: no changes.".to_string(), TagChanges::summary);

        Ok(Outcome::ok(
            format!("{text_message} {tag_message}"),
            Route::Post(id),
        ))
    }

    /// Every id in `tag_ids` must name an existing tag.
    async fn check_tags(&self, tag_ids: &BTreeSet<i32>) -> Result<(), DomainError> {
        for &id in tag_ids {
            if self.tags.find_by_id(id).await?.is_none() {
                return Err(DomainError::ReferenceNotFound {
                    entity_type: "Tag",
                    id,
                });
            }
        }
        Ok(())
    }

    /// Delete a post and all of its tag links.
    pub async fn delete(&self, id: i32) -> Outcome {
        match self.try_delete(id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let route = error_route(&err, Route::Users, Route::Post(id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_delete(&self, id: i32) -> Result<Outcome, DomainError> {
        let post = self.get(id).await?;

        let links = self
            .posts
            .delete_cascade(id)
            .await
            .map_err(missing("Post", id))?;
        tracing::info!(post_id = id, links, "Post deleted");

        Ok(Outcome::ok(
            format!("Post '{}' deleted.", post.title),
            Route::User(post.user_id),
        ))
    }
}
