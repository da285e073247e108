use std::sync::Arc;

use crate::change::changed;
use crate::domain::{NewTag, Post, Tag, required};
use crate::error::{DomainError, RepoError};
use crate::outcome::{Outcome, Route};
use crate::ports::{PostRepository, PostTagRepository, TagRepository};

use super::{error_route, missing};

/// Create, rename and delete tags.
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    posts: Arc<dyn PostRepository>,
    post_tags: Arc<dyn PostTagRepository>,
}

fn duplicate(name: &str) -> impl FnOnce(RepoError) -> DomainError + '_ {
    move |err| match err {
        RepoError::Conflict(_) => DomainError::Conflict(format!("Tag '{name}' already exists")),
        other => other.into(),
    }
}

impl TagService {
    pub fn new(
        tags: Arc<dyn TagRepository>,
        posts: Arc<dyn PostRepository>,
        post_tags: Arc<dyn PostTagRepository>,
    ) -> Self {
        Self {
            tags,
            posts,
            post_tags,
        }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.find_all().await?)
    }

    pub async fn get(&self, id: i32) -> Result<Tag, DomainError> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    /// Posts carrying the tag.
    pub async fn posts(&self, id: i32) -> Result<Vec<Post>, DomainError> {
        self.get(id).await?;

        let mut posts = Vec::new();
        for post_id in self.post_tags.post_ids_for_tag(id).await? {
            if let Some(post) = self.posts.find_by_id(post_id).await? {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    pub async fn create(&self, name: &str) -> Outcome {
        match self.try_create(name).await {
            Ok(tag) => Outcome::ok(format!("Tag '{}' added.", tag.name), Route::Tags),
            Err(err) => Outcome::failed(err, Route::Tags),
        }
    }

    async fn try_create(&self, name: &str) -> Result<Tag, DomainError> {
        let name = required("Name", name)?;
        let tag = self
            .tags
            .insert(NewTag { name: name.clone() })
            .await
            .map_err(duplicate(&name))?;
        tracing::info!(tag_id = tag.id, "Tag created");
        Ok(tag)
    }

    pub async fn update(&self, id: i32, name: &str) -> Outcome {
        match self.try_update(id, name).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let route = error_route(&err, Route::Tags, Route::Tag(id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_update(&self, id: i32, name: &str) -> Result<Outcome, DomainError> {
        let current = self.get(id).await?;
        let name = required("Name", name)?;

        if !changed(&[current.name.as_str()], &[name.as_str()]) {
            tracing::debug!(tag_id = id, "Tag update skipped, nothing changed");
            return Ok(Outcome::warning(
                format!("Tag '{}': no changes.", current.name),
                Route::Tag(id),
            ));
        }

        let updated = self
            .tags
            .update(Tag {
                id,
                name: name.clone(),
            })
            .await
            .map_err(|err| match err {
                RepoError::NotFound => missing("Tag", id)(err),
                other => duplicate(&name)(other),
            })?;
        tracing::info!(tag_id = id, "Tag renamed");

        Ok(Outcome::ok(
            format!("Tag '{}' renamed to '{}'.", current.name, updated.name),
            Route::Tag(id),
        ))
    }

    /// Delete a tag along with every post link that references it.
    pub async fn delete(&self, id: i32) -> Outcome {
        match self.try_delete(id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let route = error_route(&err, Route::Tags, Route::Tag(id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_delete(&self, id: i32) -> Result<Outcome, DomainError> {
        let tag = self.get(id).await?;

        let links = self
            .tags
            .delete_cascade(id)
            .await
            .map_err(missing("Tag", id))?;
        tracing::info!(tag_id = id, links, "Tag deleted");

        Ok(Outcome::ok(format!("Tag '{}' deleted.", tag.name), Route::Tags))
    }
}
