use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{NewPost, NewTag, NewUser, Post, PostTag, Tag, User};
use crate::error::RepoError;
use crate::reconcile::TagChanges;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List every entity.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Overwrite the stored entity. Fails with `NotFound` when the row is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Store the post and its initial tag links in one transaction.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError>;

    /// Overwrite title and content and apply `changes` to the post's tag
    /// links, atomically. Nothing is written if any link change fails.
    async fn update_with_tags(&self, post: Post, changes: &TagChanges) -> Result<Post, RepoError>;

    /// Delete every tag link of the post, then the post itself, atomically.
    /// Returns the number of links removed.
    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    /// Fails with `Conflict` if the name is taken.
    async fn insert(&self, tag: NewTag) -> Result<Tag, RepoError>;

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;

    /// Delete every post link of the tag, then the tag itself, atomically.
    /// Returns the number of links removed.
    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError>;
}

/// Post/tag join table.
#[async_trait]
pub trait PostTagRepository: Send + Sync {
    async fn tag_ids_for_post(&self, post_id: i32) -> Result<BTreeSet<i32>, RepoError>;

    async fn post_ids_for_tag(&self, tag_id: i32) -> Result<BTreeSet<i32>, RepoError>;

    /// `Conflict` if the link exists, `NotFound` if the post or tag does not.
    async fn insert(&self, link: PostTag) -> Result<(), RepoError>;

    /// `NotFound` if the link does not exist.
    async fn delete(&self, link: PostTag) -> Result<(), RepoError>;

    /// Remove `changes.to_remove`, then add `changes.to_add`, atomically.
    async fn apply(&self, post_id: i32, changes: &TagChanges) -> Result<(), RepoError>;
}
