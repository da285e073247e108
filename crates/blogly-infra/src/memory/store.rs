//! In-memory record store implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogly_core::domain::{NewPost, NewTag, NewUser, Post, PostTag, Tag, User};
use blogly_core::error::RepoError;
use blogly_core::ports::{
    BaseRepository, PostRepository, PostTagRepository, TagRepository, UserRepository,
};
use blogly_core::reconcile::TagChanges;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    tags: BTreeMap<i32, Tag>,
    post_tags: BTreeSet<PostTag>,
    last_user_id: i32,
    last_post_id: i32,
    last_tag_id: i32,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.tags
            .values()
            .any(|tag| tag.name == name && Some(tag.id) != except)
    }

    fn check_link(&self, link: PostTag) -> Result<(), RepoError> {
        if !self.posts.contains_key(&link.post_id) || !self.tags.contains_key(&link.tag_id) {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    /// Validate every link change up front so a failure leaves the links
    /// untouched.
    fn check_changes(&self, post_id: i32, changes: &TagChanges) -> Result<(), RepoError> {
        for &tag_id in &changes.to_remove {
            if !self.post_tags.contains(&PostTag { post_id, tag_id }) {
                return Err(RepoError::NotFound);
            }
        }
        for &tag_id in &changes.to_add {
            let link = PostTag { post_id, tag_id };
            self.check_link(link)?;
            if self.post_tags.contains(&link) {
                return Err(RepoError::Conflict(format!(
                    "post {post_id} already has tag {tag_id}"
                )));
            }
        }
        Ok(())
    }

    fn apply_changes(&mut self, post_id: i32, changes: &TagChanges) {
        for &tag_id in &changes.to_remove {
            self.post_tags.remove(&PostTag { post_id, tag_id });
        }
        for &tag_id in &changes.to_add {
            self.post_tags.insert(PostTag { post_id, tag_id });
        }
    }

    fn remove_links(&mut self, keep: impl Fn(&PostTag) -> bool) -> u64 {
        let before = self.post_tags.len();
        self.post_tags.retain(keep);
        (before - self.post_tags.len()) as u64
    }
}

/// Record store kept in process memory behind an async `RwLock`.
///
/// Every multi-row operation runs under a single write lock, so readers never
/// observe half-applied changes. Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of mutating operations that reached the store.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        // Same as the foreign key on posts.user_id.
        if tables.posts.values().any(|post| post.user_id == id) {
            return Err(RepoError::Conflict("user still owns posts".to_string()));
        }
        tables.users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            image_url: user.image_url,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        // Owner and creation time never change after insert.
        slot.title = post.title;
        slot.content = post.content;
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        if tables.post_tags.iter().any(|link| link.post_id == id) {
            return Err(RepoError::Conflict("post still has tags".to_string()));
        }
        tables.posts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id) {
            return Err(RepoError::NotFound);
        }
        if post.tag_ids.iter().any(|id| !tables.tags.contains_key(id)) {
            return Err(RepoError::NotFound);
        }

        tables.last_post_id += 1;
        let stored = Post {
            id: tables.last_post_id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
        };
        tables.posts.insert(stored.id, stored.clone());
        for tag_id in post.tag_ids {
            tables.post_tags.insert(PostTag {
                post_id: stored.id,
                tag_id,
            });
        }
        Ok(stored)
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_with_tags(&self, post: Post, changes: &TagChanges) -> Result<Post, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_changes(post.id, changes)?;

        tables.apply_changes(post.id, changes);
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        slot.title = post.title;
        slot.content = post.content;
        Ok(slot.clone())
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(tables.remove_links(|link| link.post_id != id))
    }
}

#[async_trait]
impl BaseRepository<Tag, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.values().cloned().collect())
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.tags.contains_key(&tag.id) {
            return Err(RepoError::NotFound);
        }
        if tables.name_taken(&tag.name, Some(tag.id)) {
            return Err(RepoError::Conflict(format!("tag name '{}' exists", tag.name)));
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.tags.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        if tables.post_tags.iter().any(|link| link.tag_id == id) {
            return Err(RepoError::Conflict("tag is still in use".to_string()));
        }
        tables.tags.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn insert(&self, tag: NewTag) -> Result<Tag, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if tables.name_taken(&tag.name, None) {
            return Err(RepoError::Conflict(format!("tag name '{}' exists", tag.name)));
        }
        tables.last_tag_id += 1;
        let tag = Tag {
            id: tables.last_tag_id,
            name: tag.name,
        };
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .post_tags
            .iter()
            .filter(|link| link.post_id == post_id)
            .filter_map(|link| tables.tags.get(&link.tag_id).cloned())
            .collect())
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(tables.remove_links(|link| link.tag_id != id))
    }
}

#[async_trait]
impl PostTagRepository for InMemoryStore {
    async fn tag_ids_for_post(&self, post_id: i32) -> Result<BTreeSet<i32>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .post_tags
            .iter()
            .filter(|link| link.post_id == post_id)
            .map(|link| link.tag_id)
            .collect())
    }

    async fn post_ids_for_tag(&self, tag_id: i32) -> Result<BTreeSet<i32>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .post_tags
            .iter()
            .filter(|link| link.tag_id == tag_id)
            .map(|link| link.post_id)
            .collect())
    }

    async fn insert(&self, link: PostTag) -> Result<(), RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        tables.check_link(link)?;
        if !tables.post_tags.insert(link) {
            return Err(RepoError::Conflict(format!(
                "post {} already has tag {}",
                link.post_id, link.tag_id
            )));
        }
        Ok(())
    }

    async fn delete(&self, link: PostTag) -> Result<(), RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        if !tables.post_tags.remove(&link) {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn apply(&self, post_id: i32, changes: &TagChanges) -> Result<(), RepoError> {
        self.record_write();
        let mut tables = self.tables.write().await;
        tables.check_changes(post_id, changes)?;
        tables.apply_changes(post_id, changes);
        Ok(())
    }
}
