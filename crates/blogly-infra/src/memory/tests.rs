use std::collections::BTreeSet;
use std::sync::Arc;

use blogly_core::domain::{PostFields, PostTag, UserFields};
use blogly_core::error::RepoError;
use blogly_core::ports::{BaseRepository, PostTagRepository};
use blogly_core::{ErrorKind, PostService, Route, Severity, TagChanges, TagService, UserService};

use super::InMemoryStore;

struct Services {
    store: Arc<InMemoryStore>,
    users: UserService,
    posts: PostService,
    tags: TagService,
}

fn services() -> Services {
    let store = Arc::new(InMemoryStore::new());
    Services {
        users: UserService::new(store.clone(), store.clone()),
        posts: PostService::new(store.clone(), store.clone(), store.clone(), store.clone()),
        tags: TagService::new(store.clone(), store.clone(), store.clone()),
        store,
    }
}

fn user_fields(first: &str, last: &str) -> UserFields {
    UserFields {
        first_name: first.to_string(),
        last_name: last.to_string(),
        image_url: String::new(),
    }
}

fn post_fields(title: &str, content: &str, tags: &[i32]) -> PostFields {
    PostFields {
        title: title.to_string(),
        content: content.to_string(),
        tag_ids: tags.iter().copied().collect(),
    }
}

fn ids(ids: &[i32]) -> BTreeSet<i32> {
    ids.iter().copied().collect()
}

async fn seed_user(s: &Services) -> i32 {
    assert!(s.users.create(&user_fields("Ada", "Lovelace")).await.is_ok());
    s.users.list().await.unwrap().last().unwrap().id
}

async fn seed_tag(s: &Services, name: &str) -> i32 {
    assert!(s.tags.create(name).await.is_ok());
    s.tags
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|tag| tag.name == name)
        .unwrap()
        .id
}

async fn seed_post(s: &Services, user_id: i32, tags: &[i32]) -> i32 {
    let outcome = s.posts.create(user_id, &post_fields("Notes", "On the engine", tags)).await;
    assert_eq!(outcome.severity(), Severity::Ok, "{}", outcome.message());
    s.users.posts(user_id).await.unwrap().last().unwrap().id
}

#[tokio::test]
async fn test_create_user_trims_fields() {
    let s = services();
    let outcome = s
        .users
        .create(&UserFields {
            first_name: "  Ada ".to_string(),
            last_name: " Lovelace ".to_string(),
            image_url: "  ".to_string(),
        })
        .await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.route, Route::Users);

    let user = &s.users.list().await.unwrap()[0];
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(user.image_url, None);
}

#[tokio::test]
async fn test_create_user_requires_first_name() {
    let s = services();
    let outcome = s.users.create(&user_fields("   ", "Lovelace")).await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::Validation));
    assert_eq!(s.store.write_count(), 0);
    assert!(s.users.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_identical_user_update_is_a_no_op() {
    let s = services();
    let id = seed_user(&s).await;
    let writes = s.store.write_count();

    let outcome = s.users.update(id, &user_fields("Ada", "Lovelace")).await;

    assert_eq!(outcome.severity(), Severity::Warning);
    assert!(outcome.message().contains("no changes"));
    assert_eq!(outcome.route, Route::User(id));
    assert_eq!(s.store.write_count(), writes);
}

#[tokio::test]
async fn test_repeated_user_update_warns_the_second_time() {
    let s = services();
    let id = seed_user(&s).await;

    let first = s.users.update(id, &user_fields("Ada", "Byron")).await;
    let writes = s.store.write_count();
    let second = s.users.update(id, &user_fields(" Ada", "Byron ")).await;

    assert_eq!(first.severity(), Severity::Ok);
    assert_eq!(second.severity(), Severity::Warning);
    assert_eq!(s.store.write_count(), writes);
    assert_eq!(
        s.users.get(id).await.unwrap().last_name.as_deref(),
        Some("Byron")
    );
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let s = services();
    let outcome = s.users.update(42, &user_fields("Ada", "")).await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(outcome.route, Route::Users);
}

#[tokio::test]
async fn test_delete_user_with_posts_is_refused() {
    let s = services();
    let user_id = seed_user(&s).await;
    seed_post(&s, user_id, &[]).await;

    let outcome = s.users.delete(user_id).await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::Conflict));
    assert!(s.users.get(user_id).await.is_ok());
}

#[tokio::test]
async fn test_delete_user_without_posts() {
    let s = services();
    let user_id = seed_user(&s).await;

    let outcome = s.users.delete(user_id).await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.route, Route::Users);
    assert!(s.users.get(user_id).await.is_err());
    assert_eq!(
        s.users.delete(user_id).await.notice.error_kind(),
        Some(ErrorKind::NotFound)
    );
}

#[tokio::test]
async fn test_duplicate_tag_is_a_conflict() {
    let s = services();

    let first = s.tags.create("x").await;
    let writes = s.store.write_count();
    let second = s.tags.create(" x ").await;

    assert!(first.is_ok());
    assert_eq!(second.notice.error_kind(), Some(ErrorKind::Conflict));
    assert!(second.message().contains("already exists"));
    assert_eq!(s.store.write_count(), writes + 1);

    let named_x: Vec<_> = s
        .tags
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|tag| tag.name == "x")
        .collect();
    assert_eq!(named_x.len(), 1);
}

#[tokio::test]
async fn test_rename_tag_to_existing_name_is_a_conflict() {
    let s = services();
    seed_tag(&s, "rust").await;
    let other = seed_tag(&s, "go").await;

    let outcome = s.tags.update(other, "rust").await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::Conflict));
    assert_eq!(s.tags.get(other).await.unwrap().name, "go");
}

#[tokio::test]
async fn test_rename_tag_unchanged_warns() {
    let s = services();
    let id = seed_tag(&s, "rust").await;

    let same = s.tags.update(id, "rust ").await;
    let renamed = s.tags.update(id, "Rust").await;

    assert_eq!(same.severity(), Severity::Warning);
    assert!(renamed.is_ok());
    assert_eq!(s.tags.get(id).await.unwrap().name, "Rust");
}

#[tokio::test]
async fn test_create_post_with_tags() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t1 = seed_tag(&s, "math").await;
    let t2 = seed_tag(&s, "history").await;

    let post_id = seed_post(&s, user_id, &[t1, t2]).await;

    assert_eq!(s.posts.tag_ids(post_id).await.unwrap(), ids(&[t1, t2]));
    let names: Vec<_> = s
        .posts
        .tags(post_id)
        .await
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, ["math", "history"]);
}

#[tokio::test]
async fn test_create_post_for_missing_user() {
    let s = services();
    let outcome = s.posts.create(9, &post_fields("Title", "Body", &[])).await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(outcome.route, Route::Users);
}

#[tokio::test]
async fn test_create_post_with_unknown_tag_leaves_nothing_behind() {
    let s = services();
    let user_id = seed_user(&s).await;

    let outcome = s.posts.create(user_id, &post_fields("Title", "Body", &[77])).await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::NotFound));
    assert!(s.users.posts(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_tag_reconciliation() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t1 = seed_tag(&s, "one").await;
    let t2 = seed_tag(&s, "two").await;
    let t3 = seed_tag(&s, "three").await;
    let t4 = seed_tag(&s, "four").await;
    let post_id = seed_post(&s, user_id, &[t1, t2, t3]).await;

    let outcome = s
        .posts
        .update(post_id, &post_fields("Notes", "On the engine", &[t2, t3, t4]))
        .await;

    assert_eq!(outcome.severity(), Severity::Ok);
    assert!(outcome.message().contains("no changes to title or content"));
    assert!(outcome.message().contains("1 added, 1 removed"));
    assert_eq!(s.posts.tag_ids(post_id).await.unwrap(), ids(&[t2, t3, t4]));
}

#[tokio::test]
async fn test_post_update_with_no_tags_removes_all() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t5 = seed_tag(&s, "five").await;
    let post_id = seed_post(&s, user_id, &[t5]).await;

    let outcome = s
        .posts
        .update(post_id, &post_fields("Notes", "On the engine", &[]))
        .await;

    assert_eq!(outcome.severity(), Severity::Ok);
    assert!(s.posts.tag_ids(post_id).await.unwrap().is_empty());
    assert!(s.tags.posts(t5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_text_update_keeps_owner_and_timestamp() {
    let s = services();
    let user_id = seed_user(&s).await;
    let post_id = seed_post(&s, user_id, &[]).await;
    let before = s.posts.get(post_id).await.unwrap();

    let outcome = s
        .posts
        .update(post_id, &post_fields("Better notes", " On the engine ", &[]))
        .await;

    assert!(outcome.is_ok());
    assert!(outcome.message().starts_with("Post 'Better notes' updated."));
    assert!(outcome.message().ends_with("Tags: no changes."));

    let after = s.posts.get(post_id).await.unwrap();
    assert_eq!(after.title, "Better notes");
    assert_eq!(after.content, "On the engine");
    assert_eq!(after.user_id, before.user_id);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn test_post_update_without_changes_warns() {
    let s = services();
    let user_id = seed_user(&s).await;
    let tag = seed_tag(&s, "misc").await;
    let post_id = seed_post(&s, user_id, &[tag]).await;
    let writes = s.store.write_count();

    let outcome = s
        .posts
        .update(post_id, &post_fields("Notes ", "On the engine", &[tag]))
        .await;

    assert_eq!(outcome.severity(), Severity::Warning);
    assert!(outcome.message().contains("no changes"));
    assert_eq!(s.store.write_count(), writes);
}

#[tokio::test]
async fn test_post_update_rejects_blank_title() {
    let s = services();
    let user_id = seed_user(&s).await;
    let post_id = seed_post(&s, user_id, &[]).await;

    let outcome = s.posts.update(post_id, &post_fields("  ", "Body", &[])).await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::Validation));
    assert_eq!(outcome.route, Route::Post(post_id));
}

#[tokio::test]
async fn test_delete_post_removes_links() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t1 = seed_tag(&s, "a").await;
    let t2 = seed_tag(&s, "b").await;
    let post_id = seed_post(&s, user_id, &[t1, t2]).await;

    let outcome = s.posts.delete(post_id).await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.route, Route::User(user_id));
    assert!(s.posts.get(post_id).await.is_err());
    assert!(s.store.post_ids_for_tag(t1).await.unwrap().is_empty());
    assert!(s.store.post_ids_for_tag(t2).await.unwrap().is_empty());
    assert!(s.store.tag_ids_for_post(post_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_tag_removes_links() {
    let s = services();
    let user_id = seed_user(&s).await;
    let tag = seed_tag(&s, "gone").await;
    let keep = seed_tag(&s, "kept").await;
    let post_id = seed_post(&s, user_id, &[tag, keep]).await;

    let outcome = s.tags.delete(tag).await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.route, Route::Tags);
    assert_eq!(s.posts.tag_ids(post_id).await.unwrap(), ids(&[keep]));
}

#[tokio::test]
async fn test_tag_posts_lists_tagged_posts() {
    let s = services();
    let user_id = seed_user(&s).await;
    let tag = seed_tag(&s, "shared").await;
    let tagged = seed_post(&s, user_id, &[tag]).await;
    seed_post(&s, user_id, &[]).await;

    let posts = s.tags.posts(tag).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, tagged);
}

#[tokio::test]
async fn test_join_insert_conflicts_and_missing_rows() {
    let s = services();
    let user_id = seed_user(&s).await;
    let tag_id = seed_tag(&s, "t").await;
    let post_id = seed_post(&s, user_id, &[tag_id]).await;

    let duplicate = s.store.insert(PostTag { post_id, tag_id }).await;
    assert!(matches!(duplicate, Err(RepoError::Conflict(_))));

    let missing_tag = s.store.insert(PostTag { post_id, tag_id: 99 }).await;
    assert!(matches!(missing_tag, Err(RepoError::NotFound)));

    let missing_link = PostTagRepository::delete(&*s.store, PostTag { post_id: 99, tag_id }).await;
    assert!(matches!(missing_link, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_apply_is_all_or_nothing() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t1 = seed_tag(&s, "t1").await;
    let post_id = seed_post(&s, user_id, &[t1]).await;

    let changes = TagChanges {
        to_add: ids(&[123]),
        to_remove: ids(&[t1]),
    };
    let result = s.store.apply(post_id, &changes).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
    assert_eq!(s.store.tag_ids_for_post(post_id).await.unwrap(), ids(&[t1]));
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let s = services();
    let user_id = seed_user(&s).await;
    let mut user = s.users.get(user_id).await.unwrap();
    user.id = 500;

    let result = BaseRepository::<blogly_core::domain::User, i32>::update(&*s.store, user).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_post_update_with_unknown_tag_keeps_text() {
    let s = services();
    let user_id = seed_user(&s).await;
    let post_id = seed_post(&s, user_id, &[]).await;
    let writes = s.store.write_count();

    let outcome = s
        .posts
        .update(post_id, &post_fields("New title", "New body", &[999]))
        .await;

    assert_eq!(outcome.notice.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(outcome.message(), "Tag with id 999 not found");
    assert_eq!(outcome.route, Route::Post(post_id));

    let after = s.posts.get(post_id).await.unwrap();
    assert_eq!(after.title, "Notes");
    assert_eq!(after.content, "On the engine");
    assert_eq!(s.store.write_count(), writes);
}

#[tokio::test]
async fn test_create_post_names_the_unknown_tag() {
    let s = services();
    let user_id = seed_user(&s).await;

    let outcome = s.posts.create(user_id, &post_fields("Title", "Body", &[42])).await;

    assert_eq!(outcome.message(), "Tag with id 42 not found");
    assert_eq!(outcome.route, Route::User(user_id));
}

#[tokio::test]
async fn test_post_text_and_tags_change_together() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t1 = seed_tag(&s, "one").await;
    let t2 = seed_tag(&s, "two").await;
    let post_id = seed_post(&s, user_id, &[t1]).await;

    let outcome = s
        .posts
        .update(post_id, &post_fields("Renamed", "On the engine", &[t2]))
        .await;

    assert_eq!(outcome.severity(), Severity::Ok);
    assert_eq!(
        outcome.message(),
        "Post 'Renamed' updated. Tags: 1 added, 1 removed."
    );
    assert_eq!(s.posts.get(post_id).await.unwrap().title, "Renamed");
    assert_eq!(s.posts.tag_ids(post_id).await.unwrap(), ids(&[t2]));
}

#[tokio::test]
async fn test_update_with_tags_is_all_or_nothing() {
    let s = services();
    let user_id = seed_user(&s).await;
    let t1 = seed_tag(&s, "t1").await;
    let post_id = seed_post(&s, user_id, &[t1]).await;
    let mut post = s.posts.get(post_id).await.unwrap();
    post.title = "Changed".to_string();

    let changes = TagChanges {
        to_add: ids(&[123]),
        to_remove: ids(&[t1]),
    };
    let result =
        blogly_core::ports::PostRepository::update_with_tags(&*s.store, post, &changes).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
    assert_eq!(s.posts.get(post_id).await.unwrap().title, "Notes");
    assert_eq!(s.store.tag_ids_for_post(post_id).await.unwrap(), ids(&[t1]));
}
